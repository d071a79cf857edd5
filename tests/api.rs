//! API client against a local fake of the storefront API.

mod common;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as Base64Standard;
use parking_lot::Mutex;
use serde_json::{Value, json};
use storefront_e2e::{ApiClient, ApiSession};
use tokio::net::TcpListener;

use common::{KNOWN_PASSWORD, KNOWN_USER, init_logging};

// ============================================================================
// Fake API
// ============================================================================

#[derive(Default)]
struct FakeApi {
    /// (username, base64 password) pairs.
    users: Vec<(String, String)>,
    /// (entry id, cookie, product id) rows.
    cart: Vec<(String, String, u64)>,
}

type Shared = Arc<Mutex<FakeApi>>;

const PRODUCTS: [(u64, &str, &str, f64); 3] = [
    (1, "phone", "Samsung galaxy s6", 360.0),
    (3, "phone", "Nexus 6", 650.0),
    (10, "monitor", "Apple monitor 24", 400.0),
];

fn product_json(id: u64, cat: &str, title: &str, price: f64) -> Value {
    json!({"id": id, "cat": cat, "title": title, "price": price})
}

fn field<'a>(body: &'a Value, key: &str) -> &'a str {
    body[key].as_str().unwrap_or_default()
}

async fn login(State(api): State<Shared>, Json(body): Json<Value>) -> Response {
    let api = api.lock();
    let (username, password) = (field(&body, "username"), field(&body, "password"));
    match api.users.iter().find(|(u, _)| u == username) {
        Some((_, stored)) if stored == password => Json(json!(format!("Auth_token: {username}"))).into_response(),
        Some(_) => Json(json!({"errorMessage": "Wrong password."})).into_response(),
        None => Json(json!({"errorMessage": "User does not exist."})).into_response(),
    }
}

async fn signup(State(api): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut api = api.lock();
    let username = field(&body, "username").to_string();
    if api.users.iter().any(|(u, _)| *u == username) {
        return Json(json!({"errorMessage": "This user already exist."})).into_response();
    }
    let password = field(&body, "password").to_string();
    api.users.push((username, password));
    Json(json!("")).into_response()
}

async fn entries() -> Json<Value> {
    let items: Vec<Value> = PRODUCTS
        .iter()
        .map(|&(id, cat, title, price)| product_json(id, cat, title, price))
        .collect();
    Json(json!({"Items": items, "LastEvaluatedKey": {"id": "9"}}))
}

async fn view(Json(body): Json<Value>) -> Response {
    let id = body["id"].as_u64().unwrap_or_default();
    match PRODUCTS.iter().find(|p| p.0 == id) {
        Some(&(id, cat, title, price)) => Json(product_json(id, cat, title, price)).into_response(),
        None => (StatusCode::NOT_FOUND, "no such product").into_response(),
    }
}

async fn by_category(Json(body): Json<Value>) -> Json<Value> {
    let cat = field(&body, "cat");
    let items: Vec<Value> = PRODUCTS
        .iter()
        .filter(|p| p.1 == cat)
        .map(|&(id, cat, title, price)| product_json(id, cat, title, price))
        .collect();
    Json(json!({"Items": items}))
}

async fn add_to_cart(State(api): State<Shared>, Json(body): Json<Value>) -> StatusCode {
    let entry = (
        field(&body, "id").to_string(),
        field(&body, "cookie").to_string(),
        body["prod_id"].as_u64().unwrap_or_default(),
    );
    api.lock().cart.push(entry);
    StatusCode::OK
}

async fn view_cart(State(api): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let cookie = field(&body, "cookie");
    let items: Vec<Value> = api
        .lock()
        .cart
        .iter()
        .filter(|(_, c, _)| c == cookie)
        .map(|(id, cookie, prod_id)| json!({"id": id, "cookie": cookie, "prod_id": prod_id}))
        .collect();
    Json(json!({"Items": items}))
}

async fn delete_item(State(api): State<Shared>, Json(body): Json<Value>) -> StatusCode {
    let id = field(&body, "id");
    api.lock().cart.retain(|(entry, _, _)| entry != id);
    StatusCode::OK
}

/// Starts the fake API on an ephemeral port with the known user registered.
async fn spawn_api() -> (SocketAddr, Shared) {
    init_logging();

    let state: Shared = Arc::new(Mutex::new(FakeApi::default()));
    state
        .lock()
        .users
        .push((KNOWN_USER.to_string(), Base64Standard.encode(KNOWN_PASSWORD)));

    let app = Router::new()
        .route("/login", post(login))
        .route("/signup", post(signup))
        .route("/entries", get(entries))
        .route("/view", post(view))
        .route("/bycat", post(by_category))
        .route("/addtocart", post(add_to_cart))
        .route("/viewcart", post(view_cart))
        .route("/deleteitem", post(delete_item))
        .with_state(Arc::clone(&state));

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, state)
}

fn client(addr: SocketAddr) -> ApiClient {
    ApiClient::new(&format!("http://{addr}")).expect("client")
}

fn cart_ids(body: &Value) -> Vec<u64> {
    body["Items"]
        .as_array()
        .map(|items| items.iter().filter_map(|item| item["prod_id"].as_u64()).collect())
        .unwrap_or_default()
}

// ============================================================================
// Auth
// ============================================================================

#[tokio::test]
async fn test_login_success_yields_session() {
    let (addr, _) = spawn_api().await;
    let api = client(addr);

    let outcome = api.login(KNOWN_USER, KNOWN_PASSWORD).await.expect("login");

    assert!(outcome.success());
    assert!(outcome.response.body.contains("Auth_token"));
    assert_eq!(outcome.session, Some(ApiSession::for_user(KNOWN_USER)));
}

#[tokio::test]
async fn test_wrong_password_is_not_success() {
    let (addr, _) = spawn_api().await;
    let api = client(addr);

    let outcome = api.login(KNOWN_USER, "wrong").await.expect("login");

    assert!(outcome.response.is_success());
    assert!(!outcome.success());
    assert!(outcome.response.body.contains("Wrong password"));
}

#[tokio::test]
async fn test_signup_sends_encoded_password() {
    let (addr, state) = spawn_api().await;
    let api = client(addr);

    let response = api.signup("newcomer", "s3cret").await.expect("signup");
    assert!(response.is_success());
    assert!(
        state
            .lock()
            .users
            .contains(&("newcomer".to_string(), Base64Standard.encode("s3cret")))
    );

    let again = api.signup("newcomer", "s3cret").await.expect("signup again");
    assert!(again.body.contains("already exist"));
    assert!(api.login("newcomer", "s3cret").await.expect("login").success());
}

// ============================================================================
// Products
// ============================================================================

#[tokio::test]
async fn test_entries_and_category() {
    let (addr, _) = spawn_api().await;
    let api = client(addr);

    let all: Value = api.entries().await.expect("entries").json().expect("json");
    assert_eq!(all["Items"].as_array().map(Vec::len), Some(3));

    let monitors: Value = api.by_category("monitor").await.expect("bycat").json().expect("json");
    assert_eq!(monitors["Items"][0]["title"], "Apple monitor 24");
    assert_eq!(monitors["Items"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_non_success_status_is_returned() {
    let (addr, _) = spawn_api().await;
    let api = client(addr);

    let found = api.view_product(3).await.expect("view");
    assert!(found.is_success());
    assert_eq!(found.json::<Value>().expect("json")["price"], 650.0);

    let missing = api.view_product(999).await.expect("view");
    assert_eq!(missing.status, 404);
    assert!(!missing.is_success());
}

// ============================================================================
// Cart
// ============================================================================

#[tokio::test]
async fn test_sessions_keep_separate_carts() {
    let (addr, _) = spawn_api().await;
    let api = client(addr);
    let alice = ApiSession::for_user("alice");
    let bob = ApiSession::for_user("bob");

    api.add_to_cart(&alice, 1).await.expect("add");
    api.add_to_cart(&alice, 3).await.expect("add");
    api.add_to_cart(&bob, 10).await.expect("add");

    let alice_cart: Value = api.view_cart(&alice).await.expect("view").json().expect("json");
    let bob_cart: Value = api.view_cart(&bob).await.expect("view").json().expect("json");

    assert_eq!(cart_ids(&alice_cart), [1, 3]);
    assert_eq!(cart_ids(&bob_cart), [10]);
    assert_eq!(alice_cart["Items"][0]["cookie"], alice.cookie);
}

#[tokio::test]
async fn test_delete_item_removes_entry() {
    let (addr, _) = spawn_api().await;
    let api = client(addr);
    let session = ApiSession::guest();

    api.add_to_cart(&session, 1).await.expect("add");
    api.add_to_cart(&session, 3).await.expect("add");
    let cart: Value = api.view_cart(&session).await.expect("view").json().expect("json");
    let first = cart["Items"][0]["id"].as_str().expect("entry id").to_string();

    let response = api.delete_item(&first).await.expect("delete");
    assert!(response.is_success());

    let cart: Value = api.view_cart(&session).await.expect("view").json().expect("json");
    assert_eq!(cart_ids(&cart), [3]);
}
