//! HTTP client for the storefront API.
//!
//! The client holds no session. Calls that act on a cart take an explicit
//! [`ApiSession`], so two sessions can share one client without mixing
//! carts.
//!
//! ```ignore
//! let api = ApiClient::new("https://api.demoblaze.com")?;
//! let session = ApiSession::guest();
//! api.add_to_cart(&session, 1).await?;
//! let cart = api.view_cart(&session).await?.json()?;
//! ```
//!
//! Non-2xx statuses are returned in [`ApiResponse`], never raised.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as Base64Standard;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;
use uuid::Uuid;

use crate::config::SuiteConfig;
use crate::error::{Error, Result};

// ============================================================================
// ApiSession
// ============================================================================

/// Identity whose cart the cart calls act on.
///
/// The site identifies carts by `cookie`, the base64 of the user name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSession {
    /// User name, or a generated guest id.
    pub user: String,
    /// Cart cookie.
    pub cookie: String,
}

impl ApiSession {
    /// Session for a logged-in user.
    #[must_use]
    pub fn for_user(user: impl Into<String>) -> Self {
        let user = user.into();
        Self {
            cookie: Base64Standard.encode(&user),
            user,
        }
    }

    /// Fresh guest session, `guest_<millis>`.
    #[must_use]
    pub fn guest() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or_default();
        Self::for_user(format!("guest_{millis}"))
    }

    /// Returns `true` for sessions created by [`ApiSession::guest`].
    #[inline]
    #[must_use]
    pub fn is_guest(&self) -> bool {
        self.user.starts_with("guest_")
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Status and raw body of an API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Body text.
    pub body: String,
}

impl ApiResponse {
    /// Returns `true` for 2xx statuses.
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parses the body as JSON.
    ///
    /// # Errors
    ///
    /// [`Error::Json`] if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Result of [`ApiClient::login`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    /// Raw response.
    pub response: ApiResponse,
    /// Session for the user, present only when the login succeeded.
    pub session: Option<ApiSession>,
}

impl LoginOutcome {
    /// Returns `true` if the body carried an auth token.
    #[inline]
    #[must_use]
    pub fn success(&self) -> bool {
        self.session.is_some()
    }
}

// ============================================================================
// Request bodies
// ============================================================================

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: String,
}

impl<'a> Credentials<'a> {
    fn encoded(username: &'a str, password: &str) -> Self {
        Self {
            username,
            password: Base64Standard.encode(password),
        }
    }
}

#[derive(Serialize)]
struct ById<T: Serialize> {
    id: T,
}

#[derive(Serialize)]
struct ByCategory<'a> {
    cat: &'a str,
}

#[derive(Serialize)]
struct AddToCart<'a> {
    id: Uuid,
    cookie: &'a str,
    prod_id: u32,
    flag: bool,
}

#[derive(Serialize)]
struct ViewCart<'a> {
    cookie: &'a str,
    flag: bool,
}

// ============================================================================
// ApiClient
// ============================================================================

/// Stateless client for the storefront API.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base", &self.base.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates a client for the API at `api_url`.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if the URL does not parse, [`Error::Http`] if the
    /// HTTP client cannot be built.
    pub fn new(api_url: &str) -> Result<Self> {
        Self::with_http(api_url, reqwest::Client::builder().build()?)
    }

    /// Creates a client using the API URL and timeout from `config`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::new`].
    pub fn from_config(config: &SuiteConfig) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Self::with_http(&config.api_url, http)
    }

    fn with_http(api_url: &str, http: reqwest::Client) -> Result<Self> {
        // Trailing slash so `join` appends instead of replacing the last segment
        let normalized = format!("{}/", api_url.trim_end_matches('/'));
        let base = Url::parse(&normalized)
            .map_err(|e| Error::config(format!("API URL '{api_url}' is invalid: {e}")))?;
        Ok(Self { http, base })
    }

    /// API origin.
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| Error::config(format!("Cannot build endpoint '{path}': {e}")))
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        let url = self.endpoint(path)?;
        let response = self.http.post(url).json(body).send().await?;
        Self::read(path, response).await
    }

    async fn read(path: &str, response: reqwest::Response) -> Result<ApiResponse> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(path, status, bytes = body.len(), "API response");
        Ok(ApiResponse { status, body })
    }

    // ========================================================================
    // Auth
    // ========================================================================

    /// Logs in; the password is sent base64-encoded.
    ///
    /// Success is decided by the body containing `Auth_token`; a wrong
    /// password still answers 200.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome> {
        info!(username, "API login");
        let response = self.post("login", &Credentials::encoded(username, password)).await?;
        let session = response
            .body
            .contains("Auth_token")
            .then(|| ApiSession::for_user(username));
        Ok(LoginOutcome { response, session })
    }

    /// Registers a user; the password is sent base64-encoded.
    pub async fn signup(&self, username: &str, password: &str) -> Result<ApiResponse> {
        info!(username, "API signup");
        self.post("signup", &Credentials::encoded(username, password)).await
    }

    // ========================================================================
    // Products
    // ========================================================================

    /// Lists the catalog (`{"Items": [...]}`).
    pub async fn entries(&self) -> Result<ApiResponse> {
        info!("API entries");
        let url = self.endpoint("entries")?;
        let response = self.http.get(url).send().await?;
        Self::read("entries", response).await
    }

    pub async fn view_product(&self, id: u32) -> Result<ApiResponse> {
        info!(id, "API view product");
        self.post("view", &ById { id }).await
    }

    /// Lists one category by its API key (`phone`, `notebook`, `monitor`).
    pub async fn by_category(&self, category: &str) -> Result<ApiResponse> {
        info!(category, "API by category");
        self.post("bycat", &ByCategory { cat: category }).await
    }

    // ========================================================================
    // Cart
    // ========================================================================

    /// Adds `product_id` to the session's cart under a fresh entry id.
    pub async fn add_to_cart(&self, session: &ApiSession, product_id: u32) -> Result<ApiResponse> {
        info!(product_id, user = %session.user, "API add to cart");
        let body = AddToCart {
            id: Uuid::new_v4(),
            cookie: &session.cookie,
            prod_id: product_id,
            flag: true,
        };
        self.post("addtocart", &body).await
    }

    /// Lists the session's cart entries.
    pub async fn view_cart(&self, session: &ApiSession) -> Result<ApiResponse> {
        info!(user = %session.user, "API view cart");
        let body = ViewCart {
            cookie: &session.cookie,
            flag: true,
        };
        self.post("viewcart", &body).await
    }

    /// Deletes one cart entry by its entry id.
    pub async fn delete_item(&self, item_id: &str) -> Result<ApiResponse> {
        info!(item_id, "API delete item");
        self.post("deleteitem", &ById { id: item_id }).await
    }
}

// ============================================================================
// Tests
// ============================================================================
