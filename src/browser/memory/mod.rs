//! In-memory storefront simulation.
//!
//! [`MemoryStorefront`] implements [`Browser`] against a simulated copy of
//! the demo store. Page content arrives asynchronously like on the real
//! site: the document loads first, the product grid, product details and
//! cart rows follow after simulated API round-trips, each announced as a
//! [`NetworkResponse`]. Cart rows render one at a time and the total only
//! appears once every row is in.
//!
//! Native alerts are routed to the armed dialog receiver; an alert that
//! opens while nothing is armed is dismissed on the spot.
//!
//! # Example
//!
//! ```ignore
//! use storefront_e2e::browser::{Browser, Locator, MemoryStorefront};
//!
//! let page = MemoryStorefront::builder()
//!     .user("alice", "secret")
//!     .build()?;
//!
//! page.goto("https://www.demoblaze.com/").await?;
//! let names = page.all_text_contents(&Locator::css(".card-title a")).await?;
//! ```

// ============================================================================
// Submodules
// ============================================================================

pub(crate) mod dom;
pub(crate) mod storefront;

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as Base64Standard;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tokio::sync::{broadcast, oneshot};
use tokio::time::sleep;
use tracing::{debug, trace};
use url::Url;

use crate::config::{DEFAULT_API_URL, DEFAULT_BASE_URL, SuiteConfig};
use crate::error::{Error, Result};

use super::{Browser, Dialog, DialogAction, DialogKind, ElementState, Key, Locator, NetworkResponse};

use dom::{Node, NodePath};
use storefront::{
    Action, MSG_FILL_CREDENTIALS, MSG_PRODUCT_ADDED, MSG_SIGNUP_OK, Modal, Route, Storefront,
};

// ============================================================================
// Re-exports
// ============================================================================

pub use storefront::{CatalogItem, demo_catalog};

// ============================================================================
// Constants
// ============================================================================

/// 1x1 transparent PNG returned by [`Browser::screenshot`].
const BLANK_PNG: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

/// Capacity of the response broadcast channel.
const RESPONSE_CHANNEL_CAPACITY: usize = 256;

// ============================================================================
// Latency
// ============================================================================

/// Simulated timings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    /// API round-trip before a response is observed.
    pub api: Duration,
    /// Delay between a response and the DOM update it causes.
    pub render: Duration,
    /// Delay between consecutive cart rows.
    pub row: Duration,
}

impl Default for Latency {
    fn default() -> Self {
        Self {
            api: Duration::from_millis(150),
            render: Duration::from_millis(30),
            row: Duration::from_millis(100),
        }
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`MemoryStorefront`].
#[derive(Debug, Clone)]
pub struct MemoryStorefrontBuilder {
    base_url: String,
    api_url: String,
    catalog: Vec<CatalogItem>,
    users: Vec<(String, String)>,
    latency: Latency,
}

impl Default for MemoryStorefrontBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            catalog: demo_catalog(),
            users: Vec::new(),
            latency: Latency::default(),
        }
    }
}

impl MemoryStorefrontBuilder {
    /// Sets the storefront origin pages are served from.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the API origin used in observed response URLs.
    #[must_use]
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Replaces the product catalog.
    #[must_use]
    pub fn catalog(mut self, catalog: Vec<CatalogItem>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Registers an account.
    #[must_use]
    pub fn user(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.users.push((username.into(), password.into()));
        self
    }

    /// Sets simulated timings.
    #[must_use]
    pub fn latency(mut self, latency: Latency) -> Self {
        self.latency = latency;
        self
    }

    /// Builds the page.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if either URL is invalid.
    pub fn build(self) -> Result<MemoryStorefront> {
        let base = Url::parse(&self.base_url)
            .map_err(|e| Error::config(format!("Invalid base URL '{}': {e}", self.base_url)))?;
        let api = Url::parse(&self.api_url)
            .map_err(|e| Error::config(format!("Invalid API URL '{}': {e}", self.api_url)))?;

        let users: FxHashMap<String, String> = self.users.into_iter().collect();
        let (responses, _) = broadcast::channel(RESPONSE_CHANNEL_CAPACITY);

        Ok(MemoryStorefront {
            inner: Arc::new(Shared {
                state: Mutex::new(Storefront::new(base, self.catalog, users)),
                dialog_slot: Mutex::new(None),
                open_dialog: Mutex::new(None),
                responses,
                api,
                latency: self.latency,
                closed: AtomicBool::new(false),
            }),
        })
    }
}

// ============================================================================
// Shared State
// ============================================================================

/// A dialog delivered to an armed receiver and not yet resolved.
#[derive(Debug, Clone, Copy)]
struct OpenDialog {
    /// Modal the site closes once the dialog is answered.
    closes: Option<Modal>,
}

struct Shared {
    state: Mutex<Storefront>,
    dialog_slot: Mutex<Option<oneshot::Sender<Dialog>>>,
    open_dialog: Mutex<Option<OpenDialog>>,
    responses: broadcast::Sender<NetworkResponse>,
    api: Url,
    latency: Latency,
    /// Set by [`Browser::close`]; navigation fails afterwards.
    closed: AtomicBool,
}

impl Shared {
    /// Announces an API response.
    fn respond(&self, endpoint: &str, status: u16) {
        let url = self
            .api
            .join(endpoint)
            .map_or_else(|_| format!("{}{endpoint}", self.api), |url| url.to_string());
        trace!(%url, status, "Response");
        // No subscribers is fine
        let _ = self.responses.send(NetworkResponse::new(url, status));
    }

    /// Opens a native alert.
    fn alert(&self, message: &str, closes: Option<Modal>) {
        let dialog = Dialog {
            kind: DialogKind::Alert,
            message: message.to_string(),
        };

        let armed = self.dialog_slot.lock().take();
        match armed.map(|tx| tx.send(dialog)) {
            Some(Ok(())) => {
                debug!(message, "Alert opened");
                *self.open_dialog.lock() = Some(OpenDialog { closes });
            }
            _ => {
                debug!(message, "Dismissing alert with no interceptor");
                self.after_dialog(closes);
            }
        }
    }

    fn after_dialog(&self, closes: Option<Modal>) {
        let mut state = self.state.lock();
        if closes.is_some() && state.modal == closes {
            state.modal = None;
        }
    }

    /// Runs `apply` after a simulated API call to `endpoint`.
    fn request<F>(self: &Arc<Self>, endpoint: &'static str, apply: F)
    where
        F: FnOnce(&Arc<Shared>) + Send + 'static,
    {
        let shared = Arc::clone(self);
        tokio::spawn(async move {
            sleep(shared.latency.api).await;
            shared.respond(endpoint, 200);
            sleep(shared.latency.render).await;
            apply(&shared);
        });
    }

    fn index_url(&self) -> Result<Url> {
        let state = self.state.lock();
        state
            .base()
            .join("index.html")
            .map_err(|e| Error::protocol(format!("Invalid URL: {e}")))
    }

    /// Replaces the document and schedules its content.
    fn navigate(self: &Arc<Self>, url: &Url) -> Result<()> {
        let (route, generation, ticket) = {
            let mut state = self.state.lock();
            let route = state.navigate(url)?;
            let ticket = match route {
                Route::Home => state.issue_listing(),
                _ => 0,
            };
            (route, state.generation, ticket)
        };
        debug!(%url, ?route, "Document loaded");

        match route {
            Route::Blank => {}
            Route::Home => self.request("entries", move |shared| {
                if !shared.state.lock().load_home(generation, ticket) {
                    trace!(ticket, "Listing superseded");
                }
            }),
            Route::Product => self.request("view", move |shared| {
                shared.state.lock().load_product(generation);
            }),
            Route::Cart => {
                tokio::spawn(load_cart(Arc::clone(self), generation));
            }
        }

        Ok(())
    }

    /// Runs a click handler.
    fn dispatch(self: &Arc<Self>, action: Action, href: Option<String>) -> Result<()> {
        trace!(?action, "Click handler");
        let generation = self.state.lock().generation;

        match action {
            Action::Follow => {
                if let Some(href) = href {
                    let url = {
                        let state = self.state.lock();
                        Url::parse(&state.url)
                            .unwrap_or_else(|_| state.base().clone())
                            .join(&href)
                            .map_err(|e| Error::protocol(format!("Invalid href '{href}': {e}")))?
                    };
                    self.navigate(&url)?;
                }
            }
            Action::OpenModal(modal) => self.state.lock().modal = Some(modal),
            Action::CloseModal(modal) => {
                let mut state = self.state.lock();
                if state.modal == Some(modal) {
                    state.modal = None;
                }
            }
            Action::Logout => {
                self.state.lock().user = None;
                let index = self.index_url()?;
                self.navigate(&index)?;
            }
            Action::Category(category) => {
                let ticket = self.state.lock().issue_listing();
                self.request("bycat", move |shared| {
                    if !shared.state.lock().load_category(generation, ticket, category) {
                        trace!(ticket, %category, "Listing superseded");
                    }
                });
            }
            Action::NextPage | Action::PreviousPage => {
                let forward = action == Action::NextPage;
                let ticket = self.state.lock().issue_listing();
                self.request("pagination", move |shared| {
                    if !shared.state.lock().turn_page(generation, ticket, forward) {
                        trace!(ticket, "Listing superseded");
                    }
                });
            }
            Action::AddToCart(id) => {
                self.state.lock().add_to_cart(id);
                self.request("addtocart", |shared| shared.alert(MSG_PRODUCT_ADDED, None));
            }
            Action::Delete(id) => {
                self.state.lock().delete_item(id);
                self.request("deleteitem", |_| {});
            }
            Action::LogIn => {
                let credentials = self
                    .state
                    .lock()
                    .credentials("loginusername", "loginpassword");
                let Some((username, password)) = credentials else {
                    self.alert(MSG_FILL_CREDENTIALS, None);
                    return Ok(());
                };
                self.request("login", move |shared| {
                    let outcome = shared.state.lock().authenticate(&username, &password);
                    match outcome {
                        Ok(()) => {
                            debug!(%username, "Logged in");
                            if let Err(e) = shared.index_url().and_then(|url| shared.navigate(&url)) {
                                debug!(error = %e, "Reload after login failed");
                            }
                        }
                        Err(message) => shared.alert(message, None),
                    }
                });
            }
            Action::SignUp => {
                let credentials = self
                    .state
                    .lock()
                    .credentials("sign-username", "sign-password");
                let Some((username, password)) = credentials else {
                    self.alert(MSG_FILL_CREDENTIALS, None);
                    return Ok(());
                };
                self.request("signup", move |shared| {
                    let outcome = shared.state.lock().register(&username, &password);
                    match outcome {
                        Ok(()) => shared.alert(MSG_SIGNUP_OK, Some(Modal::Signup)),
                        Err(message) => shared.alert(message, None),
                    }
                });
            }
            Action::Purchase => {
                let outcome = self.state.lock().purchase();
                match outcome {
                    Ok(()) => self.request("deletecart", |_| {}),
                    Err(message) => self.alert(message, None),
                }
            }
            Action::ConfirmPurchase => {
                let index = self.index_url()?;
                self.navigate(&index)?;
            }
        }

        Ok(())
    }
}

/// Loads the cart: table after `/viewcart`, then one row per `/view`.
async fn load_cart(shared: Arc<Shared>, generation: u64) {
    sleep(shared.latency.api).await;
    shared.respond("viewcart", 200);
    sleep(shared.latency.render).await;

    let Some(entries) = shared.state.lock().begin_cart(generation) else {
        return;
    };

    for entry in entries {
        sleep(shared.latency.row).await;
        shared.respond("view", 200);
        if !shared.state.lock().push_cart_row(generation, entry) {
            return;
        }
    }

    shared.state.lock().finish_cart(generation);
}

// ============================================================================
// MemoryStorefront
// ============================================================================

/// A simulated storefront page.
///
/// Cheap to clone; clones share the page.
#[derive(Clone)]
pub struct MemoryStorefront {
    inner: Arc<Shared>,
}

impl fmt::Debug for MemoryStorefront {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("MemoryStorefront")
            .field("url", &state.url)
            .field("user", &state.user)
            .finish_non_exhaustive()
    }
}

impl MemoryStorefront {
    /// Creates a builder with the demo catalog and no accounts.
    #[inline]
    #[must_use]
    pub fn builder() -> MemoryStorefrontBuilder {
        MemoryStorefrontBuilder::default()
    }

    /// Builds a page serving the configured origins.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if either URL is invalid.
    pub fn from_config(config: &SuiteConfig) -> Result<Self> {
        Self::builder()
            .base_url(config.base_url.clone())
            .api_url(config.api_url.clone())
            .build()
    }

    /// Resolves `locator` against a fresh render and hands the result to `f`.
    fn with_dom<T>(&self, locator: &Locator, f: impl FnOnce(&Node, Vec<NodePath>) -> Result<T>) -> Result<T> {
        let dom = self.inner.state.lock().render();
        let paths = dom.resolve(locator)?;
        f(&dom, paths)
    }

    /// First match, which must be rendered for input.
    fn actionable(&self, locator: &Locator) -> Result<(Node, NodePath)> {
        self.with_dom(locator, |dom, paths| {
            paths
                .into_iter()
                .next()
                .filter(|path| dom.is_rendered(path))
                .and_then(|path| dom.at(&path).cloned().map(|node| (node, path)))
                .ok_or_else(|| Error::element_not_found(locator.to_string(), ElementState::Visible, 0))
        })
    }
}

// ============================================================================
// Browser Implementation
// ============================================================================

#[async_trait]
impl Browser for MemoryStorefront {
    async fn goto(&self, url: &str) -> Result<()> {
        if self.inner.closed.load(Ordering::SeqCst) {
            return Err(Error::ConnectionClosed);
        }
        let target = {
            let state = self.inner.state.lock();
            Url::parse(url)
                .or_else(|_| state.base().join(url))
                .map_err(|e| Error::protocol(format!("Invalid URL '{url}': {e}")))?
        };
        debug!(url = %target, "Navigating");
        self.inner.navigate(&target)
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.inner.state.lock().url.clone())
    }

    async fn click(&self, locator: &Locator) -> Result<()> {
        debug!(%locator, "Click");
        let (node, _) = self.actionable(locator)?;
        let href = node.attribute("href");
        match node.on_click {
            Some(action) => self.inner.dispatch(action, href),
            None => Ok(()),
        }
    }

    async fn fill(&self, locator: &Locator, text: &str) -> Result<()> {
        debug!(%locator, "Fill");
        let (node, _) = self.actionable(locator)?;
        match (node.tag, node.id) {
            ("input", Some(id)) => {
                self.inner.state.lock().inputs.insert(id, text.to_string());
                Ok(())
            }
            _ => Err(Error::script(format!("{locator} is not a fillable input"))),
        }
    }

    async fn press(&self, locator: &Locator, key: Key) -> Result<()> {
        // Modal inputs sit outside any form, so keys have no side effects
        let _ = self.actionable(locator)?;
        debug!(%locator, ?key, "Press");
        Ok(())
    }

    async fn count(&self, locator: &Locator) -> Result<usize> {
        self.with_dom(locator, |_, paths| Ok(paths.len()))
    }

    async fn text_content(&self, locator: &Locator) -> Result<Option<String>> {
        self.with_dom(locator, |dom, paths| {
            Ok(paths
                .first()
                .and_then(|path| dom.at(path))
                .map(Node::text_content))
        })
    }

    async fn all_text_contents(&self, locator: &Locator) -> Result<Vec<String>> {
        self.with_dom(locator, |dom, paths| {
            Ok(paths
                .iter()
                .filter_map(|path| dom.at(path))
                .map(Node::text_content)
                .collect())
        })
    }

    async fn attribute(&self, locator: &Locator, name: &str) -> Result<Option<String>> {
        self.with_dom(locator, |dom, paths| {
            Ok(paths
                .first()
                .and_then(|path| dom.at(path))
                .and_then(|node| node.attribute(name)))
        })
    }

    async fn is_visible(&self, locator: &Locator) -> Result<bool> {
        self.with_dom(locator, |dom, paths| {
            Ok(paths.first().is_some_and(|path| dom.is_rendered(path)))
        })
    }

    fn arm_dialog(&self) -> oneshot::Receiver<Dialog> {
        let (tx, rx) = oneshot::channel();
        *self.inner.dialog_slot.lock() = Some(tx);
        rx
    }

    async fn resolve_dialog(&self, action: DialogAction) -> Result<()> {
        let open = self
            .inner
            .open_dialog
            .lock()
            .take()
            .ok_or_else(|| Error::protocol("No dialog is showing"))?;
        debug!(?action, "Dialog resolved");
        self.inner.after_dialog(open.closes);
        Ok(())
    }

    fn subscribe_responses(&self) -> broadcast::Receiver<NetworkResponse> {
        self.inner.responses.subscribe()
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        Base64Standard
            .decode(BLANK_PNG)
            .map_err(|e| Error::script(format!("Invalid screenshot data: {e}")))
    }

    /// Blanks the page and drops pending loaders. Server-side state stays.
    async fn close(&self) -> Result<()> {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        let mut state = self.inner.state.lock();
        state.page = storefront::Page::Blank;
        state.url = "about:blank".to_string();
        state.generation += 1;
        debug!("Page closed");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::time::timeout;

    const HOME: &str = "https://www.demoblaze.com/index.html";

    fn page() -> MemoryStorefront {
        MemoryStorefront::builder()
            .user("alice", "secret")
            .build()
            .expect("storefront")
    }

    async fn settle() {
        sleep(Duration::from_secs(2)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_home_cards_load_after_entries() {
        let page = page();
        let mut responses = page.subscribe_responses();

        page.goto(HOME).await.expect("goto");
        assert_eq!(page.count(&Locator::css(".card")).await.expect("count"), 0);

        let response = responses.recv().await.expect("response");
        assert!(response.matches("/entries", 200));

        settle().await;
        assert_eq!(page.count(&Locator::css(".card")).await.expect("count"), 9);
        assert!(page.is_visible(&Locator::id("next2")).await.expect("visible"));
        assert!(!page.is_visible(&Locator::id("prev2")).await.expect("visible"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_to_cart_alerts_armed_receiver() {
        let page = page();
        page.goto("https://www.demoblaze.com/prod.html?idp_=1")
            .await
            .expect("goto");
        settle().await;

        let dialog = page.arm_dialog();
        page.click(&Locator::css("a").has_text("Add to cart"))
            .await
            .expect("click");

        let dialog = timeout(Duration::from_secs(5), dialog)
            .await
            .expect("in time")
            .expect("dialog");
        assert_eq!(dialog.message, "Product added.");
        page.resolve_dialog(DialogAction::Accept).await.expect("resolve");
    }

    #[tokio::test(start_paused = true)]
    async fn test_unarmed_dialog_is_dismissed() {
        let page = page();
        page.goto(HOME).await.expect("goto");
        settle().await;

        page.click(&Locator::id("signin2")).await.expect("open");
        page.click(&Locator::css("#signInModal .btn-primary"))
            .await
            .expect("submit");

        let err = page.resolve_dialog(DialogAction::Accept).await.unwrap_err();
        assert!(matches!(err, Error::Protocol { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_shows_welcome() {
        let page = page();
        page.goto(HOME).await.expect("goto");
        settle().await;

        page.click(&Locator::id("login2")).await.expect("open");
        page.fill(&Locator::id("loginusername"), "alice").await.expect("fill");
        page.fill(&Locator::id("loginpassword"), "secret").await.expect("fill");
        page.click(&Locator::css("button").has_text("Log in"))
            .await
            .expect("submit");
        settle().await;

        let welcome = page
            .text_content(&Locator::id("nameofuser"))
            .await
            .expect("text");
        assert_eq!(welcome.as_deref(), Some("Welcome alice"));
        assert!(!page.is_visible(&Locator::id("login2")).await.expect("visible"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hidden_elements_are_not_actionable() {
        let page = page();
        page.goto(HOME).await.expect("goto");

        let err = page.fill(&Locator::id("loginusername"), "x").await.unwrap_err();
        assert!(matches!(err, Error::ElementNotFound { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_foreign_host_fails() {
        let page = page();
        assert!(page.goto("https://example.com/").await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_blanks_page_and_refuses_navigation() {
        let page = page();
        page.goto(HOME).await.expect("goto");

        page.close().await.expect("close");
        page.close().await.expect("second close");
        settle().await;

        assert_eq!(page.current_url().await.expect("url"), "about:blank");
        assert_eq!(page.count(&Locator::css(".card")).await.expect("count"), 0);
        assert!(matches!(page.goto(HOME).await, Err(Error::ConnectionClosed)));
    }

    #[tokio::test]
    async fn test_screenshot_is_png() {
        let bytes = page().screenshot().await.expect("screenshot");
        assert_eq!(&bytes[1..4], b"PNG");
    }
}
