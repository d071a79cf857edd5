//! Page objects for the storefront.
//!
//! Page objects are composed, not layered: each one owns the shared browser
//! handle plus a [`Timeouts`] value and calls into [`crate::sync`] for every
//! wait. Components ([`HeaderComponent`], [`ModalComponent`]) are embedded
//! where a page needs them.
//!
//! | Page | Covers |
//! |------|--------|
//! | [`HomePage`] | product grid, categories, pagination |
//! | [`LoginPage`] | login and signup modals, logout |
//! | [`ProductPage`] | detail view, add to cart |
//! | [`CartPage`] | cart table, total, deletion, checkout |
//!
//! [`Pages`] builds all of them over one browser for a scenario.

// ============================================================================
// Submodules
// ============================================================================

pub mod cart;
pub mod header;
pub mod home;
pub mod locators;
pub mod login;
pub mod modal;
pub mod product;

// ============================================================================
// Imports
// ============================================================================

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use url::Url;

use crate::browser::Browser;
use crate::config::SuiteConfig;
use crate::error::Result;

// ============================================================================
// Re-exports
// ============================================================================

pub use cart::CartPage;
pub use header::HeaderComponent;
pub use home::HomePage;
pub use login::LoginPage;
pub use modal::ModalComponent;
pub use product::ProductPage;

// ============================================================================
// Timeouts
// ============================================================================

/// Per-wait budgets used by the page objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Default visibility wait before clicks and fills.
    pub action: Duration,
    /// Quick yes/no visibility probes.
    pub probe: Duration,
    /// Element presence (cart table, product cards).
    pub element: Duration,
    /// Product detail load after navigation.
    pub product: Duration,
    /// Native dialog capture.
    pub dialog: Duration,
    /// Soft response races (`/entries`, `/bycat`, `/pagination`, `/viewcart` on click).
    pub soft_response: Duration,
    /// Hard response races (`/deleteitem`).
    pub hard_response: Duration,
    /// Hard `/viewcart` race when loading `cart.html`.
    pub navigation_response: Duration,
    /// Cart total resolution deadline.
    pub total: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            action: crate::config::DEFAULT_TIMEOUT,
            probe: Duration::from_secs(5),
            element: Duration::from_secs(10),
            product: Duration::from_secs(15),
            dialog: Duration::from_secs(10),
            soft_response: Duration::from_secs(5),
            hard_response: Duration::from_secs(10),
            navigation_response: Duration::from_secs(15),
            total: Duration::from_secs(15),
        }
    }
}

impl Timeouts {
    /// Defaults with the action timeout taken from `config`.
    #[must_use]
    pub fn from_config(config: &SuiteConfig) -> Self {
        Self {
            action: config.timeout,
            ..Self::default()
        }
    }
}

// ============================================================================
// Pages
// ============================================================================

/// Every page object over one browser.
#[derive(Clone)]
pub struct Pages {
    /// Product grid.
    pub home: HomePage,
    /// Login and signup.
    pub login: LoginPage,
    /// Product detail.
    pub product: ProductPage,
    /// Cart and checkout.
    pub cart: CartPage,
    /// Site header.
    pub header: HeaderComponent,
}

impl Pages {
    /// Builds the page objects for `config`.
    ///
    /// # Errors
    ///
    /// [`crate::Error::Config`] if the base URL does not parse.
    pub fn new(browser: Arc<dyn Browser>, config: &SuiteConfig) -> Result<Self> {
        let base_url = config.parsed_base_url()?;
        let timeouts = Timeouts::from_config(config);
        Ok(Self::with_timeouts(browser, base_url, timeouts))
    }

    /// Builds the page objects with explicit timeouts.
    #[must_use]
    pub fn with_timeouts(browser: Arc<dyn Browser>, base_url: Url, timeouts: Timeouts) -> Self {
        Self {
            home: HomePage::new(Arc::clone(&browser), base_url.clone(), timeouts),
            login: LoginPage::new(Arc::clone(&browser), timeouts),
            product: ProductPage::new(Arc::clone(&browser), timeouts),
            cart: CartPage::new(Arc::clone(&browser), base_url, timeouts),
            header: HeaderComponent::new(browser, timeouts),
        }
    }
}

impl std::fmt::Debug for Pages {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pages").finish_non_exhaustive()
    }
}

// ============================================================================
// Screenshots
// ============================================================================

/// Captures the page and writes `<dir>/<name>.png`.
///
/// Characters outside `[A-Za-z0-9_-]` in `name` become `_`.
///
/// # Errors
///
/// Driver errors from the capture, or [`crate::Error::Io`] on write.
pub async fn save_screenshot(browser: &dyn Browser, dir: &Path, name: &str) -> Result<PathBuf> {
    let bytes = browser.screenshot().await?;

    let file_name: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let path = dir.join(format!("{file_name}.png"));

    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(&path, &bytes).await?;

    info!(path = %path.display(), bytes = bytes.len(), "Screenshot saved");
    Ok(path)
}

/// Ends a scenario's use of `browser`.
///
/// A failed scenario first gets `<dir>/<scenario>.png`; the page is closed
/// either way. Returns the screenshot path if one was written. Problems are
/// logged rather than returned so they never mask the scenario's own result.
pub async fn finish_scenario(browser: &dyn Browser, dir: &Path, scenario: &str, failed: bool) -> Option<PathBuf> {
    let screenshot = if failed {
        match save_screenshot(browser, dir, scenario).await {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(error = %e, scenario, "Failure screenshot not saved");
                None
            }
        }
    } else {
        None
    };

    if let Err(e) = browser.close().await {
        warn!(error = %e, scenario, "Page not closed");
    }
    screenshot
}

// ============================================================================
// Tests
// ============================================================================
