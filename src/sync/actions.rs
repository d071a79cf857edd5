//! Browser action primitives with explicit timeouts.
//!
//! Every input waits for its target to become visible first, so a missing
//! element surfaces as [`Error::ElementNotFound`] naming the locator, the
//! state and the timeout.

use std::time::Duration;

use tracing::trace;

use crate::browser::{Browser, ElementState, Locator};
use crate::error::{Error, Result};

/// Waits until `locator` is visible.
#[inline]
pub async fn wait_visible(browser: &dyn Browser, locator: &Locator, timeout: Duration) -> Result<()> {
    browser.wait_for(locator, ElementState::Visible, timeout).await
}

/// Waits until `locator` is hidden or gone.
#[inline]
pub async fn wait_hidden(browser: &dyn Browser, locator: &Locator, timeout: Duration) -> Result<()> {
    browser.wait_for(locator, ElementState::Hidden, timeout).await
}

/// Waits until `locator` is in the DOM.
#[inline]
pub async fn wait_attached(browser: &dyn Browser, locator: &Locator, timeout: Duration) -> Result<()> {
    browser.wait_for(locator, ElementState::Attached, timeout).await
}

/// Waits for `locator` to be visible, then clicks it.
pub async fn click(browser: &dyn Browser, locator: &Locator, timeout: Duration) -> Result<()> {
    wait_visible(browser, locator, timeout).await?;
    browser.click(locator).await
}

/// Waits for `locator` to be visible, then replaces its value.
pub async fn fill(browser: &dyn Browser, locator: &Locator, text: &str, timeout: Duration) -> Result<()> {
    wait_visible(browser, locator, timeout).await?;
    browser.fill(locator, text).await
}

/// Waits for `locator` to be visible, then reads its text (empty if none).
pub async fn text(browser: &dyn Browser, locator: &Locator, timeout: Duration) -> Result<String> {
    wait_visible(browser, locator, timeout).await?;
    Ok(browser.text_content(locator).await?.unwrap_or_default())
}

/// Returns whether `locator` becomes visible within `timeout`.
///
/// Only the wait timing out maps to `false`; driver failures propagate.
pub async fn probe_visible(browser: &dyn Browser, locator: &Locator, timeout: Duration) -> Result<bool> {
    match wait_visible(browser, locator, timeout).await {
        Ok(()) => Ok(true),
        Err(Error::ElementNotFound { .. }) => {
            trace!(%locator, "Not visible");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

// ============================================================================
// Tests
// ============================================================================
