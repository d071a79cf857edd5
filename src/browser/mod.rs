//! Browser driver contract.
//!
//! The page objects never talk to a concrete browser. They hold an
//! `Arc<dyn Browser>` and go through this trait, which mirrors the handful of
//! driver operations the suite needs:
//!
//! | Operation | Purpose |
//! |-----------|---------|
//! | [`Browser::goto`] | Navigate the page |
//! | [`Browser::click`], [`Browser::fill`], [`Browser::press`] | Input |
//! | [`Browser::count`], [`Browser::text_content`], [`Browser::attribute`], [`Browser::is_visible`] | DOM reads |
//! | [`Browser::wait_for`] | Wait for a locator state |
//! | [`Browser::arm_dialog`], [`Browser::resolve_dialog`] | Native dialogs |
//! | [`Browser::subscribe_responses`] | Network responses |
//!
//! Two implementations ship with the crate:
//!
//! | Type | Backend |
//! |------|---------|
//! | [`CdpBrowser`] | Chrome over the DevTools Protocol |
//! | [`MemoryStorefront`] | In-memory simulation of the storefront UI |

// ============================================================================
// Submodules
// ============================================================================

/// Chrome DevTools Protocol backend.
pub mod cdp;

/// Keyboard keys.
pub mod keyboard;

/// Lazy element locators.
pub mod locator;

/// In-memory storefront simulation.
pub mod memory;

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{broadcast, oneshot};
use tokio::time::{Instant, sleep};
use tracing::trace;

use crate::error::{Error, Result};

// ============================================================================
// Re-exports
// ============================================================================

pub use cdp::CdpBrowser;
pub use keyboard::Key;
pub use locator::Locator;
pub use memory::MemoryStorefront;

// ============================================================================
// Constants
// ============================================================================

/// Interval between state checks in the default [`Browser::wait_for`].
pub const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(100);

// ============================================================================
// ElementState
// ============================================================================

/// State a locator can be waited into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementState {
    /// At least one matching element is in the DOM.
    Attached,
    /// No matching element is in the DOM.
    Detached,
    /// The first matching element is rendered and visible.
    Visible,
    /// No matching element is visible (missing counts as hidden).
    Hidden,
}

impl fmt::Display for ElementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Attached => "attached",
            Self::Detached => "detached",
            Self::Visible => "visible",
            Self::Hidden => "hidden",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Dialog
// ============================================================================

/// Kind of native dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    /// `window.alert`
    Alert,
    /// `window.confirm`
    Confirm,
    /// `window.prompt`
    Prompt,
    /// `beforeunload` confirmation
    BeforeUnload,
}

impl DialogKind {
    /// Parses the CDP dialog type string.
    #[must_use]
    pub fn from_cdp(value: &str) -> Self {
        match value {
            "confirm" => Self::Confirm,
            "prompt" => Self::Prompt,
            "beforeunload" => Self::BeforeUnload,
            _ => Self::Alert,
        }
    }
}

/// A native dialog that opened on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    /// Dialog kind.
    pub kind: DialogKind,
    /// Message text shown by the dialog.
    pub message: String,
}

/// What to do with an open dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogAction {
    /// Press OK.
    #[default]
    Accept,
    /// Press Cancel / close.
    Dismiss,
}

impl DialogAction {
    /// Returns `true` for [`DialogAction::Accept`].
    #[inline]
    #[must_use]
    pub fn is_accept(self) -> bool {
        matches!(self, Self::Accept)
    }
}

// ============================================================================
// NetworkResponse
// ============================================================================

/// A network response observed by the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkResponse {
    /// Response URL.
    pub url: String,
    /// HTTP status code.
    pub status: u16,
}

impl NetworkResponse {
    /// Creates a response record.
    #[inline]
    pub fn new(url: impl Into<String>, status: u16) -> Self {
        Self {
            url: url.into(),
            status,
        }
    }

    /// Returns `true` if the URL contains `pattern` and the status matches.
    #[inline]
    #[must_use]
    pub fn matches(&self, pattern: &str, status: u16) -> bool {
        self.status == status && self.url.contains(pattern)
    }
}

// ============================================================================
// Browser
// ============================================================================

/// A single page the suite can drive.
///
/// A page belongs to exactly one scenario for its lifetime.
///
/// # Dialogs
///
/// [`Browser::arm_dialog`] registers interest in the next dialog and returns
/// immediately. Arm before triggering the action that opens the dialog. A
/// dialog that opens while nothing is armed is dismissed by the driver and
/// never observed.
///
/// # Responses
///
/// [`Browser::subscribe_responses`] subscribes synchronously, so every
/// response after the call is delivered to the returned receiver.
#[async_trait]
pub trait Browser: Send + Sync {
    /// Navigates to `url` and waits for `DOMContentLoaded`.
    async fn goto(&self, url: &str) -> Result<()>;

    /// Returns the current page URL.
    async fn current_url(&self) -> Result<String>;

    /// Clicks the first element matching `locator`.
    async fn click(&self, locator: &Locator) -> Result<()>;

    /// Replaces the value of the first input matching `locator`.
    async fn fill(&self, locator: &Locator, text: &str) -> Result<()>;

    /// Presses `key` with focus on the first element matching `locator`.
    async fn press(&self, locator: &Locator, key: Key) -> Result<()>;

    /// Counts elements matching `locator`.
    async fn count(&self, locator: &Locator) -> Result<usize>;

    /// Returns the text content of the first match, `None` if nothing matches.
    async fn text_content(&self, locator: &Locator) -> Result<Option<String>>;

    /// Returns the text content of every match in document order.
    async fn all_text_contents(&self, locator: &Locator) -> Result<Vec<String>>;

    /// Returns an attribute of the first match.
    async fn attribute(&self, locator: &Locator, name: &str) -> Result<Option<String>>;

    /// Returns `true` if the first match is visible.
    async fn is_visible(&self, locator: &Locator) -> Result<bool>;

    /// Waits until `locator` reaches `state`.
    ///
    /// The default implementation polls every [`WAIT_POLL_INTERVAL`].
    ///
    /// # Errors
    ///
    /// [`Error::ElementNotFound`] when the state is not reached in time.
    async fn wait_for(&self, locator: &Locator, state: ElementState, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;

        loop {
            let reached = match state {
                ElementState::Attached => self.count(locator).await? > 0,
                ElementState::Detached => self.count(locator).await? == 0,
                ElementState::Visible => self.is_visible(locator).await?,
                ElementState::Hidden => !self.is_visible(locator).await?,
            };

            if reached {
                return Ok(());
            }

            if Instant::now() >= deadline {
                return Err(Error::element_not_found(
                    locator.to_string(),
                    state,
                    timeout.as_millis() as u64,
                ));
            }

            trace!(%locator, %state, "State not reached yet");
            sleep(WAIT_POLL_INTERVAL).await;
        }
    }

    /// Registers a one-shot receiver for the next dialog.
    ///
    /// Re-arming replaces a previous, unfired registration.
    fn arm_dialog(&self) -> oneshot::Receiver<Dialog>;

    /// Accepts or dismisses the currently open dialog.
    async fn resolve_dialog(&self, action: DialogAction) -> Result<()>;

    /// Subscribes to network responses observed from now on.
    fn subscribe_responses(&self) -> broadcast::Receiver<NetworkResponse>;

    /// Captures the viewport as PNG bytes.
    async fn screenshot(&self) -> Result<Vec<u8>>;

    /// Releases the page and whatever was created for it.
    ///
    /// Called once per scenario; later calls are no-ops. The default has
    /// nothing to release.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
