//! Native dialog interception.
//!
//! An interceptor is armed before the action that opens the dialog and
//! catches exactly one dialog:
//!
//! ```ignore
//! let armed = DialogInterceptor::arm(browser, DialogAction::Accept);
//! actions::click(browser, &add_button, timeout).await?;
//! let message = armed.message(Duration::from_secs(10)).await?;
//! ```
//!
//! Arming after the trigger races the dialog and loses: the driver dismisses
//! dialogs nobody is waiting for.

use std::future::Future;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time::timeout;
use tracing::info;

use crate::browser::{Browser, Dialog, DialogAction};
use crate::error::{Error, Result};

// ============================================================================
// DialogInterceptor
// ============================================================================

/// Entry point for one-shot dialog capture.
#[derive(Debug, Clone, Copy)]
pub struct DialogInterceptor;

impl DialogInterceptor {
    /// Registers interest in the next dialog.
    ///
    /// Registration is synchronous: a dialog opened by anything that runs
    /// after this call is caught.
    #[must_use = "an armed interceptor does nothing until awaited"]
    pub fn arm(browser: &dyn Browser, action: DialogAction) -> ArmedDialog<'_> {
        ArmedDialog {
            browser,
            receiver: browser.arm_dialog(),
            action,
        }
    }
}

// ============================================================================
// ArmedDialog
// ============================================================================

/// A registered, not yet fired dialog capture.
pub struct ArmedDialog<'a> {
    browser: &'a dyn Browser,
    receiver: oneshot::Receiver<Dialog>,
    action: DialogAction,
}

impl ArmedDialog<'_> {
    /// Waits for the dialog, answers it and returns its message.
    ///
    /// # Errors
    ///
    /// - [`Error::DialogTimeout`] if no dialog opens within `wait`
    /// - [`Error::ChannelClosed`] if the page went away
    pub async fn message(self, wait: Duration) -> Result<String> {
        let dialog = timeout(wait, self.receiver)
            .await
            .map_err(|_| Error::dialog_timeout(wait.as_millis() as u64))??;

        info!(message = %dialog.message, action = ?self.action, "Alert captured");
        self.browser.resolve_dialog(self.action).await?;
        Ok(dialog.message)
    }
}

/// Arms, runs `trigger`, then waits for the dialog message.
///
/// A failing trigger propagates its error without waiting.
pub async fn capture_dialog<F, Fut>(
    browser: &dyn Browser,
    action: DialogAction,
    wait: Duration,
    trigger: F,
) -> Result<String>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let armed = DialogInterceptor::arm(browser, action);
    trigger().await?;
    armed.message(wait).await
}

// ============================================================================
// Tests
// ============================================================================
