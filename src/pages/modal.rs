//! Bootstrap modal helper, addressed by element id.

use std::sync::Arc;

use crate::browser::Browser;
use crate::error::Result;
use crate::pages::Timeouts;
use crate::pages::locators::modal;
use crate::sync::actions;

/// Visibility waits and closing for one modal.
#[derive(Clone)]
pub struct ModalComponent {
    browser: Arc<dyn Browser>,
    id: &'static str,
    timeouts: Timeouts,
}

impl ModalComponent {
    /// Creates the helper for the modal with element id `id`.
    #[must_use]
    pub fn new(browser: Arc<dyn Browser>, id: &'static str, timeouts: Timeouts) -> Self {
        Self { browser, id, timeouts }
    }

    /// Element id of the modal.
    #[inline]
    #[must_use]
    pub fn id(&self) -> &'static str {
        self.id
    }

    pub async fn wait_visible(&self) -> Result<()> {
        actions::wait_visible(self.browser.as_ref(), &modal::root(self.id), self.timeouts.action).await
    }

    pub async fn wait_hidden(&self) -> Result<()> {
        actions::wait_hidden(self.browser.as_ref(), &modal::root(self.id), self.timeouts.action).await
    }

    /// Returns whether the modal is currently shown.
    pub async fn is_visible(&self) -> Result<bool> {
        self.browser.is_visible(&modal::root(self.id)).await
    }

    /// Title text, empty when absent.
    pub async fn title(&self) -> Result<String> {
        Ok(self
            .browser
            .text_content(&modal::title(self.id))
            .await?
            .unwrap_or_default()
            .trim()
            .to_string())
    }

    /// Clicks the header cross and waits for the modal to hide.
    pub async fn close(&self) -> Result<()> {
        actions::click(self.browser.as_ref(), &modal::close(self.id), self.timeouts.action).await?;
        self.wait_hidden().await
    }

    /// Clicks the footer "Close" button and waits for the modal to hide.
    pub async fn dismiss(&self) -> Result<()> {
        actions::click(self.browser.as_ref(), &modal::secondary(self.id), self.timeouts.action).await?;
        self.wait_hidden().await
    }
}

impl std::fmt::Debug for ModalComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModalComponent")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::browser::{Locator, MemoryStorefront};
    use crate::pages::locators::SIGNUP_MODAL;

    #[tokio::test(start_paused = true)]
    async fn test_open_and_close() {
        let page = MemoryStorefront::builder().build().expect("storefront");
        page.goto("https://www.demoblaze.com/").await.expect("goto");
        let signup = ModalComponent::new(Arc::new(page.clone()), SIGNUP_MODAL, Timeouts::default());

        assert!(!signup.is_visible().await.expect("visible"));
        page.click(&Locator::id("signin2")).await.expect("open");
        signup.wait_visible().await.expect("shown");
        assert_eq!(signup.title().await.expect("title"), "Sign up");

        signup.close().await.expect("close");
        assert!(!signup.is_visible().await.expect("visible"));
    }
}
