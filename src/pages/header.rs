//! Site header shared by every page.

use std::sync::Arc;

use tracing::debug;

use crate::browser::Browser;
use crate::error::Result;
use crate::pages::Timeouts;
use crate::pages::locators::header;
use crate::sync::actions;

/// Navigation bar component.
#[derive(Clone)]
pub struct HeaderComponent {
    browser: Arc<dyn Browser>,
    timeouts: Timeouts,
}

impl HeaderComponent {
    /// Creates the component.
    #[must_use]
    pub fn new(browser: Arc<dyn Browser>, timeouts: Timeouts) -> Self {
        Self { browser, timeouts }
    }

    pub async fn click_logo(&self) -> Result<()> {
        debug!("Clicking logo");
        actions::click(self.browser.as_ref(), &header::logo(), self.timeouts.action).await
    }

    pub async fn click_home(&self) -> Result<()> {
        debug!("Clicking Home");
        actions::click(self.browser.as_ref(), &header::home(), self.timeouts.action).await
    }

    pub async fn click_cart(&self) -> Result<()> {
        debug!("Clicking Cart");
        actions::click(self.browser.as_ref(), &header::cart(), self.timeouts.action).await
    }

    pub async fn click_login(&self) -> Result<()> {
        debug!("Clicking Log in");
        actions::click(self.browser.as_ref(), &header::login(), self.timeouts.action).await
    }

    pub async fn click_signup(&self) -> Result<()> {
        debug!("Clicking Sign up");
        actions::click(self.browser.as_ref(), &header::signup(), self.timeouts.action).await
    }

    pub async fn click_logout(&self) -> Result<()> {
        debug!("Clicking Log out");
        actions::click(self.browser.as_ref(), &header::logout(), self.timeouts.action).await
    }

    /// Returns whether the welcome label shows up within the probe timeout.
    pub async fn is_logged_in(&self) -> Result<bool> {
        actions::probe_visible(self.browser.as_ref(), &header::welcome(), self.timeouts.probe).await
    }

    /// Welcome label text, empty when absent.
    pub async fn welcome_message(&self) -> Result<String> {
        Ok(self
            .browser
            .text_content(&header::welcome())
            .await?
            .unwrap_or_default())
    }

    /// Waits for the login link, shown only to guests.
    pub async fn wait_for_login_link(&self) -> Result<()> {
        actions::wait_visible(self.browser.as_ref(), &header::login(), self.timeouts.action).await
    }
}

impl std::fmt::Debug for HeaderComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeaderComponent")
            .field("timeouts", &self.timeouts)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
