//! Login, signup and logout.

use std::sync::Arc;

use tracing::info;

use crate::browser::{Browser, DialogAction, Key, Locator};
use crate::error::{Error, Result};
use crate::model::UserCredentials;
use crate::pages::locators::{LOGIN_MODAL, SIGNUP_MODAL, account, header, modal};
use crate::pages::{HeaderComponent, ModalComponent, Timeouts};
use crate::sync::{DialogInterceptor, actions};

/// Account modals and the header links that open them.
#[derive(Clone)]
pub struct LoginPage {
    browser: Arc<dyn Browser>,
    timeouts: Timeouts,
    /// Site header.
    pub header: HeaderComponent,
    /// Login modal.
    pub login_modal: ModalComponent,
    /// Signup modal.
    pub signup_modal: ModalComponent,
}

impl LoginPage {
    /// Creates the page object.
    #[must_use]
    pub fn new(browser: Arc<dyn Browser>, timeouts: Timeouts) -> Self {
        Self {
            header: HeaderComponent::new(Arc::clone(&browser), timeouts),
            login_modal: ModalComponent::new(Arc::clone(&browser), LOGIN_MODAL, timeouts),
            signup_modal: ModalComponent::new(Arc::clone(&browser), SIGNUP_MODAL, timeouts),
            browser,
            timeouts,
        }
    }

    #[inline]
    fn browser(&self) -> &dyn Browser {
        self.browser.as_ref()
    }

    // ========================================================================
    // Modals
    // ========================================================================

    pub async fn open_login_modal(&self) -> Result<()> {
        info!("Opening login modal");
        self.header.click_login().await?;
        self.login_modal.wait_visible().await
    }

    pub async fn open_signup_modal(&self) -> Result<()> {
        info!("Opening signup modal");
        self.header.click_signup().await?;
        self.signup_modal.wait_visible().await
    }

    pub async fn close_login_modal(&self) -> Result<()> {
        self.login_modal.dismiss().await
    }

    pub async fn close_signup_modal(&self) -> Result<()> {
        self.signup_modal.dismiss().await
    }

    pub async fn is_login_modal_visible(&self) -> Result<bool> {
        self.login_modal.is_visible().await
    }

    pub async fn is_signup_modal_visible(&self) -> Result<bool> {
        self.signup_modal.is_visible().await
    }

    /// Returns whether the login form shows both inputs and both buttons.
    pub async fn login_form_complete(&self) -> Result<bool> {
        self.all_visible([
            account::login_username(),
            account::login_password(),
            account::login_button(),
            modal::secondary(LOGIN_MODAL),
        ])
        .await
    }

    /// Returns whether the signup form shows both inputs and both buttons.
    pub async fn signup_form_complete(&self) -> Result<bool> {
        self.all_visible([
            account::signup_username(),
            account::signup_password(),
            account::signup_button(),
            modal::secondary(SIGNUP_MODAL),
        ])
        .await
    }

    async fn all_visible(&self, locators: [Locator; 4]) -> Result<bool> {
        for locator in &locators {
            if !self.browser().is_visible(locator).await? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    // ========================================================================
    // Form input
    // ========================================================================

    pub async fn enter_login_username(&self, username: &str) -> Result<()> {
        actions::fill(self.browser(), &account::login_username(), username, self.timeouts.action).await
    }

    pub async fn enter_login_password(&self, password: &str) -> Result<()> {
        actions::fill(self.browser(), &account::login_password(), password, self.timeouts.action).await
    }

    pub async fn enter_signup_username(&self, username: &str) -> Result<()> {
        actions::fill(self.browser(), &account::signup_username(), username, self.timeouts.action).await
    }

    pub async fn enter_signup_password(&self, password: &str) -> Result<()> {
        actions::fill(self.browser(), &account::signup_password(), password, self.timeouts.action).await
    }

    /// Clicks the login submit button `times` times in a row.
    pub async fn click_login_button(&self, times: usize) -> Result<()> {
        for _ in 0..times {
            actions::click(self.browser(), &account::login_button(), self.timeouts.action).await?;
        }
        Ok(())
    }

    pub async fn click_signup_button(&self) -> Result<()> {
        actions::click(self.browser(), &account::signup_button(), self.timeouts.action).await
    }

    /// Presses Enter in the login password field.
    pub async fn press_enter_to_login(&self) -> Result<()> {
        let password = account::login_password();
        actions::wait_visible(self.browser(), &password, self.timeouts.action).await?;
        self.browser().press(&password, Key::Enter).await
    }

    // ========================================================================
    // Flows
    // ========================================================================

    /// Fills the login form and submits it. The modal must be open.
    pub async fn login(&self, credentials: &UserCredentials) -> Result<()> {
        info!(username = %credentials.username, "Logging in");
        self.enter_login_username(&credentials.username).await?;
        self.enter_login_password(&credentials.password).await?;
        self.click_login_button(1).await
    }

    /// Submits the login form and returns the alert it raises.
    pub async fn login_with_alert(&self, credentials: &UserCredentials) -> Result<String> {
        info!(username = %credentials.username, "Logging in, expecting an alert");
        let armed = DialogInterceptor::arm(self.browser(), DialogAction::Accept);
        self.enter_login_username(&credentials.username).await?;
        self.enter_login_password(&credentials.password).await?;
        self.click_login_button(1).await?;
        armed.message(self.timeouts.dialog).await
    }

    /// Submits the signup form and returns the alert it raises.
    pub async fn signup(&self, credentials: &UserCredentials) -> Result<String> {
        info!(username = %credentials.username, "Signing up");
        let armed = DialogInterceptor::arm(self.browser(), DialogAction::Accept);
        self.enter_signup_username(&credentials.username).await?;
        self.enter_signup_password(&credentials.password).await?;
        self.click_signup_button().await?;
        armed.message(self.timeouts.dialog).await
    }

    /// Waits for the welcome label and checks it names `username`.
    ///
    /// # Errors
    ///
    /// [`Error::Assertion`] if the label shows a different user.
    pub async fn verify_login_success(&self, username: &str) -> Result<()> {
        actions::wait_visible(self.browser(), &header::welcome(), self.timeouts.element).await?;
        let welcome = self.header.welcome_message().await?;
        if !welcome.contains(username) {
            return Err(Error::assertion(format!(
                "Expected welcome message to contain '{username}', got '{welcome}'"
            )));
        }
        Ok(())
    }

    pub async fn is_logged_in(&self) -> Result<bool> {
        self.header.is_logged_in().await
    }

    /// Logs out and waits for the login link to come back.
    pub async fn logout(&self) -> Result<()> {
        info!("Logging out");
        self.header.click_logout().await?;
        self.header.wait_for_login_link().await
    }
}

impl std::fmt::Debug for LoginPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginPage").finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
