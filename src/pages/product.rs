//! Product detail page.

use std::sync::Arc;

use tracing::info;

use crate::browser::{Browser, DialogAction};
use crate::error::{Error, Result};
use crate::model::{Product, parse_price};
use crate::pages::locators::product;
use crate::pages::{HeaderComponent, Timeouts};
use crate::sync::{DialogInterceptor, actions};

/// Product detail page object.
#[derive(Clone)]
pub struct ProductPage {
    browser: Arc<dyn Browser>,
    timeouts: Timeouts,
    /// Site header.
    pub header: HeaderComponent,
}

impl ProductPage {
    /// Creates the page object.
    #[must_use]
    pub fn new(browser: Arc<dyn Browser>, timeouts: Timeouts) -> Self {
        Self {
            header: HeaderComponent::new(Arc::clone(&browser), timeouts),
            browser,
            timeouts,
        }
    }

    #[inline]
    fn browser(&self) -> &dyn Browser {
        self.browser.as_ref()
    }

    /// Name, price and description as shown.
    pub async fn product_details(&self) -> Result<Product> {
        let name = actions::text(self.browser(), &product::name(), self.timeouts.product).await?;
        let price = actions::text(self.browser(), &product::price(), self.timeouts.action).await?;
        let description = self
            .browser()
            .text_content(&product::description())
            .await?
            .unwrap_or_default();

        Ok(Product {
            name: name.trim().to_string(),
            price: parse_price(&price),
            description: description.trim().to_string(),
        })
    }

    pub async fn product_name(&self) -> Result<String> {
        let name = self.browser().text_content(&product::name()).await?.unwrap_or_default();
        Ok(name.trim().to_string())
    }

    pub async fn product_price(&self) -> Result<f64> {
        let price = self.browser().text_content(&product::price()).await?.unwrap_or_default();
        Ok(parse_price(&price))
    }

    /// Clicks "Add to cart" and returns the confirmation alert.
    pub async fn add_to_cart(&self) -> Result<String> {
        info!("Adding product to cart");
        let armed = DialogInterceptor::arm(self.browser(), DialogAction::Accept);
        actions::click(self.browser(), &product::add_to_cart(), self.timeouts.action).await?;
        armed.message(self.timeouts.dialog).await
    }

    /// Adds to cart and checks the alert reports success.
    ///
    /// # Errors
    ///
    /// [`Error::Assertion`] if the alert does not mention "added".
    pub async fn add_to_cart_and_verify(&self) -> Result<String> {
        let message = self.add_to_cart().await?;
        if !message.to_lowercase().contains("added") {
            return Err(Error::assertion(format!("Unexpected add-to-cart alert: {message}")));
        }
        Ok(message)
    }

    pub async fn is_on_product_page(&self) -> Result<bool> {
        Ok(self.browser().current_url().await?.contains("prod.html"))
    }

    pub async fn is_product_image_visible(&self) -> Result<bool> {
        actions::probe_visible(self.browser(), &product::image(), self.timeouts.probe).await
    }
}

impl std::fmt::Debug for ProductPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductPage").finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
