//! Cart page: rows, total, deletion and checkout.
//!
//! The cart table is filled one row per `/view` call after `/viewcart`
//! answers, with no completion signal. Reads therefore go through the
//! stabilization poller (row count) or the total state machine (total).
//! Deletion waits for the server to confirm, then reloads the page and
//! waits for the reload's `/viewcart` before reading again. The table body
//! is static markup, so its presence says nothing about the rows.

use std::sync::Arc;

use tracing::{debug, info};
use url::Url;

use crate::browser::{Browser, Locator};
use crate::error::{Error, Result};
use crate::model::{CartItem, OrderInfo, parse_price};
use crate::pages::locators::{ORDER_MODAL, cart};
use crate::pages::{HeaderComponent, ModalComponent, Timeouts};
use crate::sync::{
    RaceMode, StabilizationPolicy, TotalProbe, actions, poll_until_stable, race_response, resolve_total,
};

/// Cart and checkout page object.
#[derive(Clone)]
pub struct CartPage {
    browser: Arc<dyn Browser>,
    base_url: Url,
    timeouts: Timeouts,
    /// Site header.
    pub header: HeaderComponent,
    /// "Place order" modal.
    pub order_modal: ModalComponent,
}

impl CartPage {
    /// Creates the page object.
    #[must_use]
    pub fn new(browser: Arc<dyn Browser>, base_url: Url, timeouts: Timeouts) -> Self {
        Self {
            header: HeaderComponent::new(Arc::clone(&browser), timeouts),
            order_modal: ModalComponent::new(Arc::clone(&browser), ORDER_MODAL, timeouts),
            browser,
            base_url,
            timeouts,
        }
    }

    #[inline]
    fn browser(&self) -> &dyn Browser {
        self.browser.as_ref()
    }

    fn cart_url(&self) -> Result<Url> {
        self.base_url
            .join("cart.html")
            .map_err(|e| Error::config(format!("Cannot build cart URL: {e}")))
    }

    fn total_probe() -> TotalProbe {
        TotalProbe::new(cart::total(), cart::table(), cart::rows())
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Loads `cart.html` directly and waits for its `/viewcart` call.
    pub async fn open(&self) -> Result<()> {
        info!("Opening cart page");
        self.load_cart_page().await
    }

    /// Follows the header link and waits for the table.
    ///
    /// The `/viewcart` race is soft: the call may have finished before the
    /// listener could see it.
    pub async fn navigate_to_cart(&self) -> Result<()> {
        info!("Navigating to cart");
        let outcome = race_response(
            self.browser(),
            "/viewcart",
            200,
            self.timeouts.soft_response,
            RaceMode::Soft,
            || self.header.click_cart(),
        )
        .await?;
        if !outcome.is_matched() {
            info!("No /viewcart response seen, cart data may already be loaded");
        }

        actions::wait_attached(self.browser(), &cart::table(), self.timeouts.element).await
    }

    /// Loads the cart page and waits for its `/viewcart` call.
    ///
    /// Rows still follow one by one; readers wait for them.
    async fn load_cart_page(&self) -> Result<()> {
        let url = self.cart_url()?;
        debug!(%url, "Loading cart page");
        race_response(
            self.browser(),
            "/viewcart",
            200,
            self.timeouts.navigation_response,
            RaceMode::Hard,
            || self.browser().goto(url.as_str()),
        )
        .await?;
        actions::wait_attached(self.browser(), &cart::table(), self.timeouts.element).await
    }

    // ========================================================================
    // Reading
    // ========================================================================

    /// Row count once it stops changing.
    ///
    /// An empty cart spends the whole sample budget and returns `0`.
    pub async fn cart_item_count(&self) -> Result<usize> {
        actions::wait_attached(self.browser(), &cart::table(), self.timeouts.element).await?;

        let rows = cart::rows();
        let result = poll_until_stable(StabilizationPolicy::default(), || self.browser().count(&rows)).await?;
        debug!(count = result.value(), converged = result.is_converged(), "Cart rows counted");
        Ok(result.value())
    }

    /// Rows as name and price, one per stabilized row.
    pub async fn cart_items(&self) -> Result<Vec<CartItem>> {
        let count = self.cart_item_count().await?;

        let mut items = Vec::with_capacity(count);
        for i in 0..count {
            let name = self.browser().text_content(&cart::row_names().nth(i)).await?;
            let price = self.browser().text_content(&cart::row_prices().nth(i)).await?;
            items.push(CartItem {
                name: name.unwrap_or_default().trim().to_string(),
                price: parse_price(&price.unwrap_or_default()),
            });
        }
        Ok(items)
    }

    /// Product names in row order, read once the row count holds.
    pub async fn cart_item_names(&self) -> Result<Vec<String>> {
        self.cart_item_count().await?;
        let names = self.browser().all_text_contents(&cart::row_names()).await?;
        Ok(names.into_iter().map(|n| n.trim().to_string()).collect())
    }

    /// Cart total; `0` for an empty cart.
    ///
    /// The table body exists before any row does, so an empty table only
    /// counts once it has stayed empty for the quiet window.
    pub async fn total_price(&self) -> Result<f64> {
        actions::wait_attached(self.browser(), &cart::total(), self.timeouts.element).await?;
        resolve_total(self.browser(), &Self::total_probe(), self.timeouts.total).await
    }

    pub async fn is_cart_empty(&self) -> Result<bool> {
        Ok(self.cart_item_count().await? == 0)
    }

    pub async fn is_on_cart_page(&self) -> Result<bool> {
        Ok(self.browser().current_url().await?.contains("cart.html"))
    }

    /// Returns whether every row has a delete link.
    pub async fn delete_buttons_match_rows(&self) -> Result<bool> {
        let rows = self.cart_item_count().await?;
        if rows == 0 {
            return Ok(true);
        }
        Ok(self.browser().count(&cart::delete_buttons()).await? == rows)
    }

    // ========================================================================
    // Deletion
    // ========================================================================

    /// Deletes the row at `index` and reloads the cart.
    pub async fn delete_item_by_index(&self, index: usize) -> Result<()> {
        info!(index, "Deleting cart item");
        self.delete(&cart::delete_buttons().nth(index)).await
    }

    /// Deletes the first row showing `name` and reloads the cart.
    pub async fn delete_item_by_name(&self, name: &str) -> Result<()> {
        info!(name, "Deleting cart item");
        self.delete(&cart::delete_for(name).first()).await
    }

    async fn delete(&self, link: &Locator) -> Result<()> {
        race_response(
            self.browser(),
            "/deleteitem",
            200,
            self.timeouts.hard_response,
            RaceMode::Hard,
            || actions::click(self.browser(), link, self.timeouts.action),
        )
        .await?;
        self.load_cart_page().await
    }

    /// Deletes rows until none remain.
    pub async fn clear_cart(&self) -> Result<()> {
        info!("Clearing cart");
        while self.cart_item_count().await? > 0 {
            self.delete_item_by_index(0).await?;
        }
        Ok(())
    }

    // ========================================================================
    // Checkout
    // ========================================================================

    pub async fn click_place_order(&self) -> Result<()> {
        info!("Opening order form");
        actions::click(self.browser(), &cart::place_order(), self.timeouts.action).await?;
        self.order_modal.wait_visible().await
    }

    pub async fn fill_order_form(&self, order: &OrderInfo) -> Result<()> {
        debug!(name = %order.name, "Filling order form");
        let fields = [
            (cart::order_name(), &order.name),
            (cart::order_country(), &order.country),
            (cart::order_city(), &order.city),
            (cart::order_card(), &order.credit_card),
            (cart::order_month(), &order.month),
            (cart::order_year(), &order.year),
        ];
        for (locator, value) in &fields {
            actions::fill(self.browser(), locator, value, self.timeouts.action).await?;
        }
        Ok(())
    }

    /// Clicks "Purchase" and returns the confirmation text.
    pub async fn submit_order(&self) -> Result<String> {
        actions::click(self.browser(), &cart::purchase(), self.timeouts.action).await?;
        let text = actions::text(self.browser(), &cart::confirmation_text(), self.timeouts.action).await?;
        info!(confirmation = %text, "Order confirmed");
        Ok(text)
    }

    /// Opens the order form, fills it, submits and returns the confirmation.
    pub async fn complete_purchase(&self, order: &OrderInfo) -> Result<String> {
        self.click_place_order().await?;
        self.fill_order_form(order).await?;
        self.submit_order().await
    }

    /// Checks the confirmation popup is shown with text and returns it.
    ///
    /// # Errors
    ///
    /// [`Error::Assertion`] if the popup is hidden or empty.
    pub async fn verify_order_confirmation(&self) -> Result<String> {
        if !self.browser().is_visible(&cart::confirmation()).await? {
            return Err(Error::assertion("Order confirmation is not shown"));
        }
        let text = self
            .browser()
            .text_content(&cart::confirmation_text())
            .await?
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(Error::assertion("Order confirmation is empty"));
        }
        Ok(text)
    }

    /// Clicks "OK" on the confirmation and waits for it to hide.
    pub async fn close_confirmation(&self) -> Result<()> {
        actions::click(self.browser(), &cart::confirmation_ok(), self.timeouts.action).await?;
        actions::wait_hidden(self.browser(), &cart::confirmation(), self.timeouts.action).await
    }

    pub async fn is_confirmation_visible(&self) -> Result<bool> {
        self.browser().is_visible(&cart::confirmation()).await
    }
}

impl std::fmt::Debug for CartPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartPage")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use crate::browser::MemoryStorefront;
    use crate::browser::memory::CatalogItem;
    use crate::model::ProductCategory;
    use crate::pages::ProductPage;

    struct Fixture {
        store: MemoryStorefront,
        cart: CartPage,
        product: ProductPage,
    }

    fn fixture() -> Fixture {
        let store = MemoryStorefront::builder()
            .catalog(vec![
                CatalogItem::new(1, ProductCategory::Phone, "Hundred", 100.0, "a"),
                CatalogItem::new(2, ProductCategory::Laptop, "Fifty", 50.0, "b"),
            ])
            .build()
            .expect("storefront");
        let browser: Arc<dyn Browser> = Arc::new(store.clone());
        let base = Url::parse("https://www.demoblaze.com").expect("url");
        Fixture {
            cart: CartPage::new(Arc::clone(&browser), base, Timeouts::default()),
            product: ProductPage::new(browser, Timeouts::default()),
            store,
        }
    }

    impl Fixture {
        async fn add(&self, id: u32) {
            self.store
                .goto(&format!("https://www.demoblaze.com/prod.html?idp_={id}"))
                .await
                .expect("goto");
            self.product.add_to_cart_and_verify().await.expect("add");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_count_and_total_after_adding() {
        let f = fixture();
        f.add(1).await;
        f.add(2).await;
        f.add(1).await;

        f.cart.navigate_to_cart().await.expect("cart");

        assert_eq!(f.cart.cart_item_count().await.expect("count"), 3);
        assert_eq!(f.cart.total_price().await.expect("total"), 250.0);
        assert!(f.cart.delete_buttons_match_rows().await.expect("buttons"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_then_total_reads_the_row() {
        let f = fixture();
        f.add(1).await;

        f.cart.open().await.expect("open");

        assert_eq!(f.cart.total_price().await.expect("total"), 100.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_items_match_rows() {
        let f = fixture();
        f.add(2).await;

        f.cart.open().await.expect("open");
        let items = f.cart.cart_items().await.expect("items");

        assert_eq!(items, [CartItem { name: "Fifty".into(), price: 50.0 }]);
        assert_eq!(f.cart.cart_item_names().await.expect("names"), ["Fifty"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_by_name_updates_total() {
        let f = fixture();
        f.add(1).await;
        f.add(2).await;
        f.cart.navigate_to_cart().await.expect("cart");

        f.cart.delete_item_by_name("Hundred").await.expect("delete");

        assert_eq!(f.cart.total_price().await.expect("total"), 50.0);
        assert_eq!(f.cart.cart_item_names().await.expect("names"), ["Fifty"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_cart_empties_it() {
        let f = fixture();
        f.add(1).await;
        f.add(2).await;
        f.cart.navigate_to_cart().await.expect("cart");

        f.cart.clear_cart().await.expect("clear");

        assert!(f.cart.is_cart_empty().await.expect("empty"));
        assert_eq!(f.cart.total_price().await.expect("total"), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_missing_row_fails_fast() {
        let f = fixture();
        f.cart.open().await.expect("open");
        let timeouts = Timeouts {
            action: Duration::from_secs(1),
            ..Timeouts::default()
        };
        let base = Url::parse("https://www.demoblaze.com").expect("url");
        let cart = CartPage::new(Arc::new(f.store.clone()), base, timeouts);

        let err = cart.delete_item_by_index(0).await.unwrap_err();

        assert!(matches!(err, Error::ElementNotFound { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_purchase_flow() {
        let f = fixture();
        f.add(1).await;
        f.cart.navigate_to_cart().await.expect("cart");

        let text = f.cart.complete_purchase(&OrderInfo::valid()).await.expect("purchase");
        assert!(text.contains("Amount: 100 USD"));
        assert!(text.contains("Card Number: 4111111111111111"));
        assert_eq!(f.cart.verify_order_confirmation().await.expect("shown"), text);

        f.cart.close_confirmation().await.expect("close");
        assert!(!f.cart.is_confirmation_visible().await.expect("visible"));
    }
}
