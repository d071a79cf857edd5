//! Home page: product grid, categories and pagination.

use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info};
use url::Url;

use crate::browser::{Browser, Locator};
use crate::error::{Error, Result};
use crate::model::{ProductCategory, parse_price};
use crate::pages::locators::{home, product};
use crate::pages::{HeaderComponent, Timeouts};
use crate::sync::{RaceMode, StabilizationPolicy, actions, poll_until_stable, race_response};

/// Product grid page.
#[derive(Clone)]
pub struct HomePage {
    browser: Arc<dyn Browser>,
    base_url: Url,
    timeouts: Timeouts,
    /// Site header.
    pub header: HeaderComponent,
}

impl HomePage {
    /// Creates the page object.
    #[must_use]
    pub fn new(browser: Arc<dyn Browser>, base_url: Url, timeouts: Timeouts) -> Self {
        Self {
            header: HeaderComponent::new(Arc::clone(&browser), timeouts),
            browser,
            base_url,
            timeouts,
        }
    }

    #[inline]
    fn browser(&self) -> &dyn Browser {
        self.browser.as_ref()
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Opens the storefront root and waits for the grid.
    ///
    /// The `/entries` race is soft; the first card must show up either way.
    /// Returning before the listing lands would let it overwrite whatever
    /// the caller does next, such as a category filter.
    pub async fn open(&self) -> Result<()> {
        info!(url = %self.base_url, "Opening home page");
        let outcome = race_response(
            self.browser(),
            "/entries",
            200,
            self.timeouts.soft_response,
            RaceMode::Soft,
            || self.browser().goto(self.base_url.as_str()),
        )
        .await?;
        if !outcome.is_matched() {
            info!("No /entries response seen, grid may come from cache");
        }

        actions::wait_visible(self.browser(), &home::card_titles().first(), self.timeouts.element).await
    }

    /// Filters the grid by `category`.
    ///
    /// The `/bycat` race is soft: a cached listing produces no call. The
    /// first card must still show up.
    pub async fn select_category(&self, category: ProductCategory) -> Result<()> {
        info!(%category, "Selecting category");
        let link = home::category(category.label());

        race_response(
            self.browser(),
            "/bycat",
            200,
            self.timeouts.soft_response,
            RaceMode::Soft,
            || actions::click(self.browser(), &link, self.timeouts.action),
        )
        .await?;

        actions::wait_visible(self.browser(), &home::card_titles().first(), self.timeouts.element).await
    }

    /// Card count once it holds steady.
    ///
    /// A grid with no cards spends the whole sample budget and yields `0`.
    async fn settled_card_count(&self) -> Result<usize> {
        let cards = home::cards();
        let result = poll_until_stable(StabilizationPolicy::default(), || self.browser().count(&cards)).await?;
        debug!(count = result.value(), converged = result.is_converged(), "Grid counted");
        Ok(result.value())
    }

    /// Number of cards on the grid.
    pub async fn product_count(&self) -> Result<usize> {
        self.settled_card_count().await
    }

    /// Card titles, trimmed.
    pub async fn product_names(&self) -> Result<Vec<String>> {
        self.settled_card_count().await?;
        let names = self.browser().all_text_contents(&home::card_titles()).await?;
        Ok(names.into_iter().map(|n| n.trim().to_string()).collect())
    }

    /// Card prices.
    pub async fn product_prices(&self) -> Result<Vec<f64>> {
        self.settled_card_count().await?;
        let prices = self.browser().all_text_contents(&home::card_prices()).await?;
        Ok(prices.iter().map(|p| parse_price(p)).collect())
    }

    /// Opens the first product whose title contains `name`.
    pub async fn click_product_by_name(&self, name: &str) -> Result<()> {
        info!(name, "Opening product by name");
        self.open_card(&home::card_titles().has_text(name).first()).await
    }

    /// Opens the card at `index`.
    pub async fn click_product_by_index(&self, index: usize) -> Result<()> {
        info!(index, "Opening product by index");
        self.open_card(&home::card_titles().nth(index)).await
    }

    /// Opens a random card and returns its name.
    ///
    /// # Errors
    ///
    /// [`Error::Assertion`] if the grid is empty.
    pub async fn click_random_product(&self) -> Result<String> {
        let titles = home::card_titles();
        actions::wait_visible(self.browser(), &titles.clone().first(), self.timeouts.element).await?;

        let count = self.settled_card_count().await?;
        if count == 0 {
            return Err(Error::assertion("No products on the home page"));
        }

        let index = rand::thread_rng().gen_range(0..count);
        let card = titles.nth(index);
        let name = self
            .browser()
            .text_content(&card)
            .await?
            .unwrap_or_default()
            .trim()
            .to_string();

        info!(index, %name, "Opening random product");
        self.open_card(&card).await?;
        Ok(name)
    }

    /// Follows a card title by navigating to its href.
    ///
    /// Navigating directly avoids the grid's click handler racing a re-render.
    async fn open_card(&self, card: &Locator) -> Result<()> {
        actions::wait_visible(self.browser(), card, self.timeouts.element).await?;

        let href = self
            .browser()
            .attribute(card, "href")
            .await?
            .ok_or_else(|| Error::assertion(format!("Product link has no href: {card}")))?;

        let current = self.browser().current_url().await?;
        let base = Url::parse(&current).unwrap_or_else(|_| self.base_url.clone());
        let target = base
            .join(&href)
            .map_err(|e| Error::assertion(format!("Invalid product href '{href}': {e}")))?;

        debug!(%target, "Navigating to product");
        self.browser().goto(target.as_str()).await?;
        actions::wait_visible(self.browser(), &product::name(), self.timeouts.product).await
    }

    // ========================================================================
    // Pagination
    // ========================================================================

    pub async fn click_next(&self) -> Result<()> {
        self.turn_page(&home::next()).await
    }

    pub async fn click_previous(&self) -> Result<()> {
        self.turn_page(&home::previous()).await
    }

    /// Clicks a pagination button and waits for the `/pagination` listing.
    async fn turn_page(&self, button: &Locator) -> Result<()> {
        race_response(
            self.browser(),
            "/pagination",
            200,
            self.timeouts.soft_response,
            RaceMode::Soft,
            || actions::click(self.browser(), button, self.timeouts.action),
        )
        .await?;
        actions::wait_visible(self.browser(), &home::card_titles().first(), self.timeouts.element).await
    }

    // ========================================================================
    // State
    // ========================================================================

    /// Returns whether the browser is on the storefront root or index page.
    pub async fn is_on_home_page(&self) -> Result<bool> {
        let current = self.browser().current_url().await?;
        let host = self.base_url.host_str().unwrap_or_default();
        Ok(current.contains(host) && (current.ends_with('/') || current.contains("index")))
    }
}

impl std::fmt::Debug for HomePage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HomePage")
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

    async fn home() -> (MemoryStorefront, HomePage) {
        let page = MemoryStorefront::builder().build().expect("storefront");
        let base = Url::parse("https://www.demoblaze.com").expect("url");
        let home = HomePage::new(Arc::new(page.clone()), base, Timeouts::default());
        home.open().await.expect("open");
        actions::wait_visible(&page, &home::cards().first(), Duration::from_secs(10))
            .await
            .expect("grid");
        (page, home)
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_lands_on_home() {
        let (_page, home) = home().await;

        assert!(home.is_on_home_page().await.expect("url"));
        assert_eq!(home.product_count().await.expect("count"), 9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_returns_with_grid_rendered() {
        let page = MemoryStorefront::builder().build().expect("storefront");
        let base = Url::parse("https://www.demoblaze.com").expect("url");
        let home = HomePage::new(Arc::new(page.clone()), base, Timeouts::default());

        home.open().await.expect("open");

        assert_eq!(page.count(&home::cards()).await.expect("count"), 9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_category_filters_grid() {
        let (_page, home) = home().await;

        home.select_category(ProductCategory::Monitor).await.expect("category");

        let names = home.product_names().await.expect("names");
        assert_eq!(names, ["Apple monitor 24", "ASUS Full HD"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_product_by_name_opens_detail() {
        let (page, home) = home().await;

        home.click_product_by_name("Nexus 6").await.expect("open");

        assert!(page.current_url().await.expect("url").ends_with("prod.html?idp_=3"));
        assert!(!home.is_on_home_page().await.expect("url"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_random_product_name_matches_detail() {
        let (page, home) = home().await;

        let name = home.click_random_product().await.expect("random");
        let shown = page.text_content(&product::name()).await.expect("text");

        assert_eq!(shown.as_deref(), Some(name.as_str()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pagination_moves_through_catalog() {
        let (_page, home) = home().await;
        let first = home.product_names().await.expect("names");

        home.click_next().await.expect("next");
        let second = home.product_names().await.expect("names");
        assert_eq!(second.len(), 6);
        assert!(second.iter().all(|name| !first.contains(name)));

        home.click_previous().await.expect("previous");
        assert_eq!(home.product_names().await.expect("names"), first);
    }
}
