//! Navigation, alerts and categories.

use anyhow::{Context as _, ensure};
use cucumber::{given, then, when};
use storefront_e2e::ProductCategory;

use crate::world::StorefrontWorld;

// ============================================================================
// Navigation
// ============================================================================

#[given("I am on the DemoBlaze homepage")]
async fn on_homepage(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    world.pages.home.open().await?;
    Ok(())
}

#[when("I go back to the homepage")]
async fn back_to_homepage(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    world.pages.home.open().await?;
    Ok(())
}

#[when("I navigate to cart page")]
async fn header_to_cart(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    world.pages.header.click_cart().await?;
    Ok(())
}

#[when("I navigate to homepage")]
async fn header_to_home(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    world.pages.header.click_home().await?;
    Ok(())
}

#[then("I should be on the homepage")]
async fn is_homepage(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    ensure!(world.pages.home.is_on_home_page().await?, "not on the home page");
    Ok(())
}

// ============================================================================
// Alerts
// ============================================================================

#[then(expr = "I should see an alert with message containing {string}")]
async fn alert_contains(world: &mut StorefrontWorld, expected: String) -> anyhow::Result<()> {
    let alert = world.ctx.alert_message.as_deref().context("no alert was captured")?;
    ensure!(
        alert.to_lowercase().contains(&expected.to_lowercase()),
        "alert '{alert}' does not contain '{expected}'"
    );
    Ok(())
}

#[then("I should see an alert")]
async fn alert_shown(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    let alert = world.ctx.alert_message.as_deref().context("no alert was captured")?;
    ensure!(!alert.trim().is_empty(), "alert was empty");
    Ok(())
}

#[when("I close the alert")]
async fn close_alert(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    // Alerts are answered when captured; a successful signup also hides its modal
    if world.ctx.alert_lowercase().contains("sign up successful") {
        world.pages.login.signup_modal.wait_hidden().await?;
    }
    Ok(())
}

// ============================================================================
// Categories
// ============================================================================

#[when(expr = "I select the {string} category")]
async fn select_category(world: &mut StorefrontWorld, label: String) -> anyhow::Result<()> {
    let category = ProductCategory::from_label(&label)?;
    world.pages.home.select_category(category).await?;
    Ok(())
}

#[then("I should see products in the list")]
async fn products_listed(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    let count = world.pages.home.product_count().await?;
    ensure!(count > 0, "the product list is empty");
    Ok(())
}

#[then(expr = "the product list should contain {string}")]
async fn list_contains(world: &mut StorefrontWorld, name: String) -> anyhow::Result<()> {
    let names = world.pages.home.product_names().await?;
    ensure!(names.contains(&name), "'{name}' not in {names:?}");
    Ok(())
}

#[then(expr = "the product list should not contain {string}")]
async fn list_lacks(world: &mut StorefrontWorld, name: String) -> anyhow::Result<()> {
    let names = world.pages.home.product_names().await?;
    ensure!(!names.contains(&name), "'{name}' unexpectedly in {names:?}");
    Ok(())
}

#[when("I go to the next page of products")]
async fn next_page(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    world.pages.home.click_next().await?;
    Ok(())
}

#[when("I go to the previous page of products")]
async fn previous_page(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    world.pages.home.click_previous().await?;
    Ok(())
}
