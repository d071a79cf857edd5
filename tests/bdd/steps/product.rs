//! Product selection and detail checks.

use anyhow::ensure;
use cucumber::{then, when};

use crate::world::StorefrontWorld;

#[when(expr = "I click on product {string}")]
async fn click_product(world: &mut StorefrontWorld, name: String) -> anyhow::Result<()> {
    world.pages.home.click_product_by_name(&name).await?;
    Ok(())
}

#[when("I click on a random product and remember it")]
async fn click_random(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    let name = world.pages.home.click_random_product().await?;
    let price = world.pages.product.product_price().await?;
    world.ctx.remember_product(name.clone());
    world.ctx.record_product(name, price);
    Ok(())
}

#[when("I add the product to cart")]
async fn add_to_cart(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    let message = world.pages.product.add_to_cart().await?;
    world.ctx.record_alert(message);
    Ok(())
}

#[then(expr = "the product name should contain {string}")]
async fn name_contains(world: &mut StorefrontWorld, expected: String) -> anyhow::Result<()> {
    let name = world.pages.product.product_name().await?;
    ensure!(name.contains(&expected), "product name '{name}' does not contain '{expected}'");
    Ok(())
}

#[then(expr = "the product price should be {int}")]
async fn price_is(world: &mut StorefrontWorld, expected: u32) -> anyhow::Result<()> {
    let price = world.pages.product.product_price().await?;
    ensure!(price == f64::from(expected), "product price {price}, expected {expected}");
    Ok(())
}

#[then("the product description should not be empty")]
async fn description_present(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    let details = world.pages.product.product_details().await?;
    ensure!(!details.description.is_empty(), "description of '{}' is empty", details.name);
    Ok(())
}

#[then("the product image should be visible")]
async fn image_visible(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    ensure!(world.pages.product.is_product_image_visible().await?, "product image is hidden");
    Ok(())
}

#[then("I should be on a product page")]
async fn on_product_page(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    ensure!(world.pages.product.is_on_product_page().await?, "not on a product page");
    Ok(())
}
