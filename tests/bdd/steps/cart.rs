//! Cart contents, totals and deletion.

use anyhow::ensure;
use cucumber::{then, when};

use crate::world::StorefrontWorld;

#[when("I navigate to the cart")]
async fn navigate_to_cart(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    world.pages.cart.navigate_to_cart().await?;
    Ok(())
}

#[then(regex = r"^the cart should contain (\d+) items?$")]
async fn contains_count(world: &mut StorefrontWorld, expected: usize) -> anyhow::Result<()> {
    let count = world.pages.cart.cart_item_count().await?;
    ensure!(count == expected, "cart has {count} rows, expected {expected}");
    Ok(())
}

#[then(regex = r"^the cart should have at least (\d+) items?$")]
async fn at_least(world: &mut StorefrontWorld, minimum: usize) -> anyhow::Result<()> {
    let count = world.pages.cart.cart_item_count().await?;
    ensure!(count >= minimum, "cart has {count} rows, expected at least {minimum}");
    Ok(())
}

#[then(expr = "the cart should contain product {string}")]
async fn contains_product(world: &mut StorefrontWorld, name: String) -> anyhow::Result<()> {
    let names = world.pages.cart.cart_item_names().await?;
    ensure!(names.contains(&name), "'{name}' not in cart {names:?}");
    Ok(())
}

#[then(expr = "the cart should not contain product {string}")]
async fn lacks_product(world: &mut StorefrontWorld, name: String) -> anyhow::Result<()> {
    let names = world.pages.cart.cart_item_names().await?;
    ensure!(!names.contains(&name), "'{name}' still in cart {names:?}");
    Ok(())
}

#[then("the cart should contain all remembered products")]
async fn contains_remembered(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    let names = world.pages.cart.cart_item_names().await?;
    for expected in world.ctx.product_names() {
        ensure!(names.contains(expected), "'{expected}' not in cart {names:?}");
    }
    Ok(())
}

#[then(expr = "the cart total should be {int}")]
async fn total_is(world: &mut StorefrontWorld, expected: u32) -> anyhow::Result<()> {
    let total = world.pages.cart.total_price().await?;
    ensure!(total == f64::from(expected), "cart total {total}, expected {expected}");
    Ok(())
}

#[then("every cart row should have a delete button")]
async fn delete_buttons(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    ensure!(
        world.pages.cart.delete_buttons_match_rows().await?,
        "delete links do not match rows"
    );
    Ok(())
}

#[when(expr = "I delete cart item at index {int}")]
async fn delete_at(world: &mut StorefrontWorld, index: usize) -> anyhow::Result<()> {
    world.pages.cart.delete_item_by_index(index).await?;
    Ok(())
}

#[when(expr = "I delete cart item {string}")]
async fn delete_named(world: &mut StorefrontWorld, name: String) -> anyhow::Result<()> {
    world.pages.cart.delete_item_by_name(&name).await?;
    Ok(())
}

#[when("I clear the cart")]
async fn clear(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    world.pages.cart.clear_cart().await?;
    Ok(())
}

#[then("the cart should be empty")]
async fn empty(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    ensure!(world.pages.cart.is_cart_empty().await?, "cart is not empty");
    Ok(())
}
