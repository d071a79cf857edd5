//! Checkout and order confirmation.

use anyhow::{Context as _, ensure};
use cucumber::{then, when};
use storefront_e2e::{OrderConfirmation, OrderInfo};

use crate::world::StorefrontWorld;

#[when("I place an order with valid details")]
async fn order_valid(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    let text = world.pages.cart.complete_purchase(&OrderInfo::valid()).await?;
    world.ctx.order_confirmation = Some(text);
    Ok(())
}

#[when("I place an order with minimal details")]
async fn order_minimal(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    let text = world.pages.cart.complete_purchase(&OrderInfo::minimal()).await?;
    world.ctx.order_confirmation = Some(text);
    Ok(())
}

#[when("I click the Place Order button")]
async fn place_order(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    world.pages.cart.click_place_order().await?;
    Ok(())
}

#[when("I fill the order form with valid details")]
async fn fill_form(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    world.pages.cart.fill_order_form(&OrderInfo::valid()).await?;
    Ok(())
}

#[when("I click the Purchase button")]
async fn purchase(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    let text = world.pages.cart.submit_order().await?;
    world.ctx.order_confirmation = Some(text);
    Ok(())
}

#[then("I should see order confirmation")]
async fn confirmation_shown(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    world.pages.cart.verify_order_confirmation().await?;
    Ok(())
}

fn confirmation(world: &StorefrontWorld) -> anyhow::Result<&str> {
    world
        .ctx
        .order_confirmation
        .as_deref()
        .context("no order confirmation was captured")
}

#[then(expr = "the order confirmation should contain {string}")]
async fn confirmation_contains(world: &mut StorefrontWorld, expected: String) -> anyhow::Result<()> {
    let text = confirmation(world)?;
    ensure!(text.contains(&expected), "confirmation '{text}' does not contain '{expected}'");
    Ok(())
}

#[then("the order confirmation should display the total amount")]
async fn confirmation_amount(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    let text = confirmation(world)?;
    ensure!(text.to_lowercase().contains("amount"), "confirmation has no amount: '{text}'");
    Ok(())
}

#[then(expr = "the order amount should be {int}")]
async fn confirmation_amount_is(world: &mut StorefrontWorld, expected: u32) -> anyhow::Result<()> {
    let parsed = OrderConfirmation::parse(confirmation(world)?);
    ensure!(
        parsed.amount == f64::from(expected),
        "order amount {}, expected {expected}",
        parsed.amount
    );
    Ok(())
}

#[then("the order confirmation should display the card number")]
async fn confirmation_card(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    let text = confirmation(world)?;
    let card = OrderInfo::valid().credit_card;
    ensure!(text.contains(&card), "confirmation does not show card {card}");
    Ok(())
}

#[when("I close the order confirmation")]
async fn close_confirmation(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    world.pages.cart.close_confirmation().await?;
    Ok(())
}

#[then("the confirmation modal should be closed")]
async fn confirmation_closed(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    ensure!(
        !world.pages.cart.is_confirmation_visible().await?,
        "confirmation is still shown"
    );
    Ok(())
}
