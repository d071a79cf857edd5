//! Login, signup and logout.

use anyhow::{Context as _, ensure};
use cucumber::{then, when};
use storefront_e2e::UserCredentials;
use storefront_e2e::model::{contains_sql_injection, contains_xss, is_valid_email, random_email, random_username};

use crate::world::StorefrontWorld;

// ============================================================================
// Login modal
// ============================================================================

#[when("I open the login modal")]
async fn open_login(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    world.pages.login.open_login_modal().await?;
    Ok(())
}

#[when("I close the login modal")]
async fn close_login(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    world.pages.login.close_login_modal().await?;
    Ok(())
}

#[then("the login modal should be visible")]
async fn login_visible(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    ensure!(world.pages.login.is_login_modal_visible().await?, "login modal is hidden");
    Ok(())
}

#[then("the login modal should not be visible")]
async fn login_hidden(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    ensure!(!world.pages.login.is_login_modal_visible().await?, "login modal is shown");
    Ok(())
}

#[then("the login modal should display all required fields")]
async fn login_fields(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    ensure!(world.pages.login.login_form_complete().await?, "login form is incomplete");
    Ok(())
}

// ============================================================================
// Login
// ============================================================================

#[when(expr = "I login with username {string} and password {string}")]
async fn login(world: &mut StorefrontWorld, username: String, password: String) -> anyhow::Result<()> {
    world
        .pages
        .login
        .login(&UserCredentials::new(username, password))
        .await?;
    Ok(())
}

#[when(expr = "I login expecting an alert with username {string} and password {string}")]
async fn login_alert(world: &mut StorefrontWorld, username: String, password: String) -> anyhow::Result<()> {
    let message = world
        .pages
        .login
        .login_with_alert(&UserCredentials::new(username, password))
        .await?;
    world.ctx.record_alert(message);
    Ok(())
}

/// Hostile login input; the step refuses data that would not exercise it.
#[when(regex = r#"^I attempt an? (SQL injection|XSS) login with username "([^"]*)" and password "([^"]*)"$"#)]
async fn hostile_login(world: &mut StorefrontWorld, kind: String, username: String, password: String) -> anyhow::Result<()> {
    let hostile = |input: &str| match kind.as_str() {
        "SQL injection" => contains_sql_injection(input),
        _ => contains_xss(input),
    };
    ensure!(
        hostile(&username) || hostile(&password),
        "neither '{username}' nor '{password}' is {kind} input"
    );
    let message = world
        .pages
        .login
        .login_with_alert(&UserCredentials::new(username, password))
        .await?;
    world.ctx.record_alert(message);
    Ok(())
}

#[when("I login with the remembered credentials")]
async fn login_remembered(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    let credentials = world.ctx.credentials.clone().context("no credentials remembered")?;
    world.pages.login.login(&credentials).await?;
    Ok(())
}

#[when(expr = "I enter username {string} in login modal")]
async fn enter_username(world: &mut StorefrontWorld, username: String) -> anyhow::Result<()> {
    world.pages.login.enter_login_username(&username).await?;
    Ok(())
}

#[when(expr = "I enter password {string} in login modal")]
async fn enter_password(world: &mut StorefrontWorld, password: String) -> anyhow::Result<()> {
    world.pages.login.enter_login_password(&password).await?;
    Ok(())
}

#[when("I press Enter key to submit login")]
async fn press_enter(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    world.pages.login.press_enter_to_login().await?;
    Ok(())
}

#[when("I double click the login button")]
async fn double_click(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    world.pages.login.click_login_button(2).await?;
    Ok(())
}

#[when("I click login button multiple times rapidly")]
async fn click_rapidly(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    world.pages.login.click_login_button(3).await?;
    Ok(())
}

// ============================================================================
// Session state
// ============================================================================

#[then(expr = "I should be logged in as {string}")]
async fn logged_in_as(world: &mut StorefrontWorld, username: String) -> anyhow::Result<()> {
    world.pages.login.verify_login_success(&username).await?;
    Ok(())
}

#[then(expr = "I should see welcome message containing {string}")]
async fn welcome_contains(world: &mut StorefrontWorld, text: String) -> anyhow::Result<()> {
    let welcome = world.pages.header.welcome_message().await?;
    ensure!(welcome.contains(&text), "welcome '{welcome}' does not contain '{text}'");
    Ok(())
}

#[then("I should be logged in successfully")]
async fn logged_in(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    ensure!(world.pages.login.is_logged_in().await?, "not logged in");
    Ok(())
}

#[then(regex = r"^I should (?:not be logged in|be logged out)$")]
async fn logged_out(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    ensure!(!world.pages.login.is_logged_in().await?, "still logged in");
    Ok(())
}

#[when("I logout")]
async fn logout(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    world.pages.login.logout().await?;
    Ok(())
}

// ============================================================================
// Signup
// ============================================================================

#[when("I open the signup modal")]
async fn open_signup(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    world.pages.login.open_signup_modal().await?;
    Ok(())
}

#[when("I close the signup modal")]
async fn close_signup(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    world.pages.login.close_signup_modal().await?;
    Ok(())
}

#[then("the signup modal should be visible")]
async fn signup_visible(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    ensure!(world.pages.login.is_signup_modal_visible().await?, "signup modal is hidden");
    Ok(())
}

#[then("the signup modal should not be visible")]
async fn signup_hidden(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    ensure!(!world.pages.login.is_signup_modal_visible().await?, "signup modal is shown");
    Ok(())
}

#[then("the signup modal should display all required fields")]
async fn signup_fields(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    ensure!(world.pages.login.signup_form_complete().await?, "signup form is incomplete");
    Ok(())
}

async fn signup(world: &mut StorefrontWorld, credentials: UserCredentials) -> anyhow::Result<()> {
    let message = world.pages.login.signup(&credentials).await?;
    world.ctx.record_alert(message);
    Ok(())
}

#[when("I signup with a new random user")]
async fn signup_random(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    signup(world, UserCredentials::random()).await
}

#[when("I signup with a new random user and remember credentials")]
async fn signup_remember(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    let credentials = UserCredentials::random();
    world.ctx.credentials = Some(credentials.clone());
    signup(world, credentials).await
}

#[when("I signup with a new random email address as username")]
async fn signup_email(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    let email = random_email();
    ensure!(is_valid_email(&email), "generated address '{email}' is malformed");
    let credentials = UserCredentials::new(email, "testpass123");
    world.ctx.credentials = Some(credentials.clone());
    signup(world, credentials).await
}

#[when(regex = r#"^I signup with a new random user with (?:short|numeric) password "([^"]*)"$"#)]
async fn signup_password(world: &mut StorefrontWorld, password: String) -> anyhow::Result<()> {
    signup(world, UserCredentials::new(random_username(), password)).await
}

#[when("I signup with a new random user with password same as username")]
async fn signup_same(world: &mut StorefrontWorld) -> anyhow::Result<()> {
    let username = random_username();
    signup(world, UserCredentials::new(username.clone(), username)).await
}

#[when(expr = "I signup with username {string} and password {string}")]
async fn signup_with(world: &mut StorefrontWorld, username: String, password: String) -> anyhow::Result<()> {
    signup(world, UserCredentials::new(username, password)).await
}
