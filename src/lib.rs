//! Storefront E2E - browser and API automation for the DemoBlaze storefront.
//!
//! The suite drives a browser through login, signup, product browsing, cart
//! manipulation and checkout, and separately exercises the storefront's HTTP
//! API.
//!
//! # Architecture
//!
//! The storefront renders everything asynchronously and never says when it
//! is done. The page objects therefore sit on a small synchronization core:
//!
//! - **Dialog capture**: an interceptor armed before the click that opens a
//!   native alert
//! - **Response races**: a UI action run concurrently with a wait for the
//!   network response it causes, soft or hard on timeout
//! - **Stabilization**: row counts polled until they hold steady
//! - **Total resolution**: the cart total read as a state machine that tells
//!   "empty" apart from "still loading"
//!
//! The browser is reached through the [`Browser`] trait. Two implementations
//! ship with the crate:
//!
//! - [`CdpBrowser`]: Chrome over the DevTools Protocol, created by [`Driver`]
//! - [`MemoryStorefront`]: an in-memory storefront with realistic latency,
//!   used by the tests and offline runs
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use storefront_e2e::{Driver, Pages, Result, SuiteConfig, UserCredentials};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = SuiteConfig::from_env()?;
//!     let driver = Driver::from_config(&config)?;
//!     let pages = Pages::new(Arc::new(driver.new_page().await?), &config)?;
//!
//!     pages.home.open().await?;
//!     pages.login.open_login_modal().await?;
//!     pages.login.login(&UserCredentials::new("alice", "secret")).await?;
//!     pages.login.verify_login_success("alice").await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`browser`] | [`Browser`] trait, [`Locator`], CDP and in-memory backends |
//! | [`sync`] | Dialog capture, response races, stabilization, cart total |
//! | [`pages`] | Page objects composed over the sync core |
//! | [`api`] | HTTP API client with explicit sessions |
//! | [`scenario`] | Per-scenario context for step definitions |
//! | [`model`] | Domain types and test-data helpers |
//! | [`config`] | [`SuiteConfig`] from the environment |
//! | [`driver`] | Chrome launcher |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`protocol`] | DevTools message types (internal) |
//! | [`transport`] | DevTools WebSocket connection (internal) |

// ============================================================================
// Modules
// ============================================================================

/// HTTP client for the storefront API.
pub mod api;

/// Browser contract and backends.
///
/// - [`Browser`] - driver operations the suite needs
/// - [`Locator`] - lazily resolved element reference
/// - [`CdpBrowser`] / [`MemoryStorefront`] - implementations
pub mod browser;

/// Suite configuration.
pub mod config;

/// Chrome launcher.
///
/// Use [`Driver::builder()`] or [`Driver::from_config`].
pub mod driver;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Domain types and helpers.
pub mod model;

/// Page objects.
pub mod pages;

/// DevTools Protocol message types.
///
/// Internal module defining request/response/event structures.
pub mod protocol;

/// Per-scenario state.
pub mod scenario;

/// UI-state synchronization.
pub mod sync;

/// DevTools WebSocket transport.
///
/// Internal module handling the connection and message routing.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// API types
pub use api::{ApiClient, ApiResponse, ApiSession, LoginOutcome};

// Browser types
pub use browser::{
    Browser, CdpBrowser, Dialog, DialogAction, DialogKind, ElementState, Key, Locator, MemoryStorefront,
    NetworkResponse,
};

// Configuration
pub use config::{Backend, SuiteConfig};

// Driver types
pub use driver::{ChromeOptions, Driver, DriverBuilder};

// Error types
pub use error::{Error, Result};

// Domain types
pub use model::{CartItem, OrderConfirmation, OrderInfo, Product, ProductCategory, UserCredentials};

// Page objects
pub use pages::{CartPage, HeaderComponent, HomePage, LoginPage, ModalComponent, Pages, ProductPage, Timeouts};

// Scenario state
pub use scenario::ScenarioContext;

// Synchronization
pub use sync::{
    DialogInterceptor, PendingResponseMatch, RaceMode, ResponseOutcome, Stabilization, StabilizationPolicy,
    TotalProbe, TotalState,
};
