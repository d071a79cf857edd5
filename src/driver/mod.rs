//! Chrome launcher.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Driver`] | Factory for CDP-backed pages |
//! | [`DriverBuilder`] | Fluent configuration builder |
//! | [`ChromeOptions`] | Browser launch options |
//! | [`ChromeProcess`] | Process guard owned by a launched page |
//!
//! # Example
//!
//! ```ignore
//! use storefront_e2e::{Driver, Result};
//!
//! async fn example() -> Result<()> {
//!     let driver = Driver::builder()
//!         .binary("/usr/bin/chromium")
//!         .headless()
//!         .build()?;
//!
//!     let page = driver.new_page().await?;
//!     page.goto("https://www.demoblaze.com").await?;
//!     Ok(())
//! }
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Fluent builder pattern for driver configuration.
pub mod builder;

/// Core driver implementation.
pub mod core;

/// Chrome command-line options.
pub mod options;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::DriverBuilder;
pub use core::{ChromeProcess, Driver};
pub use options::ChromeOptions;
