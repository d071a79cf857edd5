//! Builder pattern for driver configuration.
//!
//! # Example
//!
//! ```ignore
//! use storefront_e2e::Driver;
//!
//! let driver = Driver::builder()
//!     .binary("/usr/bin/chromium")
//!     .headless()
//!     .build()?;
//!
//! let page = driver.new_page().await?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::path::PathBuf;

use crate::config::SuiteConfig;
use crate::error::{Error, Result};

use super::core::{Driver, LaunchTarget};
use super::options::ChromeOptions;

// ============================================================================
// DriverBuilder
// ============================================================================

/// Builder for configuring a [`Driver`] instance.
///
/// Use [`Driver::builder()`] to create a new builder.
#[derive(Debug, Default, Clone)]
pub struct DriverBuilder {
    /// Path to Chrome binary.
    binary: Option<PathBuf>,
    /// Existing DevTools endpoint.
    ws_url: Option<String>,
    /// Launch options.
    options: ChromeOptions,
}

// ============================================================================
// DriverBuilder Implementation
// ============================================================================

impl DriverBuilder {
    /// Creates a new driver builder with no configuration.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the builder from suite configuration.
    #[must_use]
    pub fn from_config(config: &SuiteConfig) -> Self {
        let mut builder = Self::new();
        builder.binary = config.chrome_bin.clone();
        builder.ws_url = config.cdp_ws_url.clone();
        builder.options.headless = config.headless;
        builder
    }

    /// Sets the path to the Chrome binary executable.
    #[inline]
    #[must_use]
    pub fn binary(mut self, path: impl Into<PathBuf>) -> Self {
        self.binary = Some(path.into());
        self
    }

    /// Attaches to an already running browser instead of launching one.
    ///
    /// Takes precedence over [`DriverBuilder::binary`].
    #[inline]
    #[must_use]
    pub fn connect(mut self, ws_url: impl Into<String>) -> Self {
        self.ws_url = Some(ws_url.into());
        self
    }

    /// Enables headless mode.
    #[inline]
    #[must_use]
    pub fn headless(mut self) -> Self {
        self.options.headless = true;
        self
    }

    /// Replaces the launch options.
    #[inline]
    #[must_use]
    pub fn options(mut self, options: ChromeOptions) -> Self {
        self.options = options;
        self
    }

    /// Builds the driver with validation.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if neither binary nor endpoint is set
    /// - [`Error::Config`] if the binary path doesn't exist
    /// - [`Error::Config`] if the options are invalid
    pub fn build(self) -> Result<Driver> {
        self.options.validate().map_err(Error::config)?;
        let target = self.validate_target()?;

        Ok(Driver::new(target, self.options))
    }
}

// ============================================================================
// Validation
// ============================================================================

impl DriverBuilder {
    /// Picks the endpoint or validates the binary path.
    fn validate_target(&self) -> Result<LaunchTarget> {
        if let Some(url) = &self.ws_url {
            if !url.starts_with("ws://") && !url.starts_with("wss://") {
                return Err(Error::config(format!(
                    "DevTools endpoint must be a ws:// URL, got '{url}'"
                )));
            }
            return Ok(LaunchTarget::Connect(url.clone()));
        }

        let binary = self.binary.clone().ok_or_else(|| {
            Error::config(
                "Chrome binary path is required. Use .binary() or set CHROME_BIN.\n\
                 Example: Driver::builder().binary(\"/usr/bin/chromium\")",
            )
        })?;

        if !binary.exists() {
            return Err(Error::config(format!(
                "Chrome not found at: {}",
                binary.display()
            )));
        }

        Ok(LaunchTarget::Launch(binary))
    }
}

// ============================================================================
// Tests
// ============================================================================
