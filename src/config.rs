//! Suite configuration.
//!
//! [`SuiteConfig`] is read from the environment once per run and handed to
//! every scenario. Values can be overridden with the `with_*` builder methods.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `BASE_URL` | `https://www.demoblaze.com` | Storefront origin |
//! | `API_URL` | `https://api.demoblaze.com` | HTTP API origin |
//! | `TIMEOUT` | `30000` | Default wait in milliseconds |
//! | `HEADLESS` | `true` | Run Chrome without a window |
//! | `CHROME_BIN` | unset | Chrome executable to launch |
//! | `CDP_WS_URL` | unset | Existing DevTools endpoint to attach to |
//! | `E2E_BACKEND` | `memory` | `memory` or `cdp` |

// ============================================================================
// Imports
// ============================================================================

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Default storefront origin.
pub const DEFAULT_BASE_URL: &str = "https://www.demoblaze.com";

/// Default API origin.
pub const DEFAULT_API_URL: &str = "https://api.demoblaze.com";

/// Default wait timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

// ============================================================================
// Backend
// ============================================================================

/// Which [`Browser`](crate::Browser) implementation scenarios run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// In-memory storefront simulation.
    #[default]
    Memory,
    /// Real Chrome over the DevTools Protocol.
    Cdp,
}

impl FromStr for Backend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "sim" => Ok(Self::Memory),
            "cdp" | "chrome" => Ok(Self::Cdp),
            other => Err(Error::config(format!(
                "Unknown backend '{other}', expected 'memory' or 'cdp'"
            ))),
        }
    }
}

// ============================================================================
// SuiteConfig
// ============================================================================

/// Run-wide settings shared by every scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteConfig {
    /// Storefront origin.
    pub base_url: String,
    /// HTTP API origin.
    pub api_url: String,
    /// Default wait timeout.
    pub timeout: Duration,
    /// Run Chrome headless.
    pub headless: bool,
    /// Chrome executable.
    pub chrome_bin: Option<PathBuf>,
    /// Existing DevTools WebSocket endpoint.
    pub cdp_ws_url: Option<String>,
    /// Browser backend.
    pub backend: Backend,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            headless: true,
            chrome_bin: None,
            cdp_ws_url: None,
            backend: Backend::Memory,
        }
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl SuiteConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if a variable is present but malformed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if a value is present but malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(base_url) = get("BASE_URL") {
            config.base_url = base_url;
        }

        if let Some(api_url) = get("API_URL") {
            config.api_url = api_url;
        }

        if let Some(timeout) = get("TIMEOUT") {
            let ms: u64 = timeout
                .trim()
                .parse()
                .map_err(|_| Error::config(format!("TIMEOUT must be milliseconds, got '{timeout}'")))?;
            config.timeout = Duration::from_millis(ms);
        }

        if let Some(headless) = get("HEADLESS") {
            config.headless = !matches!(
                headless.trim().to_ascii_lowercase().as_str(),
                "0" | "false" | "no" | "off"
            );
        }

        config.chrome_bin = get("CHROME_BIN").map(PathBuf::from);
        config.cdp_ws_url = get("CDP_WS_URL");

        if let Some(backend) = get("E2E_BACKEND") {
            config.backend = backend.parse()?;
        }

        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl SuiteConfig {
    /// Sets the storefront origin.
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the API origin.
    #[inline]
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Sets the default wait timeout.
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets headless mode.
    #[inline]
    #[must_use]
    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Sets the Chrome executable.
    #[inline]
    #[must_use]
    pub fn with_chrome_bin(mut self, path: impl Into<PathBuf>) -> Self {
        self.chrome_bin = Some(path.into());
        self
    }

    /// Sets an existing DevTools endpoint.
    #[inline]
    #[must_use]
    pub fn with_cdp_ws_url(mut self, url: impl Into<String>) -> Self {
        self.cdp_ws_url = Some(url.into());
        self
    }

    /// Sets the browser backend.
    #[inline]
    #[must_use]
    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }
}

// ============================================================================
// Validation & Accessors
// ============================================================================

impl SuiteConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] for unparsable URLs, a zero timeout, or a CDP
    /// backend with neither `CHROME_BIN` nor `CDP_WS_URL`.
    pub fn validate(&self) -> Result<()> {
        self.parsed_base_url()?;
        Url::parse(&self.api_url)
            .map_err(|e| Error::config(format!("API_URL '{}' is invalid: {e}", self.api_url)))?;

        if self.timeout.is_zero() {
            return Err(Error::config("TIMEOUT must be greater than zero"));
        }

        if self.backend == Backend::Cdp && self.chrome_bin.is_none() && self.cdp_ws_url.is_none() {
            return Err(Error::config(
                "The cdp backend needs CHROME_BIN or CDP_WS_URL",
            ));
        }

        Ok(())
    }

    /// Returns the storefront origin as a [`Url`].
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if the URL does not parse.
    pub fn parsed_base_url(&self) -> Result<Url> {
        Url::parse(&self.base_url)
            .map_err(|e| Error::config(format!("BASE_URL '{}' is invalid: {e}", self.base_url)))
    }

    /// Joins `path` onto the storefront origin.
    ///
    /// `"/cart.html"` on `https://www.demoblaze.com` gives
    /// `https://www.demoblaze.com/cart.html`.
    #[must_use]
    pub fn page_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

// ============================================================================
// Tests
// ============================================================================
