//! Chrome command-line options.
//!
//! # Example
//!
//! ```ignore
//! use storefront_e2e::ChromeOptions;
//!
//! let options = ChromeOptions::new()
//!     .with_headless()
//!     .with_window_size(1280, 720);
//!
//! let args = options.to_args();
//! // [..., "--headless=new", "--window-size=1280,720"]
//! ```

// ============================================================================
// Constants
// ============================================================================

/// Flags passed on every launch.
const BASE_ARGS: &[&str] = &[
    "--remote-debugging-port=0",
    "--no-first-run",
    "--no-default-browser-check",
    "--disable-background-networking",
    "--disable-popup-blocking",
    "--disable-dev-shm-usage",
];

// ============================================================================
// ChromeOptions
// ============================================================================

/// Chrome process configuration options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChromeOptions {
    /// Run Chrome without a GUI.
    pub headless: bool,

    /// Window dimensions in pixels (width, height).
    pub window_size: Option<(u32, u32)>,

    /// Disable the Chrome sandbox (containers running as root).
    pub no_sandbox: bool,

    /// Additional custom command-line arguments.
    pub extra_args: Vec<String>,
}

// ============================================================================
// Constructors
// ============================================================================

impl ChromeOptions {
    /// Creates a new options instance with default settings.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            headless: false,
            window_size: None,
            no_sandbox: false,
            extra_args: Vec::new(),
        }
    }

    /// Creates options configured for headless mode.
    #[inline]
    #[must_use]
    pub fn headless() -> Self {
        Self {
            headless: true,
            ..Default::default()
        }
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl ChromeOptions {
    /// Enables headless mode.
    #[inline]
    #[must_use]
    pub fn with_headless(mut self) -> Self {
        self.headless = true;
        self
    }

    /// Sets window size in pixels.
    #[inline]
    #[must_use]
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = Some((width, height));
        self
    }

    /// Disables the sandbox.
    #[inline]
    #[must_use]
    pub fn with_no_sandbox(mut self) -> Self {
        self.no_sandbox = true;
        self
    }

    /// Adds a custom command-line argument.
    #[inline]
    #[must_use]
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.extra_args.push(arg.into());
        self
    }
}

// ============================================================================
// Conversion Methods
// ============================================================================

impl ChromeOptions {
    /// Converts options to Chrome command-line arguments.
    ///
    /// The user-data directory is added by the launcher.
    #[must_use]
    pub fn to_args(&self) -> Vec<String> {
        let mut args: Vec<String> = BASE_ARGS.iter().map(|a| (*a).to_string()).collect();

        if self.headless {
            args.push("--headless=new".to_string());
        }

        if let Some((width, height)) = self.window_size {
            args.push(format!("--window-size={width},{height}"));
        }

        if self.no_sandbox {
            args.push("--no-sandbox".to_string());
        }

        args.extend(self.extra_args.iter().cloned());
        args
    }

    /// Validates the options configuration.
    ///
    /// # Errors
    ///
    /// Returns error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if let Some((width, height)) = self.window_size
            && (width == 0 || height == 0)
        {
            return Err("Window dimensions must be greater than zero".to_string());
        }

        if self
            .extra_args
            .iter()
            .any(|a| a.starts_with("--remote-debugging-port") || a.starts_with("--user-data-dir"))
        {
            return Err("Debugging port and user-data-dir are managed by the launcher".to_string());
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_creates_default() {
        let options = ChromeOptions::new();
        assert!(!options.headless);
        assert!(options.window_size.is_none());
        assert!(options.extra_args.is_empty());
    }

    #[test]
    fn test_to_args_always_requests_debugging_port() {
        let args = ChromeOptions::new().to_args();
        assert!(args.contains(&"--remote-debugging-port=0".to_string()));
        assert!(!args.contains(&"--headless=new".to_string()));
    }

    #[test]
    fn test_to_args_all_options() {
        let args = ChromeOptions::headless()
            .with_window_size(1280, 720)
            .with_no_sandbox()
            .with_arg("--lang=en-US")
            .to_args();

        assert!(args.contains(&"--headless=new".to_string()));
        assert!(args.contains(&"--window-size=1280,720".to_string()));
        assert!(args.contains(&"--no-sandbox".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("--lang=en-US"));
    }

    #[test]
    fn test_validate_zero_width() {
        assert!(ChromeOptions::new().with_window_size(0, 600).validate().is_err());
        assert!(ChromeOptions::new().with_window_size(800, 600).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_managed_flags() {
        let options = ChromeOptions::new().with_arg("--user-data-dir=/tmp/x");
        assert!(options.validate().is_err());
    }
}
