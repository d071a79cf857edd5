//! Error types for the storefront suite.
//!
//! Every fallible operation returns [`Result<T>`] which uses [`Error`].
//! Synchronization failures carry the operation and the timeout that fired,
//! so a failed scenario shows whether it hit a flaky wait or a real defect.
//!
//! # Usage
//!
//! ```ignore
//! use storefront_e2e::{Error, Result};
//!
//! async fn example(cart: &CartPage) -> Result<()> {
//!     let total = cart.total_price().await?;
//!     if total != 150.0 {
//!         return Err(Error::assertion(format!("unexpected total {total}")));
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Synchronization | [`Error::ElementNotFound`], [`Error::DialogTimeout`], [`Error::ResponseTimeout`], [`Error::TotalResolutionTimeout`] |
//! | Configuration | [`Error::Config`], [`Error::BrowserLaunch`] |
//! | Connection | [`Error::Connection`], [`Error::ConnectionTimeout`], [`Error::ConnectionClosed`] |
//! | Protocol | [`Error::Protocol`], [`Error::Script`], [`Error::UnexpectedDialog`] |
//! | Scenario | [`Error::Assertion`] |
//! | External | [`Error::Http`], [`Error::Io`], [`Error::Json`], [`Error::WebSocket`], [`Error::ChannelClosed`] |

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::result::Result as StdResult;

use thiserror::Error;
use tokio::sync::oneshot::error::RecvError;
use tokio_tungstenite::tungstenite::Error as WsError;

use crate::browser::ElementState;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Synchronization Errors
    // ========================================================================
    /// A locator never reached the required state before its timeout.
    #[error("Element {selector} not {state} after {timeout_ms}ms")]
    ElementNotFound {
        /// Locator description.
        selector: String,
        /// State that was awaited.
        state: ElementState,
        /// Milliseconds waited.
        timeout_ms: u64,
    },

    /// No native dialog opened before the caller's timeout.
    #[error("No dialog opened within {timeout_ms}ms")]
    DialogTimeout {
        /// Milliseconds waited.
        timeout_ms: u64,
    },

    /// A hard response wait expired.
    ///
    /// Soft waits never produce this; they log and continue.
    #[error("No response matching '{url_pattern}' with status {status} within {timeout_ms}ms")]
    ResponseTimeout {
        /// URL substring that was awaited.
        url_pattern: String,
        /// Expected HTTP status.
        status: u16,
        /// Milliseconds waited.
        timeout_ms: u64,
    },

    /// The cart total stayed in `Loading` past its deadline.
    #[error("Cart total unresolved after {timeout_ms}ms")]
    TotalResolutionTimeout {
        /// Milliseconds waited.
        timeout_ms: u64,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid suite or browser configuration.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// The browser process could not be started.
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Description of the launch failure.
        message: String,
    },

    // ========================================================================
    // Connection Errors
    // ========================================================================
    /// WebSocket connection failed.
    #[error("Connection failed: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// The browser did not answer a command in time.
    #[error("Connection timeout after {timeout_ms}ms: {operation}")]
    ConnectionTimeout {
        /// Command that timed out.
        operation: String,
        /// Milliseconds waited.
        timeout_ms: u64,
    },

    /// WebSocket connection closed unexpectedly.
    #[error("Connection closed")]
    ConnectionClosed,

    // ========================================================================
    // Protocol Errors
    // ========================================================================
    /// Protocol violation or error reply from the browser.
    #[error("Protocol error: {message}")]
    Protocol {
        /// Description of the protocol violation.
        message: String,
    },

    /// Page script threw.
    #[error("Script error: {message}")]
    Script {
        /// Exception text reported by the page.
        message: String,
    },

    /// A dialog opened where the flow did not expect one.
    #[error("Unexpected dialog: {message}")]
    UnexpectedDialog {
        /// Dialog message text.
        message: String,
    },

    // ========================================================================
    // Scenario Errors
    // ========================================================================
    /// A scenario expectation did not hold.
    #[error("Assertion failed: {message}")]
    Assertion {
        /// What was expected and what was observed.
        message: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// HTTP client error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),

    /// Channel receive error.
    #[error("Channel closed")]
    ChannelClosed(#[from] RecvError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates an element-not-found error.
    #[inline]
    pub fn element_not_found(selector: impl Into<String>, state: ElementState, timeout_ms: u64) -> Self {
        Self::ElementNotFound {
            selector: selector.into(),
            state,
            timeout_ms,
        }
    }

    /// Creates a dialog timeout error.
    #[inline]
    pub fn dialog_timeout(timeout_ms: u64) -> Self {
        Self::DialogTimeout { timeout_ms }
    }

    /// Creates a response timeout error.
    #[inline]
    pub fn response_timeout(url_pattern: impl Into<String>, status: u16, timeout_ms: u64) -> Self {
        Self::ResponseTimeout {
            url_pattern: url_pattern.into(),
            status,
            timeout_ms,
        }
    }

    /// Creates a total resolution timeout error.
    #[inline]
    pub fn total_resolution_timeout(timeout_ms: u64) -> Self {
        Self::TotalResolutionTimeout { timeout_ms }
    }

    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a browser launch error.
    #[inline]
    pub fn browser_launch(message: impl Into<String>) -> Self {
        Self::BrowserLaunch {
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[inline]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a connection timeout error.
    #[inline]
    pub fn connection_timeout(operation: impl Into<String>, timeout_ms: u64) -> Self {
        Self::ConnectionTimeout {
            operation: operation.into(),
            timeout_ms,
        }
    }

    /// Creates a protocol error.
    #[inline]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Creates a script error.
    #[inline]
    pub fn script(message: impl Into<String>) -> Self {
        Self::Script {
            message: message.into(),
        }
    }

    /// Creates an unexpected dialog error.
    #[inline]
    pub fn unexpected_dialog(message: impl Into<String>) -> Self {
        Self::UnexpectedDialog {
            message: message.into(),
        }
    }

    /// Creates an assertion error.
    #[inline]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::Assertion {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is any kind of timeout.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::ElementNotFound { .. }
                | Self::DialogTimeout { .. }
                | Self::ResponseTimeout { .. }
                | Self::TotalResolutionTimeout { .. }
                | Self::ConnectionTimeout { .. }
        )
    }

    /// Returns `true` if a UI synchronization wait failed.
    ///
    /// These point at flaky waits or slow pages rather than broken plumbing.
    #[inline]
    #[must_use]
    pub fn is_synchronization_error(&self) -> bool {
        matches!(
            self,
            Self::ElementNotFound { .. }
                | Self::DialogTimeout { .. }
                | Self::ResponseTimeout { .. }
                | Self::TotalResolutionTimeout { .. }
        )
    }

    /// Returns `true` if this is a connection error.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. }
                | Self::ConnectionTimeout { .. }
                | Self::ConnectionClosed
                | Self::WebSocket(_)
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
