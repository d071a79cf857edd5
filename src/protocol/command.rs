//! Command definitions organized by domain.
//!
//! Commands follow the CDP `Domain.methodName` format.
//!
//! # Command Domains
//!
//! | Domain | Commands |
//! |--------|----------|
//! | `Target` | Create, attach and dispose the page target |
//! | `Page` | Enable, navigate, dialogs, screenshots |
//! | `Network` | Enable response events |
//! | `Runtime` | Enable, evaluate scripts |
//! | `Input` | Keyboard events |

// ============================================================================
// Imports
// ============================================================================

use serde::Serialize;

// ============================================================================
// Command
// ============================================================================

/// CDP commands used by the suite.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "method", content = "params")]
pub enum Command {
    // ========================================================================
    // Target
    // ========================================================================
    /// Create an isolated browser context (own cookies and storage).
    #[serde(rename = "Target.createBrowserContext")]
    TargetCreateBrowserContext {},

    /// Open a new page target.
    #[serde(rename = "Target.createTarget")]
    TargetCreateTarget {
        /// Initial URL.
        url: String,
        /// Context to open the page in, default context if absent.
        #[serde(rename = "browserContextId", skip_serializing_if = "Option::is_none")]
        browser_context_id: Option<String>,
    },

    /// Attach to a target and obtain a session.
    #[serde(rename = "Target.attachToTarget")]
    TargetAttachToTarget {
        /// Target to attach to.
        #[serde(rename = "targetId")]
        target_id: String,
        /// Route the session over the browser connection.
        flatten: bool,
    },

    /// Close a target.
    #[serde(rename = "Target.closeTarget")]
    TargetCloseTarget {
        /// Target to close.
        #[serde(rename = "targetId")]
        target_id: String,
    },

    /// Dispose a browser context and every target still open in it.
    #[serde(rename = "Target.disposeBrowserContext")]
    TargetDisposeBrowserContext {
        /// Context created by `Target.createBrowserContext`.
        #[serde(rename = "browserContextId")]
        browser_context_id: String,
    },

    // ========================================================================
    // Page
    // ========================================================================
    /// Enable page events.
    #[serde(rename = "Page.enable")]
    PageEnable {},

    /// Navigate the page.
    #[serde(rename = "Page.navigate")]
    PageNavigate {
        /// Destination URL.
        url: String,
    },

    /// Accept or dismiss the open JavaScript dialog.
    #[serde(rename = "Page.handleJavaScriptDialog")]
    PageHandleJavaScriptDialog {
        /// `true` to press OK.
        accept: bool,
    },

    /// Capture the viewport.
    #[serde(rename = "Page.captureScreenshot")]
    PageCaptureScreenshot {
        /// Image format (`png` or `jpeg`).
        format: String,
    },

    // ========================================================================
    // Network
    // ========================================================================
    /// Enable network events.
    #[serde(rename = "Network.enable")]
    NetworkEnable {},

    // ========================================================================
    // Runtime
    // ========================================================================
    /// Enable runtime events.
    #[serde(rename = "Runtime.enable")]
    RuntimeEnable {},

    /// Evaluate an expression in the page.
    #[serde(rename = "Runtime.evaluate")]
    RuntimeEvaluate {
        /// JavaScript expression.
        expression: String,
        /// Return the result as JSON instead of a remote object.
        #[serde(rename = "returnByValue")]
        return_by_value: bool,
        /// Await a returned promise.
        #[serde(rename = "awaitPromise")]
        await_promise: bool,
    },

    // ========================================================================
    // Input
    // ========================================================================
    /// Dispatch a key event to the focused element.
    #[serde(rename = "Input.dispatchKeyEvent")]
    InputDispatchKeyEvent {
        /// `keyDown` or `keyUp`.
        #[serde(rename = "type")]
        event_type: String,
        /// DOM key value.
        key: String,
        /// DOM code value.
        code: String,
        /// Legacy key code.
        #[serde(rename = "windowsVirtualKeyCode")]
        key_code: u32,
        /// Inserted text, `"\r"` for Enter.
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
}

impl Command {
    /// Creates a `Runtime.evaluate` that awaits promises and returns by value.
    #[inline]
    pub fn evaluate(expression: impl Into<String>) -> Self {
        Self::RuntimeEvaluate {
            expression: expression.into(),
            return_by_value: true,
            await_promise: true,
        }
    }

    /// Returns the CDP method name.
    #[must_use]
    pub fn method(&self) -> &'static str {
        match self {
            Self::TargetCreateBrowserContext {} => "Target.createBrowserContext",
            Self::TargetCreateTarget { .. } => "Target.createTarget",
            Self::TargetAttachToTarget { .. } => "Target.attachToTarget",
            Self::TargetCloseTarget { .. } => "Target.closeTarget",
            Self::TargetDisposeBrowserContext { .. } => "Target.disposeBrowserContext",
            Self::PageEnable {} => "Page.enable",
            Self::PageNavigate { .. } => "Page.navigate",
            Self::PageHandleJavaScriptDialog { .. } => "Page.handleJavaScriptDialog",
            Self::PageCaptureScreenshot { .. } => "Page.captureScreenshot",
            Self::NetworkEnable {} => "Network.enable",
            Self::RuntimeEnable {} => "Runtime.enable",
            Self::RuntimeEvaluate { .. } => "Runtime.evaluate",
            Self::InputDispatchKeyEvent { .. } => "Input.dispatchKeyEvent",
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
