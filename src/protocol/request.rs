//! Request and Response message types.
//!
//! Requests carry an integer `id` that the browser echoes in the response.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

use super::Command;

// ============================================================================
// Request
// ============================================================================

/// A command request from local end to the browser.
///
/// # Format
///
/// ```json
/// {
///   "id": 7,
///   "sessionId": "8A1F...",
///   "method": "Domain.methodName",
///   "params": { ... }
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    /// Identifier for request/response correlation.
    pub id: u64,

    /// Page session, absent for browser-level commands.
    #[serde(rename = "sessionId", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Command with method and params.
    #[serde(flatten)]
    pub command: Command,
}

impl Request {
    /// Creates a browser-level request.
    #[inline]
    #[must_use]
    pub fn new(id: u64, command: Command) -> Self {
        Self {
            id,
            session_id: None,
            command,
        }
    }

    /// Creates a request routed to a page session.
    #[inline]
    #[must_use]
    pub fn for_session(id: u64, session_id: impl Into<String>, command: Command) -> Self {
        Self {
            id,
            session_id: Some(session_id.into()),
            command,
        }
    }
}

// ============================================================================
// Response
// ============================================================================

/// A response from the browser.
///
/// # Format
///
/// Success:
/// ```json
/// { "id": 7, "result": { ... } }
/// ```
///
/// Error:
/// ```json
/// { "id": 7, "error": { "code": -32000, "message": "..." } }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Response {
    /// Matches the request `id`.
    pub id: u64,

    /// Result data (if success).
    #[serde(default)]
    pub result: Option<Value>,

    /// Error details (if error).
    #[serde(default)]
    pub error: Option<ResponseError>,
}

/// Error body of a failed command.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseError {
    /// JSON-RPC style error code.
    pub code: i64,
    /// Error message.
    pub message: String,
}

impl Response {
    /// Returns `true` if this is a success response.
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Extracts the result value, returning error if response was error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Protocol`] if the response was an error.
    pub fn into_result(self) -> Result<Value> {
        match self.error {
            None => Ok(self.result.unwrap_or(Value::Null)),
            Some(error) => Err(Error::protocol(format!("{} ({})", error.message, error.code))),
        }
    }

    /// Gets a string value from the result.
    ///
    /// Returns empty string if key not found or not a string.
    #[inline]
    #[must_use]
    pub fn get_string(&self, key: &str) -> String {
        self.result
            .as_ref()
            .and_then(|v| v.get(key))
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = Request::for_session(
            3,
            "S1",
            Command::PageNavigate {
                url: "https://www.demoblaze.com".to_string(),
            },
        );
        let json = serde_json::to_string(&request).expect("serialize");

        assert!(json.contains("\"id\":3"));
        assert!(json.contains("\"sessionId\":\"S1\""));
        assert!(json.contains("Page.navigate"));
    }

    #[test]
    fn test_browser_request_omits_session() {
        let request = Request::new(
            1,
            Command::TargetCreateTarget {
                url: "about:blank".into(),
                browser_context_id: None,
            },
        );
        let json = serde_json::to_string(&request).expect("serialize");
        assert!(!json.contains("sessionId"));
    }

    #[test]
    fn test_success_response() {
        let response: Response =
            serde_json::from_str(r#"{"id": 1, "result": {"targetId": "T1"}}"#).expect("parse");
        assert!(response.is_success());
        assert_eq!(response.get_string("targetId"), "T1");
        assert_eq!(response.get_string("missing"), "");
    }

    #[test]
    fn test_error_response() {
        let response: Response = serde_json::from_str(
            r#"{"id": 2, "error": {"code": -32000, "message": "No dialog is showing"}}"#,
        )
        .expect("parse");
        assert!(!response.is_success());

        let err = response.into_result().unwrap_err();
        assert!(err.to_string().contains("No dialog is showing"));
    }

    #[test]
    fn test_event_is_not_a_response() {
        let parsed = serde_json::from_str::<Response>(r#"{"method": "Page.loadEventFired", "params": {}}"#);
        assert!(parsed.is_err());
    }
}
