//! Event message types.
//!
//! Events are notifications the browser pushes without a request `id`.
//!
//! # Consumed Events
//!
//! | Domain | Events |
//! |--------|--------|
//! | `Page` | `javascriptDialogOpening`, `domContentEventFired`, `loadEventFired` |
//! | `Network` | `responseReceived` |

// ============================================================================
// Imports
// ============================================================================

use serde::Deserialize;
use serde_json::Value;

use super::Command;

// ============================================================================
// Event
// ============================================================================

/// An event notification from the browser.
///
/// # Format
///
/// ```json
/// {
///   "method": "Domain.eventName",
///   "params": { ... },
///   "sessionId": "8A1F..."
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    /// Event name in `Domain.eventName` format.
    pub method: String,

    /// Event-specific data.
    #[serde(default)]
    pub params: Value,

    /// Session the event belongs to.
    #[serde(rename = "sessionId", default)]
    pub session_id: Option<String>,
}

impl Event {
    /// Returns the domain name from the method.
    #[inline]
    #[must_use]
    pub fn domain(&self) -> &str {
        self.method.split('.').next().unwrap_or_default()
    }

    /// Parses the event into a typed variant.
    #[must_use]
    pub fn parse(&self) -> ParsedEvent {
        match self.method.as_str() {
            "Page.javascriptDialogOpening" => ParsedEvent::DialogOpening {
                kind: self.get_string("type"),
                message: self.get_string("message"),
            },

            "Page.domContentEventFired" => ParsedEvent::DomContentLoaded,

            "Page.loadEventFired" => ParsedEvent::Load,

            "Network.responseReceived" => {
                let response = self.params.get("response");
                ParsedEvent::ResponseReceived {
                    url: response
                        .and_then(|r| r.get("url"))
                        .and_then(|v| v.as_str())
                        .unwrap_or_default()
                        .to_string(),
                    status: response
                        .and_then(|r| r.get("status"))
                        .and_then(|v| v.as_u64())
                        .unwrap_or_default() as u16,
                }
            }

            _ => ParsedEvent::Unknown {
                method: self.method.clone(),
                params: self.params.clone(),
            },
        }
    }

    /// Gets a string param, empty if missing.
    fn get_string(&self, key: &str) -> String {
        self.params
            .get(key)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    }
}

// ============================================================================
// EventReply
// ============================================================================

/// A command issued in reaction to an event.
///
/// The event loop sends it without tracking its response. Used to dismiss
/// dialogs nobody is waiting for.
#[derive(Debug, Clone, PartialEq)]
pub struct EventReply {
    /// Session the command targets.
    pub session_id: Option<String>,
    /// Command to send.
    pub command: Command,
}

impl EventReply {
    /// Creates a reply targeting the event's session.
    #[inline]
    #[must_use]
    pub fn new(event: &Event, command: Command) -> Self {
        Self {
            session_id: event.session_id.clone(),
            command,
        }
    }

    /// Creates a reply that dismisses the open dialog.
    #[inline]
    #[must_use]
    pub fn dismiss_dialog(event: &Event) -> Self {
        Self::new(event, Command::PageHandleJavaScriptDialog { accept: false })
    }
}

// ============================================================================
// ParsedEvent
// ============================================================================

/// Parsed event types for type-safe handling.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedEvent {
    /// A native dialog opened.
    DialogOpening {
        /// CDP dialog type (`alert`, `confirm`, `prompt`, `beforeunload`).
        kind: String,
        /// Dialog message.
        message: String,
    },

    /// DOM content loaded.
    DomContentLoaded,

    /// Page load complete.
    Load,

    /// Response headers received.
    ResponseReceived {
        /// Response URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// Unknown event type.
    Unknown {
        /// Event method.
        method: String,
        /// Event params.
        params: Value,
    },
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn event(json: &str) -> Event {
        serde_json::from_str(json).expect("parse")
    }

    #[test]
    fn test_dialog_opening() {
        let event = event(
            r#"{"method": "Page.javascriptDialogOpening",
                "params": {"type": "alert", "message": "Product added."},
                "sessionId": "S1"}"#,
        );

        assert_eq!(event.domain(), "Page");
        assert_eq!(
            event.parse(),
            ParsedEvent::DialogOpening {
                kind: "alert".to_string(),
                message: "Product added.".to_string(),
            }
        );
    }

    #[test]
    fn test_response_received() {
        let event = event(
            r#"{"method": "Network.responseReceived",
                "params": {"requestId": "1", "response": {"url": "https://api.demoblaze.com/viewcart", "status": 200}}}"#,
        );

        assert_eq!(
            event.parse(),
            ParsedEvent::ResponseReceived {
                url: "https://api.demoblaze.com/viewcart".to_string(),
                status: 200,
            }
        );
    }

    #[test]
    fn test_unknown_event() {
        let event = event(r#"{"method": "Runtime.consoleAPICalled", "params": {}}"#);
        assert!(matches!(event.parse(), ParsedEvent::Unknown { .. }));
    }

    #[test]
    fn test_dismiss_reply_keeps_session() {
        let event = event(r#"{"method": "Page.javascriptDialogOpening", "params": {}, "sessionId": "S9"}"#);
        let reply = EventReply::dismiss_dialog(&event);

        assert_eq!(reply.session_id.as_deref(), Some("S9"));
        assert_eq!(reply.command, Command::PageHandleJavaScriptDialog { accept: false });
    }
}
