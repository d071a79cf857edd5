//! Chrome DevTools Protocol message types.
//!
//! This module defines the JSON messages exchanged with Chrome over the
//! DevTools WebSocket.
//!
//! # Protocol Overview
//!
//! | Message Type | Direction | Purpose |
//! |--------------|-----------|---------|
//! | `Request` | Local → Browser | Command request |
//! | `Response` | Browser → Local | Command response, carries the request `id` |
//! | `Event` | Browser → Local | Notification, carries `method` and no `id` |
//! | `EventReply` | Local → Browser | Fire-and-forget command issued from an event |
//!
//! # Sessions
//!
//! The page is attached with `flatten: true`, so page-level commands and
//! events carry a `sessionId` next to `method` instead of being wrapped in
//! `Target.sendMessageToTarget`.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `command` | Command definitions by domain |
//! | `event` | Event and EventReply types |
//! | `request` | Request and Response types |

// ============================================================================
// Submodules
// ============================================================================

/// Command definitions organized by domain.
pub mod command;

/// Event message types.
pub mod event;

/// Request and Response message types.
pub mod request;

// ============================================================================
// Re-exports
// ============================================================================

pub use command::Command;
pub use event::{Event, EventReply, ParsedEvent};
pub use request::{Request, Response, ResponseError};
