//! WebSocket transport layer.
//!
//! This module handles communication between the local end (Rust) and
//! Chrome's DevTools endpoint.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐                              ┌─────────────────┐
//! │  CdpBrowser     │                              │  Chrome         │
//! │                 │         WebSocket            │                 │
//! │  Connection     │─────────────────────────────►│  DevTools       │
//! │  (event loop)   │◄─────────────────────────────│  endpoint       │
//! └─────────────────┘  ws://127.0.0.1:PORT/devtools └─────────────────┘
//! ```
//!
//! # Connection Lifecycle
//!
//! 1. Chrome starts with `--remote-debugging-port=0` and prints its endpoint
//! 2. `Connection::connect` - WebSocket handshake, event loop spawned
//! 3. `Connection::execute` - Send commands, receive responses/events
//! 4. `Connection::shutdown` - Close connection when the page closes

// ============================================================================
// Submodules
// ============================================================================

/// WebSocket connection and event loop.
pub mod connection;

// ============================================================================
// Re-exports
// ============================================================================

pub use connection::{Connection, DEFAULT_COMMAND_TIMEOUT, EventHandler};
