//! UI-state synchronization.
//!
//! The storefront fills its pages asynchronously and offers no "loaded"
//! signal, so the page objects compose these waits:
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`actions`] | Wait-then-act primitives with explicit timeouts |
//! | [`dialog`] | One-shot native dialog capture, armed before the trigger |
//! | [`response`] | Trigger raced against the network response it causes |
//! | [`stabilize`] | Count polling until the value holds steady |
//! | [`total`] | Cart total state machine |

// ============================================================================
// Submodules
// ============================================================================

pub mod actions;
pub mod dialog;
pub mod response;
pub mod stabilize;
pub mod total;

// ============================================================================
// Re-exports
// ============================================================================

pub use dialog::{ArmedDialog, DialogInterceptor, capture_dialog};
pub use response::{PendingResponseMatch, RaceMode, ResponseOutcome, race_response};
pub use stabilize::{Stabilization, StabilizationPolicy, poll_until_stable};
pub use total::{DEFAULT_EMPTY_QUIET, TotalProbe, TotalState, resolve_total};
