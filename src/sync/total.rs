//! Cart total resolution.
//!
//! ```text
//!            total text non-empty
//!   Loading ──────────────────────▶ HasTotal(value)
//!      │
//!      │     table present, no rows, held for `quiet`
//!      └──────────────────────────▶ EmptyConfirmed (0)
//! ```
//!
//! The total element is checked first, so a populated total always wins
//! over a momentarily empty table. A total that is still blank is never
//! read as zero.
//!
//! The table body is static markup, so a cart whose rows have not arrived
//! yet looks exactly like an empty one. [`TotalProbe::observe`] reports
//! that snapshot as [`TotalState::EmptyConfirmed`]; [`resolve_total`] only
//! accepts it once it has held for [`TotalProbe::quiet`] with no row or
//! total showing up.

use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::{debug, trace};

use crate::browser::{Browser, Locator, WAIT_POLL_INTERVAL};
use crate::error::{Error, Result};
use crate::model::parse_price;

// ============================================================================
// Constants
// ============================================================================

/// How long an empty table must hold before it counts as an empty cart.
///
/// Longer than one `/view` round-trip, which is the gap between the cart
/// list arriving and its first row rendering.
pub const DEFAULT_EMPTY_QUIET: Duration = Duration::from_millis(1500);

// ============================================================================
// TotalState
// ============================================================================

/// Observed state of the cart total.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TotalState {
    /// Neither a total nor an empty table yet.
    Loading,
    /// The total element shows a value.
    HasTotal(f64),
    /// The table is present and has no rows.
    EmptyConfirmed,
}

impl TotalState {
    /// Resolved amount, `None` while loading.
    #[inline]
    #[must_use]
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Loading => None,
            Self::HasTotal(total) => Some(total),
            Self::EmptyConfirmed => Some(0.0),
        }
    }
}

// ============================================================================
// Probe
// ============================================================================

/// Elements the state machine watches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalProbe {
    /// Element whose text is the total.
    pub total: Locator,
    /// Row container.
    pub container: Locator,
    /// Rows inside the container.
    pub rows: Locator,
    /// Time an empty table must hold before it resolves to `0`.
    pub quiet: Duration,
}

impl TotalProbe {
    /// The quiet window defaults to [`DEFAULT_EMPTY_QUIET`].
    #[must_use]
    pub fn new(total: Locator, container: Locator, rows: Locator) -> Self {
        Self {
            total,
            container,
            rows,
            quiet: DEFAULT_EMPTY_QUIET,
        }
    }

    /// Sets the quiet window.
    #[must_use]
    pub fn with_quiet(mut self, quiet: Duration) -> Self {
        self.quiet = quiet;
        self
    }

    /// Samples both conditions once.
    pub async fn observe(&self, browser: &dyn Browser) -> Result<TotalState> {
        let text = browser.text_content(&self.total).await?.unwrap_or_default();
        if !text.trim().is_empty() {
            return Ok(TotalState::HasTotal(parse_price(&text)));
        }

        if browser.count(&self.container).await? > 0 && browser.count(&self.rows).await? == 0 {
            return Ok(TotalState::EmptyConfirmed);
        }

        Ok(TotalState::Loading)
    }
}

/// Re-observes until the total resolves or `deadline` elapses.
///
/// A total resolves on the first sample that shows it. An empty table
/// resolves to `0` only after every sample across `probe.quiet` agreed;
/// any row appearing in between starts the window over.
///
/// # Errors
///
/// - [`Error::TotalResolutionTimeout`] if unresolved at the deadline
/// - driver errors from sampling
pub async fn resolve_total(browser: &dyn Browser, probe: &TotalProbe, deadline: Duration) -> Result<f64> {
    let give_up = Instant::now() + deadline;
    let mut empty_since: Option<Instant> = None;

    loop {
        match probe.observe(browser).await? {
            TotalState::HasTotal(total) => {
                debug!(total, "Cart total resolved");
                return Ok(total);
            }
            TotalState::EmptyConfirmed => {
                let since = *empty_since.get_or_insert_with(Instant::now);
                if since.elapsed() >= probe.quiet {
                    debug!(quiet_ms = probe.quiet.as_millis() as u64, "Cart confirmed empty");
                    return Ok(0.0);
                }
            }
            TotalState::Loading => empty_since = None,
        }

        if Instant::now() >= give_up {
            return Err(Error::total_resolution_timeout(deadline.as_millis() as u64));
        }

        trace!(empty = empty_since.is_some(), "Cart total loading");
        sleep(WAIT_POLL_INTERVAL).await;
    }
}

// ============================================================================
// Tests
// ============================================================================
