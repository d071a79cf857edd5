//! Racing a UI action against the network response it causes.
//!
//! The listener subscribes before the trigger runs, so a response that
//! arrives while the trigger is still executing is not missed.
//!
//! | Mode | Timeout |
//! |------|---------|
//! | [`RaceMode::Soft`] | logged, returns [`ResponseOutcome::TimedOut`] |
//! | [`RaceMode::Hard`] | [`Error::ResponseTimeout`] |
//!
//! Trigger errors propagate in both modes.

use std::future::Future;
use std::time::Duration;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time::{Instant, timeout_at};
use tracing::{debug, trace, warn};

use crate::browser::{Browser, NetworkResponse};
use crate::error::{Error, Result};

// ============================================================================
// Types
// ============================================================================

/// How a response wait that expires is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaceMode {
    /// Expiry is a valid outcome.
    Soft,
    /// Expiry fails the operation.
    Hard,
}

/// Result of a response wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// A matching response arrived.
    Matched(NetworkResponse),
    /// The deadline passed first.
    TimedOut,
}

impl ResponseOutcome {
    /// Returns `true` for [`ResponseOutcome::Matched`].
    #[inline]
    #[must_use]
    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched(_))
    }
}

// ============================================================================
// PendingResponseMatch
// ============================================================================

/// An in-flight expectation of a network response.
#[derive(Debug)]
pub struct PendingResponseMatch {
    /// Substring the response URL must contain.
    pub url_substring: String,
    /// Required HTTP status.
    pub expected_status: u16,
    /// When the wait gives up.
    pub deadline: Instant,
    receiver: broadcast::Receiver<NetworkResponse>,
}

impl PendingResponseMatch {
    /// Subscribes to responses now; matching starts with the next response.
    pub fn expect(
        browser: &dyn Browser,
        url_substring: impl Into<String>,
        expected_status: u16,
        wait: Duration,
    ) -> Self {
        Self {
            url_substring: url_substring.into(),
            expected_status,
            deadline: Instant::now() + wait,
            receiver: browser.subscribe_responses(),
        }
    }

    /// Waits for the first matching response or the deadline.
    pub async fn wait(mut self) -> ResponseOutcome {
        loop {
            match timeout_at(self.deadline, self.receiver.recv()).await {
                Err(_) => return ResponseOutcome::TimedOut,
                Ok(Ok(response)) => {
                    if response.matches(&self.url_substring, self.expected_status) {
                        debug!(url = %response.url, status = response.status, "Response matched");
                        return ResponseOutcome::Matched(response);
                    }
                    trace!(url = %response.url, "Response ignored");
                }
                Ok(Err(RecvError::Lagged(skipped))) => {
                    trace!(skipped, "Response listener lagged");
                }
                Ok(Err(RecvError::Closed)) => {
                    debug!("Response stream closed");
                    return ResponseOutcome::TimedOut;
                }
            }
        }
    }
}

// ============================================================================
// Race
// ============================================================================

/// Runs `trigger` while waiting for a matching response.
///
/// # Errors
///
/// - whatever `trigger` returns
/// - [`Error::ResponseTimeout`] in [`RaceMode::Hard`] when nothing matched
pub async fn race_response<F, Fut>(
    browser: &dyn Browser,
    url_substring: &str,
    expected_status: u16,
    wait: Duration,
    mode: RaceMode,
    trigger: F,
) -> Result<ResponseOutcome>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let pending = PendingResponseMatch::expect(browser, url_substring, expected_status, wait);

    let (outcome, ()) = tokio::try_join!(async { Ok::<_, Error>(pending.wait().await) }, trigger())?;

    match (&outcome, mode) {
        (ResponseOutcome::TimedOut, RaceMode::Hard) => Err(Error::response_timeout(
            url_substring,
            expected_status,
            wait.as_millis() as u64,
        )),
        (ResponseOutcome::TimedOut, RaceMode::Soft) => {
            warn!(
                url_pattern = url_substring,
                timeout_ms = wait.as_millis() as u64,
                "Response wait timed out, continuing"
            );
            Ok(outcome)
        }
        (ResponseOutcome::Matched(_), _) => Ok(outcome),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::browser::{Locator, MemoryStorefront};

    const CART: &str = "https://www.demoblaze.com/cart.html";

    fn page() -> MemoryStorefront {
        MemoryStorefront::builder().build().expect("storefront")
    }

    #[tokio::test(start_paused = true)]
    async fn test_matches_response_caused_by_trigger() {
        let page = page();

        let outcome = race_response(&page, "/viewcart", 200, Duration::from_secs(5), RaceMode::Hard, || {
            page.goto(CART)
        })
        .await
        .expect("race");

        match outcome {
            ResponseOutcome::Matched(response) => {
                assert_eq!(response.url, "https://api.demoblaze.com/viewcart");
            }
            ResponseOutcome::TimedOut => panic!("expected a match"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_soft_race_without_matching_call_succeeds() {
        let page = page();

        let outcome = race_response(&page, "/bycat", 200, Duration::from_secs(2), RaceMode::Soft, || {
            page.goto(CART)
        })
        .await
        .expect("soft race never fails on timeout");

        assert_eq!(outcome, ResponseOutcome::TimedOut);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hard_race_times_out() {
        let page = page();

        let err = race_response(&page, "/deleteitem", 200, Duration::from_secs(2), RaceMode::Hard, || async {
            Ok(())
        })
        .await
        .unwrap_err();

        assert!(matches!(err, Error::ResponseTimeout { status: 200, timeout_ms: 2000, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_must_match() {
        let page = page();

        let outcome = race_response(&page, "/viewcart", 500, Duration::from_secs(2), RaceMode::Soft, || {
            page.goto(CART)
        })
        .await
        .expect("race");

        assert!(!outcome.is_matched());
    }

    #[tokio::test(start_paused = true)]
    async fn test_trigger_error_wins_over_wait() {
        let page = page();
        let missing = Locator::id("missing");

        let err = race_response(&page, "/viewcart", 200, Duration::from_secs(30), RaceMode::Soft, || {
            page.click(&missing)
        })
        .await
        .unwrap_err();

        assert!(matches!(err, Error::ElementNotFound { .. }));
    }
}
