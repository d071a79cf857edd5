//! Count stabilization.
//!
//! Lists on the storefront fill in asynchronously with no "done" signal, so
//! completion is inferred from the count holding steady. The poller samples
//! a count at a fixed interval and stops once the same non-zero value has
//! repeated `required_streak` times in a row.
//!
//! Zero never counts toward the streak: it is ambiguous between "still
//! loading" and "really empty". Callers that must tell those apart check an
//! authoritative signal instead (see [`super::total`]).

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::error::Result;

// ============================================================================
// Policy
// ============================================================================

/// Sampling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StabilizationPolicy {
    /// Wait before each sample.
    pub interval: Duration,
    /// Sample budget.
    pub max_samples: usize,
    /// Consecutive repeats needed; values below 1 act as 1.
    pub required_streak: usize,
}

impl Default for StabilizationPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(500),
            max_samples: 10,
            required_streak: 2,
        }
    }
}

// ============================================================================
// Outcome
// ============================================================================

/// How polling ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stabilization {
    /// The count held steady.
    Converged(usize),
    /// The budget ran out; carries the last sample.
    Exhausted(usize),
}

impl Stabilization {
    /// The count, converged or best effort.
    #[inline]
    #[must_use]
    pub fn value(self) -> usize {
        match self {
            Self::Converged(n) | Self::Exhausted(n) => n,
        }
    }

    /// Returns `true` for [`Stabilization::Converged`].
    #[inline]
    #[must_use]
    pub fn is_converged(self) -> bool {
        matches!(self, Self::Converged(_))
    }
}

// ============================================================================
// Poller
// ============================================================================

/// Samples until the count is stable or the budget is spent.
///
/// Running out of samples is not an error; it returns
/// [`Stabilization::Exhausted`] and logs a warning.
///
/// # Errors
///
/// Only errors returned by `sample` itself.
pub async fn poll_until_stable<F, Fut>(policy: StabilizationPolicy, mut sample: F) -> Result<Stabilization>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<usize>>,
{
    let required = policy.required_streak.max(1);
    let mut previous: Option<usize> = None;
    let mut streak = 0;
    let mut last = 0;

    for taken in 1..=policy.max_samples {
        sleep(policy.interval).await;
        let value = sample().await?;

        if previous == Some(value) && value > 0 {
            streak += 1;
        } else {
            streak = 0;
        }
        previous = Some(value);
        last = value;

        if streak >= required {
            debug!(value, samples = taken, "Count stabilized");
            return Ok(Stabilization::Converged(value));
        }
    }

    warn!(
        value = last,
        samples = policy.max_samples,
        "StabilizationExhausted: returning last observed count"
    );
    Ok(Stabilization::Exhausted(last))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use proptest::prelude::*;
    use tokio::time::Instant;

    use crate::error::Error;

    /// Sampler replaying `values`, repeating the last one.
    fn replay(values: Vec<usize>, taken: Arc<AtomicUsize>) -> impl FnMut() -> std::future::Ready<Result<usize>> {
        move || {
            let i = taken.fetch_add(1, Ordering::SeqCst);
            let value = values.get(i).or(values.last()).copied().unwrap_or_default();
            std::future::ready(Ok(value))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_converges_after_streak() {
        let taken = Arc::new(AtomicUsize::new(0));
        let start = Instant::now();

        let result = poll_until_stable(
            StabilizationPolicy::default(),
            replay(vec![0, 1, 3, 3, 3, 3], Arc::clone(&taken)),
        )
        .await
        .expect("poll");

        assert_eq!(result, Stabilization::Converged(3));
        assert_eq!(taken.load(Ordering::SeqCst), 5);
        assert_eq!(start.elapsed(), Duration::from_millis(2500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_never_converges() {
        let taken = Arc::new(AtomicUsize::new(0));

        let result = poll_until_stable(StabilizationPolicy::default(), replay(vec![0], Arc::clone(&taken)))
            .await
            .expect("poll");

        assert_eq!(result, Stabilization::Exhausted(0));
        assert_eq!(taken.load(Ordering::SeqCst), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_change_resets_streak() {
        let taken = Arc::new(AtomicUsize::new(0));
        let policy = StabilizationPolicy {
            max_samples: 5,
            ..StabilizationPolicy::default()
        };

        let result = poll_until_stable(policy, replay(vec![2, 2, 3, 3, 4], Arc::clone(&taken)))
            .await
            .expect("poll");

        assert_eq!(result, Stabilization::Exhausted(4));
        assert_eq!(result.value(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sampler_error_propagates() {
        let result = poll_until_stable(StabilizationPolicy::default(), || async {
            Err(Error::script("page crashed"))
        })
        .await;

        assert!(matches!(result, Err(Error::Script { .. })));
    }

    proptest! {
        #[test]
        fn prop_converged_value_was_seen_repeatedly(
            values in proptest::collection::vec(0usize..4, 1..16),
            required in 1usize..4,
        ) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .start_paused(true)
                .build()
                .expect("runtime");

            let taken = Arc::new(AtomicUsize::new(0));
            let policy = StabilizationPolicy {
                interval: Duration::from_millis(500),
                max_samples: 10,
                required_streak: required,
            };
            let result = runtime
                .block_on(poll_until_stable(policy, replay(values.clone(), Arc::clone(&taken))))
                .expect("poll");

            let count = taken.load(Ordering::SeqCst);
            let seen: Vec<usize> = (0..count)
                .map(|i| values.get(i).or(values.last()).copied().unwrap_or_default())
                .collect();

            match result {
                Stabilization::Converged(value) => {
                    prop_assert!(value > 0);
                    prop_assert!(count > required);
                    prop_assert!(seen[count - required - 1..].iter().all(|&v| v == value));
                }
                Stabilization::Exhausted(value) => {
                    prop_assert_eq!(count, policy.max_samples);
                    prop_assert_eq!(Some(&value), seen.last());
                }
            }
        }
    }
}
