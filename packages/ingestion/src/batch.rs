//! Group-barrier batch executor.
//!
//! Runs a list of independent async units with bounded fan-out: units
//! are partitioned into consecutive groups of `concurrency`, each group
//! runs to completion before the delay and the next group start. The
//! barrier between groups is a correctness requirement for callers that
//! rely on it to throttle a remote site, not a scheduling accident.

use std::future::Future;
use std::time::Duration;

use futures::future::join_all;

/// Execute `units` in groups of `concurrency`, sleeping `delay` between
/// groups, and return results in input order.
///
/// The executor does not interpret results: failable work should catch
/// its own errors and resolve to a result value. A unit that panics
/// propagates the panic and aborts the remaining groups.
///
/// An empty input resolves immediately to an empty vector.
pub async fn parallelize_batch<F, T>(units: Vec<F>, concurrency: usize, delay: Duration) -> Vec<T>
where
    F: Future<Output = T>,
{
    if units.is_empty() {
        return Vec::new();
    }

    let concurrency = concurrency.max(1);
    let mut results = Vec::with_capacity(units.len());
    let mut remaining = units.into_iter().peekable();

    loop {
        let group: Vec<F> = remaining.by_ref().take(concurrency).collect();
        if group.is_empty() {
            break;
        }

        // join_all preserves submission order regardless of completion
        // order within the group.
        results.extend(join_all(group).await);

        if remaining.peek().is_some() && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::time::Instant;

    #[tokio::test]
    async fn test_empty_input_resolves_immediately() {
        let units: Vec<std::future::Ready<u8>> = Vec::new();
        let results = parallelize_batch(units, 2, Duration::from_secs(60)).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_results_preserve_input_order() {
        // Later units finish first; output order must still match input.
        let units = (0..6u64)
            .map(|i| async move {
                tokio::time::sleep(Duration::from_millis(50 - i * 5)).await;
                i
            })
            .collect::<Vec<_>>();

        let results = parallelize_batch(units, 3, Duration::ZERO).await;
        assert_eq!(results, vec![0, 1, 2, 3, 4, 5]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_group_settles_and_delay_elapses_before_next_group() {
        let started = Arc::new(AtomicUsize::new(0));
        let origin = Instant::now();

        let mut units = Vec::new();
        for i in 0..3 {
            let started = started.clone();
            units.push(async move {
                started.fetch_add(1, Ordering::SeqCst);
                if i < 2 {
                    // First group holds the barrier for 50ms.
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    origin.elapsed()
                } else {
                    origin.elapsed()
                }
            });
        }

        let results = parallelize_batch(units, 2, Duration::from_millis(100)).await;

        // The third unit must not have started before the first group
        // settled (50ms) plus the configured delay (100ms).
        assert!(results[2] >= Duration::from_millis(150), "{:?}", results[2]);
        assert_eq!(started.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_trailing_delay_after_last_group() {
        let origin = Instant::now();
        let units = (1u8..=2).map(|i| async move { i }).collect::<Vec<_>>();

        let results = parallelize_batch(units, 2, Duration::from_secs(30)).await;

        assert_eq!(results, vec![1, 2]);
        // A single group never waits out the inter-group delay.
        assert!(origin.elapsed() < Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_units_reporting_failure_do_not_abort_siblings() {
        let units = (0..4).map(|i| async move { i % 2 == 0 }).collect::<Vec<_>>();
        let results = parallelize_batch(units, 2, Duration::ZERO).await;
        assert_eq!(results, vec![true, false, true, false]);
    }
}
