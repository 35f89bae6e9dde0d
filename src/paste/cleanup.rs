//! Policies deciding when a create should also sweep expired pastes.
//!
//! Expired pastes are already invisible to readers, so a sweep only returns
//! memory. The server consults its policy after every successful create,
//! passing the same timestamp the create was stamped with, and sweeps inline
//! when the policy says so. Nothing runs in the background.

use std::sync::atomic::{AtomicI64, AtomicU32, Ordering};
use std::time::Duration;

use crate::paste::time_utils;

/// No sweep has happened yet.
const NEVER: i64 = i64::MIN;

/// Decides when a create should be followed by a sweep.
///
/// Both methods receive the server's notion of "now" in milliseconds, so a
/// policy follows an injected clock exactly like expiry does.
pub trait CleanupStrategy: Send + Sync {
    /// Called after a successful create at `now`.
    fn should_cleanup(&self, now: i64) -> bool;

    /// Called once a sweep (or a full reset) has finished at `now`.
    fn mark_as_cleaned(&self, now: i64);
}

/// Sweeps after `count_threshold` creates or once `time_threshold` has
/// passed since the last sweep, whichever comes first.
///
/// The time window starts at the first create the policy sees, not at
/// construction, so building a server ahead of time does not trigger an
/// early sweep.
#[derive(Debug)]
pub struct HybridCleanupStrategy {
    count_threshold: u32,
    time_threshold: Duration,
    creates_since_sweep: AtomicU32,
    last_sweep_at: AtomicI64,
}

impl HybridCleanupStrategy {
    /// Creates a policy with the given thresholds.
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use burnbox::{CleanupStrategy, HybridCleanupStrategy};
    ///
    /// let strategy = HybridCleanupStrategy::new(100, Duration::from_secs(300));
    /// assert!(!strategy.should_cleanup(0));
    /// assert!(strategy.should_cleanup(300_000));
    /// ```
    pub fn new(count_threshold: u32, time_threshold: Duration) -> Self {
        Self {
            count_threshold,
            time_threshold,
            creates_since_sweep: AtomicU32::new(0),
            last_sweep_at: AtomicI64::new(NEVER),
        }
    }

    /// Start of the current window, opening it at `now` if none is open.
    fn window_start(&self, now: i64) -> i64 {
        match self
            .last_sweep_at
            .compare_exchange(NEVER, now, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => now,
            Err(started) => started,
        }
    }
}

impl Default for HybridCleanupStrategy {
    /// 100 creates or 5 minutes.
    fn default() -> Self {
        Self::new(100, Duration::from_secs(300))
    }
}

impl CleanupStrategy for HybridCleanupStrategy {
    fn should_cleanup(&self, now: i64) -> bool {
        let creates = self.creates_since_sweep.fetch_add(1, Ordering::AcqRel) + 1;
        let started = self.window_start(now);
        creates >= self.count_threshold
            || time_utils::is_expired(started, now, self.time_threshold)
    }

    fn mark_as_cleaned(&self, now: i64) {
        self.creates_since_sweep.store(0, Ordering::Release);
        self.last_sweep_at.store(now, Ordering::Release);
    }
}

/// A policy backed by a closure over the create timestamp.
///
/// The closure keeps whatever state it needs; `mark_as_cleaned` is a no-op.
pub struct CustomCleanupStrategy<F>
where
    F: Fn(i64) -> bool + Send + Sync,
{
    decide: F,
}

impl<F> CustomCleanupStrategy<F>
where
    F: Fn(i64) -> bool + Send + Sync,
{
    /// Wraps `decide`, which gets the create timestamp in milliseconds.
    pub fn new(decide: F) -> Self {
        Self { decide }
    }
}

impl<F> CleanupStrategy for CustomCleanupStrategy<F>
where
    F: Fn(i64) -> bool + Send + Sync,
{
    fn should_cleanup(&self, now: i64) -> bool {
        (self.decide)(now)
    }

    fn mark_as_cleaned(&self, _now: i64) {}
}

/// Type alias for boxed cleanup strategies.
pub type BoxedCleanupStrategy = Box<dyn CleanupStrategy>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_hybrid_fires_on_create_count() {
        let strategy = HybridCleanupStrategy::new(3, Duration::from_secs(3600));

        assert!(!strategy.should_cleanup(0));
        assert!(!strategy.should_cleanup(1));
        assert!(strategy.should_cleanup(2));
    }

    #[test]
    fn test_hybrid_fires_on_elapsed_time() {
        let strategy = HybridCleanupStrategy::new(100, Duration::from_secs(60));
        let t0 = 1_700_000_000_000;

        assert!(!strategy.should_cleanup(t0));
        assert!(!strategy.should_cleanup(t0 + 59_999));
        assert!(strategy.should_cleanup(t0 + 60_000));
    }

    #[test]
    fn test_hybrid_window_restarts_after_sweep() {
        let strategy = HybridCleanupStrategy::new(100, Duration::from_secs(60));

        assert!(!strategy.should_cleanup(0));
        assert!(strategy.should_cleanup(60_000));
        strategy.mark_as_cleaned(60_000);

        assert!(!strategy.should_cleanup(100_000));
        assert!(strategy.should_cleanup(120_000));
    }

    #[test]
    fn test_hybrid_ignores_backwards_clock() {
        let strategy = HybridCleanupStrategy::new(100, Duration::from_secs(60));

        assert!(!strategy.should_cleanup(500_000));
        assert!(!strategy.should_cleanup(0));
    }

    #[test]
    fn test_custom_strategy_sees_timestamp() {
        let seen = Arc::new(AtomicI64::new(0));
        let seen_clone = Arc::clone(&seen);
        let strategy = CustomCleanupStrategy::new(move |now| {
            seen_clone.store(now, Ordering::SeqCst);
            now % 2 == 0
        });

        assert!(!strategy.should_cleanup(41));
        assert!(strategy.should_cleanup(42));
        assert_eq!(seen.load(Ordering::SeqCst), 42);

        strategy.mark_as_cleaned(42);
        assert!(strategy.should_cleanup(44));
    }
}
