//! Usage counters for reporting.
//!
//! Two lock-free counters track how many pastes were created and how many
//! were read. They are informational only: the quota is enforced by the
//! storage backend against its own counter, never against these.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// A point-in-time copy of the usage counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    /// Pastes successfully created since the last reset
    pub created: u64,
    /// Pastes successfully read since the last reset
    pub consumed: u64,
}

/// Created / consumed counters backed by atomics.
///
/// Callers increment a counter only after the matching store operation has
/// returned, so a snapshot never counts a paste the store has not committed.
/// The two counters are not read atomically with each other.
///
/// # Example
///
/// ```rust
/// use burnbox::UsageCounters;
///
/// let counters = UsageCounters::new();
/// counters.record_created();
/// counters.record_consumed();
///
/// let snapshot = counters.snapshot();
/// assert_eq!((snapshot.created, snapshot.consumed), (1, 1));
///
/// counters.reset();
/// assert_eq!(counters.snapshot().created, 0);
/// ```
#[derive(Debug, Default)]
pub struct UsageCounters {
    created: AtomicU64,
    consumed: AtomicU64,
}

impl UsageCounters {
    /// Create a new set of zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one successful create.
    pub fn record_created(&self) {
        self.created.fetch_add(1, Ordering::Relaxed);
    }

    /// Count one successful read.
    pub fn record_consumed(&self) {
        self.consumed.fetch_add(1, Ordering::Relaxed);
    }

    /// Pastes created since the last reset.
    pub fn created(&self) -> u64 {
        self.created.load(Ordering::Relaxed)
    }

    /// Pastes read since the last reset.
    pub fn consumed(&self) -> u64 {
        self.consumed.load(Ordering::Relaxed)
    }

    /// Read both counters.
    pub fn snapshot(&self) -> UsageSnapshot {
        UsageSnapshot {
            created: self.created(),
            consumed: self.consumed(),
        }
    }

    /// Zero both counters. Only the admin reset path calls this.
    pub fn reset(&self) {
        self.created.store(0, Ordering::Relaxed);
        self.consumed.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_counters_start_at_zero() {
        let counters = UsageCounters::new();
        assert_eq!(counters.snapshot(), UsageSnapshot::default());
    }

    #[test]
    fn test_counters_are_independent() {
        let counters = UsageCounters::new();
        counters.record_created();
        counters.record_created();
        counters.record_consumed();

        assert_eq!(counters.created(), 2);
        assert_eq!(counters.consumed(), 1);
    }

    #[test]
    fn test_counters_reset() {
        let counters = UsageCounters::new();
        counters.record_created();
        counters.record_consumed();
        counters.reset();

        assert_eq!(counters.snapshot(), UsageSnapshot::default());
    }

    #[tokio::test]
    async fn test_counters_concurrent_increments() {
        let counters = Arc::new(UsageCounters::new());
        let mut handles = vec![];

        for _ in 0..8 {
            let counters = Arc::clone(&counters);
            handles.push(tokio::spawn(async move {
                for _ in 0..250 {
                    counters.record_created();
                }
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(counters.created(), 2000);
        assert_eq!(counters.consumed(), 0);
    }

    #[test]
    fn test_snapshot_serialization() {
        let snapshot = UsageSnapshot {
            created: 3,
            consumed: 2,
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        assert_eq!(json, r#"{"created":3,"consumed":2}"#);

        let deserialized: UsageSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, snapshot);
    }
}
