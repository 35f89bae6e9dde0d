//! Time utilities for safe timestamp handling.
//!
//! All timestamps in this crate are milliseconds since the Unix epoch,
//! stored as `i64`.

use crate::paste::error::PasteError;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A function that provides the current timestamp in milliseconds.
pub type TimeProviderFn = Box<dyn Fn() -> Result<i64, PasteError> + Send + Sync>;

/// Get current timestamp in milliseconds since Unix epoch.
///
/// In the extremely rare case where system time is before Unix epoch,
/// it returns an error instead of panicking.
pub fn current_timestamp() -> Result<i64, PasteError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .map_err(|_| PasteError::ClockError("System time is before Unix epoch".to_string()))
}

/// Milliseconds elapsed between `created_at` and `now`.
///
/// A clock that stepped backwards yields zero rather than a negative value.
pub(crate) fn elapsed_millis(created_at: i64, now: i64) -> u128 {
    now.saturating_sub(created_at).max(0) as u128
}

/// Check if an entry created at `created_at` has outlived `lifetime` at `now`.
///
/// The boundary is inclusive: at exactly `created_at + lifetime` the entry
/// is already expired.
pub(crate) fn is_expired(created_at: i64, now: i64, lifetime: Duration) -> bool {
    elapsed_millis(created_at, now) >= lifetime.as_millis()
}
