//! Pluggable storage backends for pending pastes.
//!
//! This module provides a trait-based storage system so that the server can
//! be driven by different backends. Only an in-memory backend ships with the
//! crate; pastes are deliberately not persisted across restarts.

use crate::PasteError;
use crate::paste::config::PasteConfig;
use crate::paste::time_utils;
use async_trait::async_trait;
use std::time::Duration;

mod memory;
pub use memory::MemoryStorage;

/// A stored paste waiting to be read.
#[derive(Debug, Clone)]
pub struct PasteEntry {
    /// The submitted text
    pub content: String,
    /// Milliseconds since epoch when the paste was created
    pub created_at: i64,
    /// Whether the paste has been read
    pub consumed: bool,
}

impl PasteEntry {
    /// Creates a fresh, unread entry.
    pub fn new(content: String, created_at: i64) -> Self {
        Self {
            content,
            created_at,
            consumed: false,
        }
    }

    /// Returns true if the entry can still be read at `now`.
    pub fn is_readable(&self, now: i64, lifetime: Duration) -> bool {
        !self.consumed && !time_utils::is_expired(self.created_at, now, lifetime)
    }

    /// Marks the entry as read and hands out its content.
    pub(crate) fn take_content(&mut self) -> String {
        self.consumed = true;
        std::mem::take(&mut self.content)
    }
}

/// Limits a backend enforces on every call.
///
/// Passed in by the server rather than baked into the backend so that a
/// backend stays configuration-free.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreLimits {
    /// Maximum number of creates between resets
    pub max_entries: u64,
    /// How long an entry stays readable
    pub lifetime: Duration,
}

impl From<&PasteConfig> for StoreLimits {
    fn from(config: &PasteConfig) -> Self {
        Self {
            max_entries: config.max_entries,
            lifetime: config.lifetime,
        }
    }
}

/// Statistics about the storage backend.
#[derive(Debug, Clone)]
pub struct StorageStats {
    /// Entries physically held, including expired ones not yet swept
    pub total_records: usize,
    /// Entries that are still readable
    pub live_records: usize,
    /// Creates counted against the quota since the last reset
    pub issued: u64,
    /// The quota the stats were computed against
    pub max_entries: u64,
    /// Additional backend-specific information
    pub backend_info: String,
}

impl StorageStats {
    /// Creates still available before the quota is exhausted.
    pub fn remaining(&self) -> u64 {
        self.max_entries.saturating_sub(self.issued)
    }
}

/// Abstract storage backend for pending pastes.
///
/// Implementations hold the token-to-entry mapping together with a private
/// creation counter used for the quota. Both must sit behind a single
/// exclusion domain: `create`, `consume`, `reset` and `cleanup_expired` need
/// exclusive access, `is_live` and `get_stats` only shared access.
///
/// # Guarantees
///
/// - At most one `consume` ever returns the content of a given token, no
///   matter how many callers race on it.
/// - The quota is checked inside the exclusive section, so concurrent
///   creates can never overshoot it.
/// - Unknown, expired and consumed tokens are indistinguishable to callers.
/// - Expired entries may stay in memory; every read treats them as absent.
///
/// # Error Handling
///
/// All methods return `Result<T, PasteError>` and should map backend-specific
/// errors to `PasteError::StorageError`.
#[async_trait]
pub trait PasteStorage: Send + Sync {
    /// Optional method for storage backend initialization.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If initialization succeeded
    /// * `Err(PasteError)` - If initialization failed
    async fn init(&self) -> Result<(), PasteError> {
        // Default implementation does nothing
        Ok(())
    }

    /// Stores a new paste and returns its token.
    ///
    /// # Arguments
    ///
    /// * `content` - Already validated paste content
    /// * `now` - Creation timestamp in milliseconds
    /// * `limits` - Quota and lifetime to enforce
    /// * `generate_token` - Source of the token; called at most once, inside
    ///   the exclusive section
    ///
    /// # Returns
    ///
    /// * `Ok(token)` - If the paste was stored
    /// * `Err(PasteError::CapacityExceeded)` - If the quota is used up
    /// * `Err(PasteError::TokenCollision)` - If the generated token is taken
    async fn create(
        &self,
        content: String,
        now: i64,
        limits: StoreLimits,
        generate_token: &(dyn Fn() -> String + Send + Sync),
    ) -> Result<String, PasteError>;

    /// Reads a paste and removes it.
    ///
    /// # Returns
    ///
    /// * `Ok(content)` - On the first read within the lifetime
    /// * `Err(PasteError::NotFound)` - If the token is unknown, expired or read
    async fn consume(&self, token: &str, now: i64, limits: StoreLimits)
    -> Result<String, PasteError>;

    /// Checks whether a token would currently be readable, without reading it.
    async fn is_live(&self, token: &str, now: i64, limits: StoreLimits)
    -> Result<bool, PasteError>;

    /// Drops every entry and zeroes the quota counter.
    ///
    /// # Returns
    ///
    /// * `Ok(count)` - Number of entries discarded
    async fn reset(&self, now: i64) -> Result<usize, PasteError>;

    /// Removes entries that have outlived the lifetime.
    ///
    /// This only reclaims memory. It never changes what callers observe and
    /// never gives quota back.
    ///
    /// # Returns
    ///
    /// * `Ok(count)` - Number of entries removed
    async fn cleanup_expired(&self, now: i64, limits: StoreLimits) -> Result<usize, PasteError>;

    /// Returns statistics about the storage backend.
    async fn get_stats(&self, now: i64, limits: StoreLimits) -> Result<StorageStats, PasteError>;
}
