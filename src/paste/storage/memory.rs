//! In-memory storage backend implementation.
//!
//! Pastes live in a `HashMap` behind a tokio `RwLock`. Nothing survives a
//! restart and there is no background sweeper: expiry is checked whenever an
//! entry is looked at.

use super::{PasteEntry, PasteStorage, StorageStats, StoreLimits};
use crate::PasteError;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Map and quota counter, guarded together.
#[derive(Debug, Default)]
struct StoreState {
    entries: HashMap<String, PasteEntry>,
    issued: u64,
}

/// In-memory paste storage.
///
/// The token map and the quota counter share one `RwLock`. Every mutating
/// operation is a single write-locked section with no I/O inside it, so a
/// consume can never be observed half done and concurrent creates cannot
/// overshoot the quota.
///
/// # Example
///
/// ```rust
/// use burnbox::storage::{MemoryStorage, PasteStorage, StoreLimits};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), burnbox::PasteError> {
/// let storage = MemoryStorage::new();
/// let limits = StoreLimits { max_entries: 10, lifetime: Duration::from_secs(60) };
///
/// let token = storage
///     .create("hi".to_string(), 0, limits, &|| "token-0001".to_string())
///     .await?;
/// assert!(storage.is_live(&token, 1_000, limits).await?);
/// assert_eq!(storage.consume(&token, 1_000, limits).await?, "hi");
/// assert!(!storage.is_live(&token, 1_000, limits).await?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MemoryStorage {
    state: RwLock<StoreState>,
}

impl MemoryStorage {
    /// Creates a new in-memory storage instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage with room for `capacity` entries pre-allocated.
    ///
    /// Handy when the quota is known up front, since the map can never hold
    /// more entries than the quota allows.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: RwLock::new(StoreState {
                entries: HashMap::with_capacity(capacity),
                issued: 0,
            }),
        }
    }
}

#[async_trait]
impl PasteStorage for MemoryStorage {
    async fn create(
        &self,
        content: String,
        now: i64,
        limits: StoreLimits,
        generate_token: &(dyn Fn() -> String + Send + Sync),
    ) -> Result<String, PasteError> {
        // Cheap rejection without contending for the write lock.
        if self.state.read().await.issued >= limits.max_entries {
            return Err(PasteError::CapacityExceeded {
                limit: limits.max_entries,
            });
        }

        let mut state = self.state.write().await;
        if state.issued >= limits.max_entries {
            return Err(PasteError::CapacityExceeded {
                limit: limits.max_entries,
            });
        }

        let token = generate_token();
        // A stale entry under the same token is overwritten, not a collision.
        if state
            .entries
            .get(&token)
            .is_some_and(|entry| entry.is_readable(now, limits.lifetime))
        {
            return Err(PasteError::TokenCollision);
        }

        state.entries.insert(token.clone(), PasteEntry::new(content, now));
        state.issued += 1;
        Ok(token)
    }

    async fn consume(
        &self,
        token: &str,
        now: i64,
        limits: StoreLimits,
    ) -> Result<String, PasteError> {
        let mut state = self.state.write().await;
        // Expired entries are dropped here as well; they were unreadable anyway.
        let mut entry = state.entries.remove(token).ok_or(PasteError::NotFound)?;
        if !entry.is_readable(now, limits.lifetime) {
            return Err(PasteError::NotFound);
        }
        Ok(entry.take_content())
    }

    async fn is_live(
        &self,
        token: &str,
        now: i64,
        limits: StoreLimits,
    ) -> Result<bool, PasteError> {
        let state = self.state.read().await;
        Ok(state
            .entries
            .get(token)
            .is_some_and(|entry| entry.is_readable(now, limits.lifetime)))
    }

    async fn reset(&self, now: i64) -> Result<usize, PasteError> {
        let mut state = self.state.write().await;
        let discarded = std::mem::take(&mut *state).entries.len();
        tracing::debug!(discarded, now, "memory storage reset");
        Ok(discarded)
    }

    async fn cleanup_expired(&self, now: i64, limits: StoreLimits) -> Result<usize, PasteError> {
        let mut state = self.state.write().await;
        let initial_count = state.entries.len();
        state
            .entries
            .retain(|_, entry| entry.is_readable(now, limits.lifetime));
        Ok(initial_count - state.entries.len())
    }

    async fn get_stats(&self, now: i64, limits: StoreLimits) -> Result<StorageStats, PasteError> {
        let state = self.state.read().await;
        let live_records = state
            .entries
            .values()
            .filter(|entry| entry.is_readable(now, limits.lifetime))
            .count();
        let memory_usage: usize = state
            .entries
            .iter()
            .map(|(token, entry)| token.len() + entry.content.len())
            .sum();
        Ok(StorageStats {
            total_records: state.entries.len(),
            live_records,
            issued: state.issued,
            max_entries: limits.max_entries,
            backend_info: format!("In-memory HashMap storage (~{memory_usage} bytes)"),
        })
    }
}
