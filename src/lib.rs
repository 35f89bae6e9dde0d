//! # Burnbox
//!
//! An ephemeral, read-once text store.
//!
//! A producer submits a short piece of text and gets back an opaque token.
//! The first consumer to present the token gets the text; after that it is
//! gone for good. Unread text also disappears once its lifetime runs out.
//!
//! ## Features
//!
//! - **Exactly-once reads**: the lookup, check and removal of a paste happen
//!   in one write-locked section, so racing readers cannot both win
//! - **Lazy expiry**: no background sweeper, lifetime is checked on access
//! - **Creation quota**: a fixed number of pastes between admin resets,
//!   enforced inside the lock so concurrent creates never overshoot it
//! - **Indistinguishable misses**: unknown, expired and already-read tokens
//!   all produce the same `NotFound`
//! - **Usage counters**: lock-free created / consumed counters for display
//! - **Pluggable storage**: the [`PasteStorage`] trait with an in-memory backend
//!
//! ## Quick Start
//!
//! ```rust
//! use burnbox::{PasteError, PasteServer};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), PasteError> {
//! let server = PasteServer::builder()
//!     .with_max_entries(100)
//!     .with_lifetime(Duration::from_secs(60))
//!     .build_and_init()
//!     .await?;
//!
//! let token = server.create("meet at noon").await?;
//! assert!(server.probe(&token).await?);
//!
//! assert_eq!(server.consume(&token).await?, "meet at noon");
//! assert!(matches!(server.consume(&token).await, Err(PasteError::NotFound)));
//!
//! let stats = server.stats();
//! assert_eq!((stats.created, stats.consumed), (1, 1));
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! [`PasteConfig::from_env`] reads:
//!
//! ```bash
//! export BURNBOX_MAX_ENTRIES=1000        # creates allowed between resets
//! export BURNBOX_MAX_CONTENT_LENGTH=1000 # characters
//! export BURNBOX_LIFETIME=60             # seconds
//! export BURNBOX_TOKEN_LENGTH=16         # 8..=32
//! export BURNBOX_ADMIN_PASSWORD=...      # read by AdminControl::from_env
//! ```
//!
//! ## Architecture
//!
//! - **[`PasteServer`]**: the façade request handlers call
//! - **[`PasteStorage`]** / **[`MemoryStorage`]**: the token map and quota
//! - **[`UsageCounters`]**: reporting counters, outside the storage lock
//! - **[`AdminControl`]**: password check in front of the bulk reset
//! - **[`PasteError`]**: every failure mode

pub mod paste;

// Re-export commonly used types
pub use paste::storage;
pub use paste::{
    AdminControl, CleanupStrategy, ConfigPreset, CustomCleanupStrategy, HybridCleanupStrategy,
    MemoryStorage, PasteConfig, PasteError, PasteServer, PasteServerBuilder, PasteStorage,
    UsageCounters, UsageSnapshot,
};
