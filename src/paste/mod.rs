// Core architecture components
mod admin;
mod config;
mod counters;
mod error;
mod server;
mod server_builder;
pub mod time_utils;
pub mod token;

// Storage and cleanup systems
pub mod cleanup;
pub mod storage;

// Core components exports
pub use admin::{ADMIN_PASSWORD_ENV, AdminControl};
pub use config::{ConfigPreset, PasteConfig};
pub use counters::{UsageCounters, UsageSnapshot};
pub use error::PasteError;
pub use server::PasteServer;
pub use server_builder::PasteServerBuilder;
pub use time_utils::TimeProviderFn;
pub use token::TokenGeneratorFn;

// Storage and cleanup exports
pub use cleanup::{
    BoxedCleanupStrategy, CleanupStrategy, CustomCleanupStrategy, HybridCleanupStrategy,
};
pub use storage::{MemoryStorage, PasteEntry, PasteStorage, StorageStats, StoreLimits};
