use std::sync::Arc;

use super::cleanup::BoxedCleanupStrategy;
use super::config::PasteConfig;
use super::counters::{UsageCounters, UsageSnapshot};
use super::storage::{MemoryStorage, PasteStorage, StorageStats, StoreLimits};
use super::time_utils::TimeProviderFn;
use super::token::{MIN_TOKEN_LENGTH, TokenGeneratorFn};
use super::{PasteError, PasteServerBuilder};

/// The entry point the HTTP layer talks to.
///
/// A `PasteServer` ties a storage backend to the usage counters, the clock,
/// the token generator and the configured limits. It validates content,
/// stamps operations with the current time, and updates the counters only
/// after the storage has committed.
///
/// Share it between request handlers with an `Arc`; every method takes
/// `&self`.
///
/// To create an instance, use the `PasteServer::builder()` method.
pub struct PasteServer<S: PasteStorage> {
    pub(crate) config: PasteConfig,
    pub(crate) limits: StoreLimits,
    pub(crate) storage: Arc<S>,
    pub(crate) counters: UsageCounters,
    pub(crate) cleanup_strategy: BoxedCleanupStrategy,
    pub(crate) token_generator: TokenGeneratorFn,
    pub(crate) time_provider: TimeProviderFn,
}

impl PasteServer<MemoryStorage> {
    /// Creates a new `PasteServerBuilder` to construct a `PasteServer`.
    ///
    /// The builder defaults to `MemoryStorage` and the production preset.
    pub fn builder() -> PasteServerBuilder<MemoryStorage> {
        PasteServerBuilder::new()
    }
}

impl<S: PasteStorage + 'static> PasteServer<S> {
    /// Internal constructor used by the builder.
    pub(crate) fn new(
        storage: Arc<S>,
        config: PasteConfig,
        cleanup_strategy: BoxedCleanupStrategy,
        token_generator: TokenGeneratorFn,
        time_provider: TimeProviderFn,
    ) -> Self {
        Self {
            limits: StoreLimits::from(&config),
            config,
            storage,
            counters: UsageCounters::new(),
            cleanup_strategy,
            token_generator,
            time_provider,
        }
    }

    /// Initializes the storage backend.
    pub(crate) async fn init(&self) -> Result<(), PasteError> {
        self.storage.init().await
    }

    /// Reads the configured clock.
    pub fn now(&self) -> Result<i64, PasteError> {
        (self.time_provider)()
    }

    /// Trims surrounding whitespace and checks the content against the limits.
    ///
    /// Length is measured in characters, not bytes.
    pub fn validate_content<'a>(&self, content: &'a str) -> Result<&'a str, PasteError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(PasteError::InvalidContent(
                "content can't be empty".to_string(),
            ));
        }
        if content.chars().count() > self.config.max_content_length {
            return Err(PasteError::ContentTooLong {
                max: self.config.max_content_length,
            });
        }
        Ok(content)
    }

    /// Stores `content` and returns the token that reads it back once.
    pub async fn create(&self, content: &str) -> Result<String, PasteError> {
        let now = self.now()?;
        self.create_at(content, now).await
    }

    /// Same as [`create`](Self::create) with an explicit timestamp.
    pub async fn create_at(&self, content: &str, now: i64) -> Result<String, PasteError> {
        let content = self.validate_content(content)?;
        let length = content.len();

        let token = self
            .storage
            .create(
                content.to_string(),
                now,
                self.limits,
                self.token_generator.as_ref(),
            )
            .await
            .inspect_err(|e| match e {
                PasteError::CapacityExceeded { limit } => {
                    tracing::warn!(limit, "paste quota exhausted");
                }
                PasteError::TokenCollision => {
                    tracing::warn!("token generator produced a live token");
                }
                _ => {}
            })?;

        self.counters.record_created();
        tracing::debug!(length, "paste created");

        self.maybe_cleanup(now).await;
        Ok(token)
    }

    /// Returns the content behind `token` and forgets it.
    ///
    /// Only the first call for a token within its lifetime succeeds. Every
    /// other outcome is `PasteError::NotFound`.
    pub async fn consume(&self, token: &str) -> Result<String, PasteError> {
        let now = self.now()?;
        self.consume_at(token, now).await
    }

    /// Same as [`consume`](Self::consume) with an explicit timestamp.
    pub async fn consume_at(&self, token: &str, now: i64) -> Result<String, PasteError> {
        if token.len() < MIN_TOKEN_LENGTH {
            return Err(PasteError::NotFound);
        }

        let content = self.storage.consume(token, now, self.limits).await?;
        self.counters.record_consumed();
        tracing::debug!("paste consumed");
        Ok(content)
    }

    /// Checks whether `token` could still be read, without reading it.
    pub async fn probe(&self, token: &str) -> Result<bool, PasteError> {
        let now = self.now()?;
        self.probe_at(token, now).await
    }

    /// Same as [`probe`](Self::probe) with an explicit timestamp.
    pub async fn probe_at(&self, token: &str, now: i64) -> Result<bool, PasteError> {
        if token.len() < MIN_TOKEN_LENGTH {
            return Ok(false);
        }
        self.storage.is_live(token, now, self.limits).await
    }

    /// Drops every paste and zeroes the quota and both usage counters.
    ///
    /// The configured limits are untouched. Callers should authenticate
    /// first; see [`AdminControl`](crate::AdminControl).
    pub async fn reset(&self) -> Result<usize, PasteError> {
        let now = self.now()?;
        self.reset_at(now).await
    }

    /// Same as [`reset`](Self::reset) with an explicit timestamp.
    pub async fn reset_at(&self, now: i64) -> Result<usize, PasteError> {
        let discarded = self.storage.reset(now).await?;
        self.counters.reset();
        self.cleanup_strategy.mark_as_cleaned(now);
        tracing::info!(discarded, "store reset");
        Ok(discarded)
    }

    /// Returns the created / consumed counters.
    pub fn stats(&self) -> UsageSnapshot {
        self.counters.snapshot()
    }

    /// Returns statistics from the storage backend.
    pub async fn storage_stats(&self) -> Result<StorageStats, PasteError> {
        let now = self.now()?;
        self.storage.get_stats(now, self.limits).await
    }

    /// Removes expired pastes right away.
    pub async fn cleanup_expired(&self) -> Result<usize, PasteError> {
        let now = self.now()?;
        self.storage.cleanup_expired(now, self.limits).await
    }

    /// Check the cleanup strategy and sweep inline if it says so.
    async fn maybe_cleanup(&self, now: i64) {
        if !self.cleanup_strategy.should_cleanup(now) {
            return;
        }
        match self.storage.cleanup_expired(now, self.limits).await {
            Ok(removed) => tracing::debug!(removed, "expired pastes swept"),
            Err(e) => tracing::warn!("Expired paste sweep failed: {}", e),
        }
        self.cleanup_strategy.mark_as_cleaned(now);
    }

    /// Returns the configuration the server was built with.
    pub fn config(&self) -> &PasteConfig {
        &self.config
    }

    /// Returns a reference to the storage backend.
    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    /// Returns the usage counters.
    pub fn counters(&self) -> &UsageCounters {
        &self.counters
    }
}
