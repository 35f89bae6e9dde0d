use std::sync::Arc;
use std::time::Duration;

use crate::paste::cleanup::{BoxedCleanupStrategy, CustomCleanupStrategy, HybridCleanupStrategy};
use crate::paste::config::PasteConfig;
use crate::paste::time_utils::{self, TimeProviderFn};
use crate::paste::token::{self, TokenGeneratorFn};
use crate::paste::{PasteError, PasteServer};
use crate::storage::{MemoryStorage, PasteStorage};

/// A builder for creating a `PasteServer` instance.
///
/// This builder defaults to `MemoryStorage`, the production preset, UUID
/// based tokens and the system clock.
#[must_use = "The builder does nothing unless `.build_and_init()` is called."]
pub struct PasteServerBuilder<S: PasteStorage> {
    storage: Arc<S>,
    config: PasteConfig,
    cleanup_strategy: Option<BoxedCleanupStrategy>,
    token_generator: Option<TokenGeneratorFn>,
    time_provider: Option<TimeProviderFn>,
}

impl PasteServerBuilder<MemoryStorage> {
    /// Creates a new builder backed by `MemoryStorage`.
    pub(crate) fn new() -> Self {
        Self {
            storage: Arc::new(MemoryStorage::new()),
            config: PasteConfig::default(),
            cleanup_strategy: None,
            token_generator: None,
            time_provider: None,
        }
    }
}

impl<S: PasteStorage + 'static> PasteServerBuilder<S> {
    /// Specifies a custom storage backend to use instead of the default `MemoryStorage`.
    pub fn with_storage<T: PasteStorage + 'static>(self, storage: Arc<T>) -> PasteServerBuilder<T> {
        PasteServerBuilder {
            storage,
            config: self.config,
            cleanup_strategy: self.cleanup_strategy,
            token_generator: self.token_generator,
            time_provider: self.time_provider,
        }
    }

    /// Replaces the whole configuration.
    pub fn with_config(mut self, config: PasteConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets how many pastes may be created between resets.
    pub fn with_max_entries(mut self, max_entries: u64) -> Self {
        self.config.max_entries = max_entries;
        self
    }

    /// Sets the maximum content length, in characters.
    pub fn with_max_content_length(mut self, max_content_length: usize) -> Self {
        self.config.max_content_length = max_content_length;
        self
    }

    /// Sets how long an unread paste stays readable.
    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.config.lifetime = lifetime;
        self
    }

    /// Replaces the token generator.
    ///
    /// The generator must not repeat a token while an earlier paste with the
    /// same token may still be stored. A repeat is rejected with
    /// `PasteError::TokenCollision`.
    pub fn with_token_generator<F>(mut self, generator: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.token_generator = Some(Box::new(generator));
        self
    }

    /// Replaces the clock. The provider returns milliseconds since the epoch.
    pub fn with_time_provider<F>(mut self, provider: F) -> Self
    where
        F: Fn() -> Result<i64, PasteError> + Send + Sync + 'static,
    {
        self.time_provider = Some(Box::new(provider));
        self
    }

    /// Configures the inline sweep with custom hybrid thresholds.
    ///
    /// By default a sweep runs after 100 creates or 5 minutes, whichever
    /// comes first.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use std::time::Duration;
    /// # use burnbox::PasteServer;
    /// #
    /// # async fn example() -> Result<(), burnbox::PasteError> {
    /// let server = PasteServer::builder()
    ///     .with_hybrid_cleanup_thresholds(50, Duration::from_secs(120))
    ///     .build_and_init()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_hybrid_cleanup_thresholds(
        mut self,
        count_threshold: u32,
        time_threshold: Duration,
    ) -> Self {
        let strategy = HybridCleanupStrategy::new(count_threshold, time_threshold);
        self.cleanup_strategy = Some(Box::new(strategy));
        self
    }

    /// Configures a custom sweep strategy using a user-provided closure.
    ///
    /// The closure is called after each successful create with the
    /// timestamp that create was stamped with.
    pub fn with_custom_cleanup_strategy<F>(mut self, decide: F) -> Self
    where
        F: Fn(i64) -> bool + Send + Sync + 'static,
    {
        let strategy = CustomCleanupStrategy::new(decide);
        self.cleanup_strategy = Some(Box::new(strategy));
        self
    }

    /// Builds and initializes the `PasteServer`.
    ///
    /// Configuration warnings are logged, not treated as errors.
    pub async fn build_and_init(self) -> Result<PasteServer<S>, PasteError> {
        for warning in self.config.validate() {
            tracing::warn!("{}", warning);
        }

        let cleanup_strategy = self
            .cleanup_strategy
            .unwrap_or_else(|| Box::new(HybridCleanupStrategy::default()));
        let token_length = self.config.token_length;
        let token_generator = self
            .token_generator
            .unwrap_or_else(|| token::default_generator(token_length));
        let time_provider = self
            .time_provider
            .unwrap_or_else(|| Box::new(time_utils::current_timestamp));

        tracing::debug!("{}", self.config.summary());
        let server = PasteServer::new(
            self.storage,
            self.config,
            cleanup_strategy,
            token_generator,
            time_provider,
        );
        server.init().await?;
        Ok(server)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigPreset;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_builder_defaults() -> Result<(), PasteError> {
        let server = PasteServer::builder().build_and_init().await?;

        assert_eq!(server.config().max_entries, 1000);
        assert_eq!(server.config().lifetime, Duration::from_secs(60));

        let token = server.create("default").await?;
        assert_eq!(token.len(), 16);

        Ok(())
    }

    #[tokio::test]
    async fn test_builder_with_preset_and_overrides() -> Result<(), PasteError> {
        let server = PasteServer::builder()
            .with_config(PasteConfig::from(ConfigPreset::Strict))
            .with_max_entries(7)
            .build_and_init()
            .await?;

        assert_eq!(server.config().max_entries, 7);
        assert_eq!(server.config().max_content_length, 500);
        assert_eq!(server.create("x").await?.len(), 32);

        Ok(())
    }

    #[tokio::test]
    async fn test_builder_with_storage() -> Result<(), PasteError> {
        let storage = Arc::new(MemoryStorage::with_capacity(16));
        let server = PasteServer::builder()
            .with_storage(Arc::clone(&storage))
            .build_and_init()
            .await?;

        server.create("shared").await?;
        assert!(Arc::ptr_eq(server.storage(), &storage));

        Ok(())
    }

    #[tokio::test]
    async fn test_custom_cleanup_strategy_runs_after_create() -> Result<(), PasteError> {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = Arc::clone(&calls);

        let server = PasteServer::builder()
            .with_custom_cleanup_strategy(move |_now| {
                calls_clone.fetch_add(1, Ordering::SeqCst);
                true
            })
            .build_and_init()
            .await?;

        server.create("one").await?;
        server.create("two").await?;
        // Rejected creates never reach the strategy
        let _ = server.create("").await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_inline_sweep_drops_expired_entries() -> Result<(), PasteError> {
        let clock = Arc::new(std::sync::atomic::AtomicI64::new(0));
        let clock_clone = Arc::clone(&clock);

        let server = PasteServer::builder()
            .with_lifetime(Duration::from_secs(60))
            .with_hybrid_cleanup_thresholds(2, Duration::from_secs(3600))
            .with_time_provider(move || Ok(clock_clone.load(Ordering::SeqCst)))
            .build_and_init()
            .await?;

        server.create("abandoned").await?;
        clock.store(120_000, Ordering::SeqCst);
        server.create("fresh").await?;

        let stats = server.storage_stats().await?;
        assert_eq!(stats.total_records, 1);
        assert_eq!(stats.issued, 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_inline_sweep_follows_injected_clock() -> Result<(), PasteError> {
        let clock = Arc::new(std::sync::atomic::AtomicI64::new(1_700_000_000_000));
        let clock_clone = Arc::clone(&clock);

        let server = PasteServer::builder()
            .with_lifetime(Duration::from_secs(60))
            .with_hybrid_cleanup_thresholds(100, Duration::from_secs(300))
            .with_time_provider(move || Ok(clock_clone.load(Ordering::SeqCst)))
            .build_and_init()
            .await?;

        server.create("first").await?;
        clock.fetch_add(120_000, Ordering::SeqCst);
        server.create("second").await?;
        // Inside the time window: the expired paste lingers
        assert_eq!(server.storage_stats().await?.total_records, 2);

        clock.fetch_add(180_000, Ordering::SeqCst);
        server.create("third").await?;
        // Five minutes of server time since the window opened
        assert_eq!(server.storage_stats().await?.total_records, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_inline_sweep_with_explicit_timestamps() -> Result<(), PasteError> {
        let server = PasteServer::builder()
            .with_lifetime(Duration::from_secs(60))
            .with_hybrid_cleanup_thresholds(100, Duration::from_secs(300))
            .build_and_init()
            .await?;

        server.create_at("stale", 0).await?;
        server.create_at("fresh", 300_000).await?;

        let stats = server.storage.get_stats(300_000, server.limits).await?;
        assert_eq!(stats.total_records, 1);
        assert_eq!(stats.live_records, 1);

        Ok(())
    }
}
