use std::time::Duration;

/// Predefined configuration presets for common use cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPreset {
    /// Production-ready configuration.
    ///
    /// - Quota: 1000 pastes between resets
    /// - Max content length: 1000 characters
    /// - Lifetime: 1 minute
    /// - Token length: 16 characters
    Production,

    /// Development-friendly configuration.
    ///
    /// Relaxed settings for easier manual testing:
    /// - Quota: 10000 pastes
    /// - Max content length: 10000 characters
    /// - Lifetime: 10 minutes
    /// - Token length: 16 characters
    Development,

    /// Tight configuration for exposed deployments.
    ///
    /// - Quota: 100 pastes
    /// - Max content length: 500 characters
    /// - Lifetime: 30 seconds
    /// - Token length: 32 characters
    Strict,

    /// Load configuration from environment variables.
    ///
    /// Reads configuration from:
    /// - `BURNBOX_MAX_ENTRIES`: Creation quota (default: 1000)
    /// - `BURNBOX_MAX_CONTENT_LENGTH`: Max content length in characters (default: 1000)
    /// - `BURNBOX_LIFETIME`: Paste lifetime in seconds (default: 60)
    /// - `BURNBOX_TOKEN_LENGTH`: Generated token length (default: 16)
    FromEnv,
}

/// Configuration for the paste store.
///
/// The limits are fixed for the lifetime of a server. An admin reset clears
/// accumulated usage but never the configured limits.
///
/// # Example
///
/// ```rust
/// use burnbox::PasteConfig;
/// use std::time::Duration;
///
/// let config = PasteConfig {
///     max_entries: 50,
///     max_content_length: 280,
///     lifetime: Duration::from_secs(120),
///     token_length: 24,
/// };
/// assert!(config.validate().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct PasteConfig {
    /// Maximum number of pastes that can be created between resets
    pub max_entries: u64,
    /// Maximum content length, in characters
    pub max_content_length: usize,
    /// How long an unread paste stays readable
    pub lifetime: Duration,
    /// Length of generated tokens
    pub token_length: usize,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

impl Default for PasteConfig {
    fn default() -> Self {
        Self::from(ConfigPreset::Production)
    }
}

impl PasteConfig {
    /// Builds a configuration from `BURNBOX_*` environment variables,
    /// falling back to the production preset for anything unset or invalid.
    pub fn from_env() -> Self {
        let base = Self::from(ConfigPreset::Production);
        Self {
            max_entries: env_or("BURNBOX_MAX_ENTRIES", base.max_entries),
            max_content_length: env_or("BURNBOX_MAX_CONTENT_LENGTH", base.max_content_length),
            lifetime: Duration::from_secs(env_or("BURNBOX_LIFETIME", base.lifetime.as_secs())),
            token_length: env_or("BURNBOX_TOKEN_LENGTH", base.token_length),
        }
    }

    /// Validates the configuration and returns any warnings.
    ///
    /// # Returns
    ///
    /// A vector of warning messages for potentially problematic settings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.max_entries == 0 {
            warnings.push("Quota of 0 rejects every paste".to_string());
        }

        if self.max_content_length == 0 {
            warnings.push("Max content length of 0 rejects every paste".to_string());
        }

        if self.lifetime.as_secs() < 10 {
            warnings.push("Very short lifetime (< 10 seconds) may expire pastes before they are shared".to_string());
        }
        if self.lifetime.as_secs() > 86_400 {
            warnings.push("Long lifetime (> 1 day) keeps unread content around".to_string());
        }

        if self.token_length < crate::paste::token::MIN_TOKEN_LENGTH {
            warnings.push(format!(
                "Token length below {} is raised to {}",
                crate::paste::token::MIN_TOKEN_LENGTH,
                crate::paste::token::MIN_TOKEN_LENGTH
            ));
        }
        if self.token_length > crate::paste::token::MAX_TOKEN_LENGTH {
            warnings.push(format!(
                "Token length above {} is capped at {}",
                crate::paste::token::MAX_TOKEN_LENGTH,
                crate::paste::token::MAX_TOKEN_LENGTH
            ));
        }

        warnings
    }

    /// Returns a summary of the current configuration.
    pub fn summary(&self) -> String {
        format!(
            "PasteConfig {{ Quota: {}, Max Length: {}, Lifetime: {}s, Token Length: {} }}",
            self.max_entries,
            self.max_content_length,
            self.lifetime.as_secs(),
            self.token_length,
        )
    }
}

impl From<ConfigPreset> for PasteConfig {
    fn from(preset: ConfigPreset) -> Self {
        match preset {
            ConfigPreset::Production => Self {
                max_entries: 1000,
                max_content_length: 1000,
                lifetime: Duration::from_secs(60),
                token_length: 16,
            },
            ConfigPreset::Development => Self {
                max_entries: 10_000,
                max_content_length: 10_000,
                lifetime: Duration::from_secs(600),
                token_length: 16,
            },
            ConfigPreset::Strict => Self {
                max_entries: 100,
                max_content_length: 500,
                lifetime: Duration::from_secs(30),
                token_length: 32,
            },
            ConfigPreset::FromEnv => Self::from_env(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env_vars() {
        unsafe {
            std::env::remove_var("BURNBOX_MAX_ENTRIES");
            std::env::remove_var("BURNBOX_MAX_CONTENT_LENGTH");
            std::env::remove_var("BURNBOX_LIFETIME");
            std::env::remove_var("BURNBOX_TOKEN_LENGTH");
        }
    }

    #[test]
    fn test_production_preset() {
        let config = PasteConfig::from(ConfigPreset::Production);
        assert_eq!(config.max_entries, 1000);
        assert_eq!(config.max_content_length, 1000);
        assert_eq!(config.lifetime.as_secs(), 60);
        assert_eq!(config.token_length, 16);
    }

    #[test]
    fn test_development_preset() {
        let config = PasteConfig::from(ConfigPreset::Development);
        assert_eq!(config.max_entries, 10_000);
        assert_eq!(config.lifetime.as_secs(), 600);
    }

    #[test]
    fn test_strict_preset() {
        let config = PasteConfig::from(ConfigPreset::Strict);
        assert_eq!(config.max_entries, 100);
        assert_eq!(config.max_content_length, 500);
        assert_eq!(config.lifetime.as_secs(), 30);
        assert_eq!(config.token_length, 32);
    }

    #[test]
    #[serial]
    fn test_from_env() {
        clear_env_vars();

        unsafe {
            std::env::set_var("BURNBOX_MAX_ENTRIES", "42");
            std::env::set_var("BURNBOX_MAX_CONTENT_LENGTH", "300");
            std::env::set_var("BURNBOX_LIFETIME", "90");
            std::env::set_var("BURNBOX_TOKEN_LENGTH", "20");
        }

        let config = PasteConfig::from(ConfigPreset::FromEnv);
        assert_eq!(config.max_entries, 42);
        assert_eq!(config.max_content_length, 300);
        assert_eq!(config.lifetime.as_secs(), 90);
        assert_eq!(config.token_length, 20);

        clear_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_ignores_garbage() {
        clear_env_vars();

        unsafe {
            std::env::set_var("BURNBOX_MAX_ENTRIES", "lots");
            std::env::set_var("BURNBOX_LIFETIME", "-5");
        }

        let config = PasteConfig::from_env();
        assert_eq!(config.max_entries, 1000);
        assert_eq!(config.lifetime.as_secs(), 60);

        clear_env_vars();
    }

    #[test]
    fn test_validation_valid_config() {
        let config = PasteConfig::from(ConfigPreset::Production);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validation_warnings() {
        let config = PasteConfig {
            max_entries: 0,
            max_content_length: 0,
            lifetime: Duration::from_secs(1),
            token_length: 4,
        };
        let warnings = config.validate();
        assert_eq!(warnings.len(), 4);
        assert!(warnings.iter().any(|w| w.contains("Quota of 0")));
        assert!(warnings.iter().any(|w| w.contains("Very short lifetime")));
        assert!(warnings.iter().any(|w| w.contains("raised to")));

        let config = PasteConfig {
            lifetime: Duration::from_secs(7 * 86_400),
            token_length: 64,
            ..PasteConfig::default()
        };
        let warnings = config.validate();
        assert!(warnings.iter().any(|w| w.contains("Long lifetime")));
        assert!(warnings.iter().any(|w| w.contains("capped at")));
    }

    #[test]
    fn test_summary() {
        let summary = PasteConfig::default().summary();
        assert!(summary.contains("Quota: 1000"));
        assert!(summary.contains("Lifetime: 60s"));
    }
}
