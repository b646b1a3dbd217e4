//! Configuration for the Extractor

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retry behaviour of the inference client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Retries after the first attempt for transient failures
    pub max_retries: u32,

    /// Delay before the first retry (milliseconds); doubles on each retry
    pub initial_backoff_ms: u64,

    /// Upper bound on a single retry delay (milliseconds)
    pub max_backoff_ms: u64,

    /// Maximum time for a single inference attempt (milliseconds)
    pub attempt_timeout_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 1_000,
            max_backoff_ms: 8_000,
            attempt_timeout_ms: 30_000,
        }
    }
}

impl RetryPolicy {
    /// Total number of attempts, including the first
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Get the per-attempt timeout as a Duration
    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.attempt_timeout_ms)
    }

    /// Delay after the given failed attempt (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(32);
        let delay = self
            .initial_backoff_ms
            .saturating_mul(1u64 << exponent)
            .min(self.max_backoff_ms);
        Duration::from_millis(delay)
    }
}

/// Response cache settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Serve repeated texts from the cache
    pub enabled: bool,

    /// Time to live of an entry (seconds)
    pub ttl_secs: u64,

    /// Maximum number of cached texts
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            ttl_secs: 300,
            max_entries: 1024,
        }
    }
}

impl CacheConfig {
    /// Get the entry time to live as a Duration
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Minimum input text length (characters, after trimming)
    pub min_text_length: usize,

    /// Maximum input text length (characters, after trimming)
    pub max_text_length: usize,

    /// Inference retry behaviour
    pub retry: RetryPolicy,

    /// Response cache settings
    pub cache: CacheConfig,
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_text_length == 0 {
            return Err(ConfigError::Invalid(
                "min_text_length must be greater than 0".to_string(),
            ));
        }
        if self.max_text_length < self.min_text_length {
            return Err(ConfigError::Invalid(
                "max_text_length cannot be less than min_text_length".to_string(),
            ));
        }
        if self.retry.attempt_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "attempt_timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.retry.initial_backoff_ms > self.retry.max_backoff_ms {
            return Err(ConfigError::Invalid(
                "initial_backoff_ms cannot exceed max_backoff_ms".to_string(),
            ));
        }
        if self.cache.enabled && (self.cache.ttl_secs == 0 || self.cache.max_entries == 0) {
            return Err(ConfigError::Invalid(
                "an enabled cache needs a positive ttl_secs and max_entries".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            min_text_length: 10,
            max_text_length: 50_000,
            retry: RetryPolicy::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl ExtractorConfig {
    /// Aggressive preset: fail fast and reuse earlier answers
    pub fn aggressive() -> Self {
        Self {
            min_text_length: 10,
            max_text_length: 20_000,
            retry: RetryPolicy {
                max_retries: 1,
                initial_backoff_ms: 500,
                max_backoff_ms: 2_000,
                attempt_timeout_ms: 10_000,
            },
            cache: CacheConfig {
                enabled: true,
                ..CacheConfig::default()
            },
        }
    }

    /// Lenient preset: longer timeouts and more retries
    pub fn lenient() -> Self {
        Self {
            min_text_length: 10,
            max_text_length: 100_000,
            retry: RetryPolicy {
                max_retries: 5,
                initial_backoff_ms: 1_000,
                max_backoff_ms: 30_000,
                attempt_timeout_ms: 120_000,
            },
            cache: CacheConfig::default(),
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_text_length, 10);
        assert_eq!(config.retry.max_attempts(), 4);
    }

    #[test]
    fn test_aggressive_config_is_valid() {
        let config = ExtractorConfig::aggressive();
        assert!(config.validate().is_ok());
        assert!(config.cache.enabled);
    }

    #[test]
    fn test_lenient_config_is_valid() {
        let config = ExtractorConfig::lenient();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_text_bounds() {
        let mut config = ExtractorConfig::default();
        config.min_text_length = 0;
        assert!(config.validate().is_err());

        let mut config = ExtractorConfig::default();
        config.max_text_length = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_cache() {
        let mut config = ExtractorConfig::default();
        config.cache.enabled = true;
        config.cache.max_entries = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(1), Duration::from_millis(1_000));
        assert_eq!(policy.backoff(2), Duration::from_millis(2_000));
        assert_eq!(policy.backoff(3), Duration::from_millis(4_000));
        assert_eq!(policy.backoff(4), Duration::from_millis(8_000));
        assert_eq!(policy.backoff(10), Duration::from_millis(8_000));
        assert_eq!(policy.backoff(200), Duration::from_millis(8_000));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig::aggressive();
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();

        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed = ExtractorConfig::from_toml(
            r#"
            min_text_length = 20

            [retry]
            max_retries = 0
            "#,
        )
        .unwrap();

        assert_eq!(parsed.min_text_length, 20);
        assert_eq!(parsed.max_text_length, 50_000);
        assert_eq!(parsed.retry.max_retries, 0);
        assert_eq!(parsed.retry.attempt_timeout_ms, 30_000);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            ExtractorConfig::from_toml("min_text_length = \"ten\""),
            Err(ConfigError::Parse(_))
        ));
    }
}
