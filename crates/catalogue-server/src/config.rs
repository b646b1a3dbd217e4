//! Configuration file parsing for the server.
//!
//! Loads settings from TOML files: bind address, database path, the
//! inference provider and the extractor and validation settings.

use catalogue_extractor::{ConfigError as ExtractorConfigError, ExtractorConfig};
use catalogue_gatekeeper::{GatekeeperError, ValidationConfig};
use catalogue_llm::{anthropic, AnthropicProvider, InferenceProvider, LlmError, OllamaProvider};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Environment variable consulted when no API key is configured
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// Extractor settings are inconsistent
    #[error(transparent)]
    Extractor(#[from] ExtractorConfigError),

    /// Validation settings are inconsistent
    #[error(transparent)]
    Validation(#[from] GatekeeperError),

    /// Inference provider could not be created
    #[error("Inference provider: {0}")]
    Provider(#[from] LlmError),
}

/// Supported inference providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Anthropic Messages API
    Anthropic,
    /// Local Ollama instance
    Ollama,
}

/// Inference provider settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Provider to call
    pub provider: ProviderKind,

    /// Model identifier
    pub model: String,

    /// API endpoint override
    pub endpoint: Option<String>,

    /// API key (falls back to `ANTHROPIC_API_KEY`)
    pub api_key: Option<String>,

    /// Completion token budget
    pub max_tokens: u32,

    /// Mark the system prompt for prompt caching
    pub prompt_cache: bool,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Anthropic,
            model: anthropic::DEFAULT_MODEL.to_string(),
            endpoint: None,
            api_key: None,
            max_tokens: anthropic::DEFAULT_MAX_TOKENS,
            prompt_cache: true,
        }
    }
}

impl InferenceConfig {
    /// API key from the file, or from the environment when absent
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok())
    }

    /// Create the configured provider
    pub fn build_provider(&self) -> Result<Arc<dyn InferenceProvider>, ConfigError> {
        match self.provider {
            ProviderKind::Anthropic => {
                let api_key = self
                    .resolve_api_key()
                    .ok_or_else(|| ConfigError::MissingField(format!("inference.api_key or {}", API_KEY_ENV)))?;
                let mut provider = AnthropicProvider::new(api_key, self.model.clone())?
                    .with_max_tokens(self.max_tokens)
                    .with_prompt_cache(self.prompt_cache);
                if let Some(endpoint) = &self.endpoint {
                    provider = provider.with_endpoint(endpoint.clone());
                }
                Ok(Arc::new(provider))
            }
            ProviderKind::Ollama => {
                let provider = match &self.endpoint {
                    Some(endpoint) => OllamaProvider::new(endpoint.clone(), self.model.clone())?,
                    None => OllamaProvider::default_endpoint(self.model.clone())?,
                };
                Ok(Arc::new(provider))
            }
        }
    }
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    pub bind_address: String,

    /// Bind port (e.g., 8080)
    pub bind_port: u16,

    /// SQLite database file (`:memory:` for a throwaway store)
    pub database_path: String,

    /// Inference provider settings
    pub inference: InferenceConfig,

    /// Pipeline settings
    pub extractor: ExtractorConfig,

    /// Validation gate settings
    pub validation: ValidationConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 8080,
            database_path: "catalogue.db".to_string(),
            inference: InferenceConfig::default(),
            extractor: ExtractorConfig::default(),
            validation: ValidationConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section for consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_path.is_empty() {
            return Err(ConfigError::MissingField("database_path".to_string()));
        }
        if self.inference.model.is_empty() {
            return Err(ConfigError::MissingField("inference.model".to_string()));
        }
        self.extractor.validate()?;
        self.validation.validate()?;
        Ok(())
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}
