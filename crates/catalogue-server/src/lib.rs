//! Catalogue Server
//!
//! HTTP front end for the extraction pipeline. Accepts text, runs it through
//! the pipeline and reports the created record or the typed rejection, with
//! status codes derived from the rejection's error kind.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use catalogue_extractor::{shared, Extractor};
use catalogue_gatekeeper::Gatekeeper;
use catalogue_store::{SqliteStore, StoreError};
use config::ServerConfig;
use handlers::{create_router, AppState};
use tokio::net::TcpListener;
use tracing::info;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Record store could not be opened
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Build the application state described by the configuration
///
/// Opens the record store and creates the inference provider, gatekeeper
/// and pipeline.
pub fn build_state(config: &ServerConfig) -> Result<AppState, ServerError> {
    config.validate()?;

    let provider = config.inference.build_provider()?;
    let store = shared(SqliteStore::new(&config.database_path)?);
    let gatekeeper = Gatekeeper::new(config.validation.clone());
    let extractor = Extractor::new(provider, store.clone(), gatekeeper, config.extractor.clone());

    Ok(AppState::new(extractor, store))
}

/// Start the HTTP server
///
/// Builds the application state and serves until the process is stopped.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    info!("Starting catalogue server");
    info!("Bind address: {}", config.bind_addr());
    info!("Database: {}", config.database_path);
    info!(
        "Inference: {:?} / {}",
        config.inference.provider, config.inference.model
    );

    let state = build_state(&config)?;
    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}

/// Install the tracing subscriber used by the binaries
///
/// Honours `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    // A subscriber may already be installed (e.g. by an embedding binary)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{InferenceConfig, ProviderKind};

    #[test]
    fn test_build_state_with_ollama() {
        let config = ServerConfig {
            database_path: ":memory:".to_string(),
            inference: InferenceConfig {
                provider: ProviderKind::Ollama,
                model: "llama3.1".to_string(),
                ..InferenceConfig::default()
            },
            ..ServerConfig::default()
        };

        let state = build_state(&config).unwrap();
        assert_eq!(state.extractor.model(), "llama3.1");
    }

    #[test]
    fn test_build_state_rejects_invalid_config() {
        let mut config = ServerConfig::default();
        config.database_path = String::new();

        assert!(matches!(build_state(&config), Err(ServerError::Config(_))));
    }
}
