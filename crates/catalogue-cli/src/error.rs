//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
///
/// These are failures of the tool itself. A pipeline rejection is not an
/// error here; it is reported and mapped to its own exit code.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] catalogue_server::config::ConfigError),

    /// Server error
    #[error(transparent)]
    Server(#[from] catalogue_server::ServerError),

    /// Record store error
    #[error("Store error: {0}")]
    Store(#[from] catalogue_store::StoreError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),
}

impl CliError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound(_) => 8,
            _ => 1,
        }
    }
}
