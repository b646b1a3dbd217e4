//! Gatekeeper error types

use thiserror::Error;

/// Errors that can occur when setting up the gatekeeper
///
/// Validating a record never fails; rejected records are reported through
/// `ValidationOutcome`.
#[derive(Error, Debug)]
pub enum GatekeeperError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
