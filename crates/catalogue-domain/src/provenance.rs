//! Provenance of an extraction

use serde::{Deserialize, Serialize};

/// Accounting data about the inference call behind one request
///
/// Attached to the response of a single request and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    /// Tokens consumed by the inference call (input + output)
    pub tokens_used: u64,

    /// Inference model/version that produced the result
    pub model_used: String,

    /// Whether the result was served from the response cache
    ///
    /// Cached results did not pay for a call, so `tokens_used` is 0.
    #[serde(default)]
    pub cached: bool,
}

impl Provenance {
    /// Create provenance for a fresh inference call
    pub fn new(tokens_used: u64, model_used: impl Into<String>) -> Self {
        Self {
            tokens_used,
            model_used: model_used.into(),
            cached: false,
        }
    }

    /// Provenance for a result replayed from the cache
    pub fn replayed(&self) -> Self {
        Self {
            tokens_used: 0,
            model_used: self.model_used.clone(),
            cached: true,
        }
    }
}
