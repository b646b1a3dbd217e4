//! Error types for the Extractor

use crate::types::PipelineState;
use catalogue_domain::ModelId;
use catalogue_gatekeeper::FieldViolation;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors in extractor configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// TOML could not be parsed
    #[error("Failed to parse TOML: {0}")]
    Parse(String),

    /// Configuration could not be serialized
    #[error("Failed to serialize to TOML: {0}")]
    Serialize(String),

    /// Configuration values are inconsistent
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Category of a rejected pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Text empty, too short or too long
    InputError,
    /// The inference service found no model in the text
    ExtractionEmpty,
    /// The inference service failed after all retries
    ExtractionServiceError,
    /// The extracted record could not be mapped or failed validation
    ValidationError,
    /// A record with the same natural key already exists
    DuplicateConflict,
    /// The record store rejected or failed the write
    PersistenceError,
}

impl ErrorKind {
    /// Stable wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InputError => "input_error",
            ErrorKind::ExtractionEmpty => "extraction_empty",
            ErrorKind::ExtractionServiceError => "extraction_service_error",
            ErrorKind::ValidationError => "validation_error",
            ErrorKind::DuplicateConflict => "duplicate_conflict",
            ErrorKind::PersistenceError => "persistence_error",
        }
    }

    /// HTTP status code reported for this kind
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::InputError | ErrorKind::ExtractionEmpty => 400,
            ErrorKind::ExtractionServiceError => 502,
            ErrorKind::ValidationError => 422,
            ErrorKind::DuplicateConflict => 409,
            ErrorKind::PersistenceError => 500,
        }
    }

    /// Process exit code reported by command-line front ends
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorKind::InputError => 2,
            ErrorKind::ExtractionEmpty => 3,
            ErrorKind::ExtractionServiceError => 4,
            ErrorKind::ValidationError => 5,
            ErrorKind::DuplicateConflict => 6,
            ErrorKind::PersistenceError => 7,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a pipeline run ended without creating a record
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    /// Category of the rejection
    pub kind: ErrorKind,

    /// Human-readable explanation
    pub detail: String,

    /// State the run was in when it was rejected
    pub rejected_at: PipelineState,

    /// Field-level violations (validation rejections only)
    pub violations: Vec<FieldViolation>,

    /// Conflicting record (duplicate rejections only, when known)
    pub existing_id: Option<ModelId>,
}

impl Rejection {
    /// Create a rejection without field violations or conflict id
    pub fn new(kind: ErrorKind, detail: impl Into<String>, rejected_at: PipelineState) -> Self {
        Self {
            kind,
            detail: detail.into(),
            rejected_at,
            violations: Vec::new(),
            existing_id: None,
        }
    }

    /// Attach field violations
    pub fn with_violations(mut self, violations: Vec<FieldViolation>) -> Self {
        self.violations = violations;
        self
    }

    /// Attach the id of the conflicting record
    pub fn with_existing_id(mut self, existing_id: Option<ModelId>) -> Self {
        self.existing_id = existing_id;
        self
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ErrorKind; 6] = [
        ErrorKind::InputError,
        ErrorKind::ExtractionEmpty,
        ErrorKind::ExtractionServiceError,
        ErrorKind::ValidationError,
        ErrorKind::DuplicateConflict,
        ErrorKind::PersistenceError,
    ];

    #[test]
    fn test_wire_names_match_serde() {
        for kind in ALL {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, kind.as_str());
        }
    }

    #[test]
    fn test_status_and_exit_codes() {
        let codes: Vec<_> = ALL.iter().map(|k| (k.status_code(), k.exit_code())).collect();
        assert_eq!(
            codes,
            vec![(400, 2), (400, 3), (502, 4), (422, 5), (409, 6), (500, 7)]
        );
    }

    #[test]
    fn test_rejection_display() {
        let rejection = Rejection::new(
            ErrorKind::DuplicateConflict,
            "Model 'gpt-4' already exists with ID 1",
            PipelineState::CheckingDuplicate,
        )
        .with_existing_id(Some(ModelId::from_value(1)));

        assert_eq!(
            rejection.to_string(),
            "duplicate_conflict: Model 'gpt-4' already exists with ID 1"
        );
        assert_eq!(rejection.existing_id, Some(ModelId::from_value(1)));
    }
}
