//! Types for extraction requests and outcomes

use crate::error::{ErrorKind, Rejection};
use catalogue_domain::{ModelRecord, Provenance};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Request to extract a model record from text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRequest {
    /// Unstructured text describing a model
    pub text: String,
}

impl ExtractionRequest {
    /// Create a request
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// States of a pipeline run
///
/// Runs move strictly forward through these states and end in `Completed` or
/// `Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    /// Request accepted, input not yet checked
    Received,
    /// Waiting on the inference service
    Extracting,
    /// Converting the candidate into a create record
    Mapping,
    /// Running the validation gate
    Validating,
    /// Looking up the natural key
    CheckingDuplicate,
    /// Writing the record
    Persisting,
    /// Record created
    Completed,
    /// Run rejected
    Rejected,
}

impl PipelineState {
    /// Whether the run has ended
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Completed | PipelineState::Rejected)
    }

    /// Get the state name
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineState::Received => "received",
            PipelineState::Extracting => "extracting",
            PipelineState::Mapping => "mapping",
            PipelineState::Validating => "validating",
            PipelineState::CheckingDuplicate => "checking_duplicate",
            PipelineState::Persisting => "persisting",
            PipelineState::Completed => "completed",
            PipelineState::Rejected => "rejected",
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final result of one pipeline run
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    /// A new record was persisted
    Created {
        /// The canonical stored record
        record: ModelRecord,
        /// Accounting for the inference call
        provenance: Provenance,
    },

    /// The run ended without creating a record
    Rejected(Rejection),
}

impl PipelineOutcome {
    /// Whether a record was created
    pub fn is_created(&self) -> bool {
        matches!(self, PipelineOutcome::Created { .. })
    }

    /// The created record, if any
    pub fn record(&self) -> Option<&ModelRecord> {
        match self {
            PipelineOutcome::Created { record, .. } => Some(record),
            PipelineOutcome::Rejected(_) => None,
        }
    }

    /// The rejection, if any
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            PipelineOutcome::Created { .. } => None,
            PipelineOutcome::Rejected(rejection) => Some(rejection),
        }
    }

    /// Kind of the rejection, if any
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.rejection().map(|r| r.kind)
    }
}
