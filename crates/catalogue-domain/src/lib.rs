//! Catalogue Domain Layer
//!
//! This crate contains the domain model for the model catalogue and the trait
//! interfaces that the infrastructure layers implement. It performs no I/O.
//!
//! ## Key Concepts
//!
//! - **Model record**: The canonical, persisted catalogue entry with a
//!   store-assigned identifier and store-managed timestamps
//! - **Natural key**: The unique, human-meaningful `name` of a model
//! - **Candidate record**: Unvalidated structured output of the inference step
//! - **Provenance**: Per-request accounting about the inference call
//!
//! ## Architecture
//!
//! - Pure data types and value objects only
//! - Infrastructure implementations (SQLite, HTTP providers) live in other crates
//! - Trait definitions for the record store boundary

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod candidate;
pub mod provenance;
pub mod record;
pub mod traits;

// Re-exports for convenience
pub use candidate::CandidateRecord;
pub use provenance::Provenance;
pub use record::{CreateModel, ModelId, ModelRecord, RecordField, UpdateModel};
