//! Trait definitions for external interactions
//!
//! These traits define the boundary between domain logic and the record
//! store. Implementations live in other crates (catalogue-store).

use crate::{CreateModel, ModelId, ModelRecord, UpdateModel};

/// Classification of record store failures
///
/// The ingestion pipeline must tell a lost race on the natural key apart from
/// every other failure, so store errors expose that distinction.
pub trait StoreFailure: std::fmt::Display {
    /// Whether the failure is a violation of the natural-key uniqueness constraint
    fn is_unique_violation(&self) -> bool;
}

/// Trait for storing and retrieving model records
///
/// Implemented by the infrastructure layer (catalogue-store). Every operation
/// is transactional on its own; `create` fails with a unique violation when
/// the natural key already exists.
pub trait ModelStore {
    /// Error type for store operations
    type Error: StoreFailure;

    /// Find a record by its natural key (exact match)
    fn find_by_name(&self, name: &str) -> Result<Option<ModelRecord>, Self::Error>;

    /// Create a record, returning the canonical stored version
    fn create(&mut self, model: &CreateModel) -> Result<ModelRecord, Self::Error>;

    /// Get a record by identifier
    fn get(&self, id: ModelId) -> Result<Option<ModelRecord>, Self::Error>;

    /// Apply a partial update, returning the updated record if it exists
    fn update(&mut self, id: ModelId, changes: &UpdateModel) -> Result<Option<ModelRecord>, Self::Error>;

    /// Delete a record, returning whether it existed
    fn delete(&mut self, id: ModelId) -> Result<bool, Self::Error>;
}
