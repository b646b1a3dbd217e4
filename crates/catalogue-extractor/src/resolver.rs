//! Duplicate detection by natural key

use crate::SharedStore;
use catalogue_domain::traits::ModelStore;
use catalogue_domain::ModelId;
use thiserror::Error;

/// Whether a natural key is already taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateOutcome {
    /// No record uses the name
    NoConflict,
    /// A record with this id already uses the name
    Conflict(ModelId),
}

/// The lookup itself failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Store lookup failed: {0}")]
pub struct ResolveFailure(pub String);

/// Looks up natural keys in the shared record store
///
/// This is an early, friendly check. The store's unique constraint remains
/// the authoritative guard against concurrent creates.
pub struct DuplicateResolver<S> {
    store: SharedStore<S>,
}

impl<S: ModelStore> DuplicateResolver<S> {
    /// Create a resolver over the shared store
    pub fn new(store: SharedStore<S>) -> Self {
        Self { store }
    }

    /// Check whether a record already uses the name (exact match)
    pub fn resolve_conflict(&self, name: &str) -> Result<DuplicateOutcome, ResolveFailure> {
        let store = self
            .store
            .lock()
            .map_err(|_| ResolveFailure("store lock poisoned".to_string()))?;

        match store.find_by_name(name) {
            Ok(Some(existing)) => Ok(DuplicateOutcome::Conflict(existing.id)),
            Ok(None) => Ok(DuplicateOutcome::NoConflict),
            Err(e) => Err(ResolveFailure(e.to_string())),
        }
    }
}
