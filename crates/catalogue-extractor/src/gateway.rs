//! Persistence gateway: the only path by which records are created

use crate::SharedStore;
use catalogue_domain::traits::{ModelStore, StoreFailure};
use catalogue_domain::{CreateModel, ModelRecord};
use tracing::debug;

/// Why a create failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistFailure {
    /// The natural-key uniqueness constraint rejected the write
    ConstraintViolation(String),
    /// Any other store failure
    Other(String),
}

/// Result of a create
#[derive(Debug, Clone, PartialEq)]
pub enum PersistOutcome {
    /// The canonical stored record, with id and timestamps
    Persisted(ModelRecord),
    /// Nothing was written
    PersistFailure(PersistFailure),
}

/// Writes create records to the shared store in a single transaction each
pub struct PersistenceGateway<S> {
    store: SharedStore<S>,
}

impl<S: ModelStore> PersistenceGateway<S> {
    /// Create a gateway over the shared store
    pub fn new(store: SharedStore<S>) -> Self {
        Self { store }
    }

    /// Create a record
    pub fn create(&self, record: &CreateModel) -> PersistOutcome {
        let mut store = match self.store.lock() {
            Ok(store) => store,
            Err(_) => {
                return PersistOutcome::PersistFailure(PersistFailure::Other(
                    "store lock poisoned".to_string(),
                ))
            }
        };

        match store.create(record) {
            Ok(created) => {
                debug!("Persisted '{}' as {}", created.name, created.id);
                PersistOutcome::Persisted(created)
            }
            Err(e) if e.is_unique_violation() => {
                PersistOutcome::PersistFailure(PersistFailure::ConstraintViolation(e.to_string()))
            }
            Err(e) => PersistOutcome::PersistFailure(PersistFailure::Other(e.to_string())),
        }
    }
}
