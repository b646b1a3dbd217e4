//! Catalogue Extractor
//!
//! Turns a block of unstructured text into at most one persisted model record.
//!
//! # Architecture
//!
//! ```text
//! Text → InferenceClient → map_candidate → Gatekeeper → DuplicateResolver → PersistenceGateway
//! ```
//!
//! Every run goes through the states `Received → Extracting → Mapping →
//! Validating → CheckingDuplicate → Persisting` and ends either `Completed`
//! with the stored record or `Rejected` with exactly one [`ErrorKind`].
//! Components report typed outcomes; only the [`Extractor`] turns them into
//! rejections.
//!
//! # Concurrency
//!
//! Runs share nothing but the record store ([`SharedStore`]) and the optional
//! response cache. The store's unique constraint on the natural key is the
//! authoritative duplicate guard: of two concurrent runs for the same model,
//! one completes and the other is rejected as a duplicate.
//!
//! # Example Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use catalogue_domain::CandidateRecord;
//! use catalogue_extractor::{shared, ExtractionRequest, Extractor, ExtractorConfig, PipelineOutcome};
//! use catalogue_gatekeeper::Gatekeeper;
//! use catalogue_llm::MockProvider;
//! use catalogue_store::SqliteStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = MockProvider::new(CandidateRecord::named("gpt-4").with_organization("OpenAI"));
//! let store = shared(SqliteStore::in_memory()?);
//!
//! let extractor = Extractor::new(
//!     Arc::new(provider),
//!     store,
//!     Gatekeeper::default_config(),
//!     ExtractorConfig::default(),
//! );
//!
//! let request = ExtractionRequest::new("GPT-4 is a large multimodal model released by OpenAI.");
//! match extractor.extract(&request).await {
//!     PipelineOutcome::Created { record, provenance } => {
//!         println!("Created {} ({} tokens)", record.id, provenance.tokens_used);
//!     }
//!     PipelineOutcome::Rejected(rejection) => println!("Rejected: {}", rejection),
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod cache;
mod client;
mod config;
mod error;
mod extractor;
mod gateway;
mod mapper;
mod resolver;
mod types;


use std::sync::{Arc, Mutex};

pub use cache::{ResponseCache, TtlCache};
pub use client::{InferenceClient, InferenceOutcome};
pub use config::{CacheConfig, ExtractorConfig, RetryPolicy};
pub use error::{ConfigError, ErrorKind, Rejection};
pub use extractor::Extractor;
pub use gateway::{PersistFailure, PersistOutcome, PersistenceGateway};
pub use mapper::{map_candidate, parse_release_date, MappingError};
pub use resolver::{DuplicateOutcome, DuplicateResolver, ResolveFailure};
pub use types::{ExtractionRequest, PipelineOutcome, PipelineState};

/// Record store shared between concurrent pipeline runs
///
/// The lock is only ever taken for a single store operation and never held
/// across an `.await`.
pub type SharedStore<S> = Arc<Mutex<S>>;

/// Wrap a store for sharing between pipeline runs
pub fn shared<S>(store: S) -> SharedStore<S> {
    Arc::new(Mutex::new(store))
}
