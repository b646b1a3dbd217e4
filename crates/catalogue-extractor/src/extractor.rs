//! Core Extractor implementation

use crate::cache::{ResponseCache, TtlCache};
use crate::client::{InferenceClient, InferenceOutcome};
use crate::config::ExtractorConfig;
use crate::error::{ErrorKind, Rejection};
use crate::gateway::{PersistFailure, PersistOutcome, PersistenceGateway};
use crate::mapper::map_candidate;
use crate::resolver::{DuplicateOutcome, DuplicateResolver};
use crate::types::{ExtractionRequest, PipelineOutcome, PipelineState};
use crate::SharedStore;
use catalogue_domain::traits::ModelStore;
use catalogue_gatekeeper::{FieldViolation, Gatekeeper, ValidationOutcome, ViolationReason};
use catalogue_llm::InferenceProvider;
use std::sync::Arc;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Tracks the state of one run and logs every transition
struct Run {
    state: PipelineState,
}

impl Run {
    fn new() -> Self {
        Self {
            state: PipelineState::Received,
        }
    }

    fn enter(&mut self, next: PipelineState) {
        debug!(from = %self.state, to = %next, "State transition");
        self.state = next;
    }

    fn reject(&mut self, kind: ErrorKind, detail: impl Into<String>) -> Rejection {
        let rejection = Rejection::new(kind, detail, self.state);
        warn!(at = %self.state, kind = %kind, "Rejected: {}", rejection.detail);
        self.state = PipelineState::Rejected;
        rejection
    }
}

/// The Extractor runs text through the ingestion pipeline
///
/// One `extract` call is one pipeline run. Runs are independent and may
/// execute concurrently on the same Extractor.
pub struct Extractor<S> {
    client: InferenceClient,
    resolver: DuplicateResolver<S>,
    gateway: PersistenceGateway<S>,
    gatekeeper: Gatekeeper,
    config: ExtractorConfig,
}

impl<S> Extractor<S>
where
    S: ModelStore,
{
    /// Create a new Extractor
    ///
    /// A response cache is attached when `config.cache.enabled` is set.
    pub fn new(
        provider: Arc<dyn InferenceProvider>,
        store: SharedStore<S>,
        gatekeeper: Gatekeeper,
        config: ExtractorConfig,
    ) -> Self {
        let mut client = InferenceClient::new(provider, config.retry.clone());
        if config.cache.enabled {
            client = client.with_cache(Arc::new(TtlCache::from_config(&config.cache)));
        }

        Self {
            client,
            resolver: DuplicateResolver::new(store.clone()),
            gateway: PersistenceGateway::new(store),
            gatekeeper,
            config,
        }
    }

    /// Use the given response cache instead of the configured one
    pub fn with_cache(mut self, cache: Arc<dyn ResponseCache>) -> Self {
        self.client = self.client.with_cache(cache);
        self
    }

    /// Get the active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Model used for inference
    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// Run one request through the pipeline
    pub async fn extract(&self, request: &ExtractionRequest) -> PipelineOutcome {
        let run_id = Uuid::now_v7();
        self.run(request)
            .instrument(info_span!("pipeline", run_id = %run_id))
            .await
    }

    async fn run(&self, request: &ExtractionRequest) -> PipelineOutcome {
        let mut run = Run::new();

        // Received
        let length = request.text.trim().chars().count();
        info!("Starting extraction, text length {}", length);
        if length == 0 {
            return PipelineOutcome::Rejected(
                run.reject(ErrorKind::InputError, "Text must not be empty".to_string()),
            );
        }
        if length < self.config.min_text_length {
            return PipelineOutcome::Rejected(run.reject(
                ErrorKind::InputError,
                format!(
                    "Text must be at least {} characters, got {}",
                    self.config.min_text_length, length
                ),
            ));
        }
        if length > self.config.max_text_length {
            return PipelineOutcome::Rejected(run.reject(
                ErrorKind::InputError,
                format!(
                    "Text must be at most {} characters, got {}",
                    self.config.max_text_length, length
                ),
            ));
        }

        // Extracting
        run.enter(PipelineState::Extracting);
        let (candidate, provenance) = match self.client.extract(&request.text).await {
            InferenceOutcome::Found {
                candidate,
                provenance,
            } => (candidate, provenance),
            InferenceOutcome::NotFound { .. } => {
                return PipelineOutcome::Rejected(run.reject(
                    ErrorKind::ExtractionEmpty,
                    "No model information found in text",
                ));
            }
            InferenceOutcome::ServiceFailure { reason, attempts } => {
                return PipelineOutcome::Rejected(run.reject(
                    ErrorKind::ExtractionServiceError,
                    format!("Extraction failed after {} attempt(s): {}", attempts, reason),
                ));
            }
        };

        // Mapping
        run.enter(PipelineState::Mapping);
        let record = match map_candidate(&candidate) {
            Ok(record) => record,
            Err(e) => {
                let violation = FieldViolation::new(
                    e.field(),
                    ViolationReason::Rule {
                        rule: "type_coercion".to_string(),
                        message: e.to_string(),
                    },
                );
                return PipelineOutcome::Rejected(
                    run.reject(ErrorKind::ValidationError, format!("Invalid extracted data: {}", e))
                        .with_violations(vec![violation]),
                );
            }
        };

        // Validating
        run.enter(PipelineState::Validating);
        if let ValidationOutcome::Invalid(violations) = self.gatekeeper.validate(&record) {
            let detail = violations
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return PipelineOutcome::Rejected(
                run.reject(ErrorKind::ValidationError, format!("Validation failed: {}", detail))
                    .with_violations(violations),
            );
        }

        // CheckingDuplicate
        run.enter(PipelineState::CheckingDuplicate);
        match self.resolver.resolve_conflict(&record.name) {
            Ok(DuplicateOutcome::NoConflict) => {}
            Ok(DuplicateOutcome::Conflict(existing_id)) => {
                return PipelineOutcome::Rejected(
                    run.reject(
                        ErrorKind::DuplicateConflict,
                        format!("Model '{}' already exists with ID {}", record.name, existing_id),
                    )
                    .with_existing_id(Some(existing_id)),
                );
            }
            Err(e) => {
                return PipelineOutcome::Rejected(run.reject(ErrorKind::PersistenceError, e.to_string()));
            }
        }

        // Persisting
        run.enter(PipelineState::Persisting);
        match self.gateway.create(&record) {
            PersistOutcome::Persisted(created) => {
                run.enter(PipelineState::Completed);
                info!(
                    id = %created.id,
                    tokens = provenance.tokens_used,
                    "Created model '{}'",
                    created.name
                );
                PipelineOutcome::Created {
                    record: created,
                    provenance,
                }
            }
            PersistOutcome::PersistFailure(PersistFailure::ConstraintViolation(_)) => {
                // Lost a race with a concurrent run; the lookup is best-effort.
                let existing_id = match self.resolver.resolve_conflict(&record.name) {
                    Ok(DuplicateOutcome::Conflict(id)) => Some(id),
                    _ => None,
                };
                let detail = match existing_id {
                    Some(id) => format!("Model '{}' already exists with ID {}", record.name, id),
                    None => format!("Model '{}' already exists", record.name),
                };
                PipelineOutcome::Rejected(
                    run.reject(ErrorKind::DuplicateConflict, detail)
                        .with_existing_id(existing_id),
                )
            }
            PersistOutcome::PersistFailure(PersistFailure::Other(reason)) => PipelineOutcome::Rejected(
                run.reject(ErrorKind::PersistenceError, format!("Failed to save model: {}", reason)),
            ),
        }
    }
}
