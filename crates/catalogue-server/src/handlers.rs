//! HTTP request handlers for the catalogue service.
//!
//! Implements the extraction endpoint, record lookups and a health check
//! using axum.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use catalogue_domain::traits::ModelStore;
use catalogue_domain::{ModelId, ModelRecord};
use catalogue_extractor::{
    ErrorKind, ExtractionRequest, Extractor, PipelineOutcome, PipelineState, Rejection, SharedStore,
};
use catalogue_gatekeeper::FieldViolation;
use catalogue_store::SqliteStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Ingestion pipeline
    pub extractor: Arc<Extractor<SqliteStore>>,
    /// Record store (shared with the pipeline)
    pub store: SharedStore<SqliteStore>,
}

impl AppState {
    /// Create state from a pipeline and the store it writes to
    pub fn new(extractor: Extractor<SqliteStore>, store: SharedStore<SqliteStore>) -> Self {
        Self {
            extractor: Arc::new(extractor),
            store,
        }
    }
}

/// Extraction request body
#[derive(Debug, Deserialize)]
pub struct ExtractBody {
    /// Unstructured text describing a model
    #[serde(default)]
    pub text: String,
}

/// Successful extraction response
#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractResponse {
    /// The created record
    pub record: ModelRecord,
    /// Tokens consumed by the inference call
    pub tokens_used: u64,
    /// Inference model that produced the record
    pub model_used: String,
    /// Whether the inference result came from the response cache
    #[serde(default)]
    pub cached: bool,
}

/// Rejected extraction response
#[derive(Debug, Serialize, Deserialize)]
pub struct RejectionResponse {
    /// Wire name of the error kind
    pub error_kind: ErrorKind,
    /// Human-readable explanation
    pub detail: String,
    /// Conflicting record, for duplicate conflicts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existing_id: Option<ModelId>,
    /// Field-level violations, for validation errors
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<FieldViolation>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Inference model in use
    pub model: String,
    /// Number of stored records, when the store is reachable
    pub records: Option<usize>,
}

/// Error response for lookups
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// The pipeline rejected the request
    Rejected(Rejection),
    /// Record not found
    NotFound(String),
    /// Internal server error
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Rejected(rejection) => {
                let status = StatusCode::from_u16(rejection.kind.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                let body = Json(RejectionResponse {
                    error_kind: rejection.kind,
                    detail: rejection.detail,
                    existing_id: rejection.existing_id,
                    violations: rejection.violations,
                });
                (status, body).into_response()
            }
            AppError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(ErrorResponse { error: message })).into_response()
            }
            AppError::InternalError(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse { error: message }),
            )
                .into_response(),
        }
    }
}

/// POST /api/v1/extract - Extract a model record from text and store it
async fn extract_model(
    State(state): State<AppState>,
    body: Result<Json<ExtractBody>, JsonRejection>,
) -> Result<(StatusCode, Json<ExtractResponse>), AppError> {
    let Json(body) = body.map_err(|e| {
        AppError::Rejected(Rejection::new(
            ErrorKind::InputError,
            format!("Invalid request body: {}", e.body_text()),
            PipelineState::Received,
        ))
    })?;

    match state.extractor.extract(&ExtractionRequest::new(body.text)).await {
        PipelineOutcome::Created { record, provenance } => Ok((
            StatusCode::CREATED,
            Json(ExtractResponse {
                record,
                tokens_used: provenance.tokens_used,
                model_used: provenance.model_used,
                cached: provenance.cached,
            }),
        )),
        PipelineOutcome::Rejected(rejection) => Err(AppError::Rejected(rejection)),
    }
}

/// GET /api/v1/models/:id - Look up a record by id
async fn get_model(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ModelRecord>, AppError> {
    let store = state
        .store
        .lock()
        .map_err(|_| AppError::InternalError("store lock poisoned".to_string()))?;

    store
        .get(ModelId::from_value(id))
        .map_err(|e| {
            error!("Lookup of model {} failed: {}", id, e);
            AppError::InternalError(e.to_string())
        })?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Model with ID {} not found", id)))
}

/// GET /api/v1/models/name/:name - Look up a record by natural key
async fn get_model_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ModelRecord>, AppError> {
    let store = state
        .store
        .lock()
        .map_err(|_| AppError::InternalError("store lock poisoned".to_string()))?;

    store
        .find_by_name(&name)
        .map_err(|e| {
            error!("Lookup of model '{}' failed: {}", name, e);
            AppError::InternalError(e.to_string())
        })?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Model '{}' not found", name)))
}

/// GET /health - Service health
async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    let records = state
        .store
        .lock()
        .ok()
        .and_then(|store| store.count().ok());

    let status = if records.is_some() { "healthy" } else { "degraded" };

    Json(HealthCheckResponse {
        status: status.to_string(),
        model: state.extractor.model().to_string(),
        records,
    })
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/api/v1/extract", post(extract_model))
        .route("/api/v1/models/:id", get(get_model))
        .route("/api/v1/models/name/:name", get(get_model_by_name))
        .route("/health", get(health_check))
        .with_state(state)
}
