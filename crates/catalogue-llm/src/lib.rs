//! Catalogue Inference Provider Layer
//!
//! Pluggable structured-extraction providers behind one async trait.
//!
//! # Architecture
//!
//! A provider performs exactly one call to an external inference service and
//! reports what it found. Timeouts on top of the provider's own, retries and
//! caching are the job of the pipeline's inference client, not of providers.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `AnthropicProvider`: Anthropic Messages API with forced tool use
//! - `OllamaProvider`: Local Ollama API with JSON-schema constrained output
//!
//! # Examples
//!
//! ```
//! use catalogue_domain::CandidateRecord;
//! use catalogue_llm::{InferenceProvider, MockProvider};
//!
//! # tokio_test_block(async {
//! let provider = MockProvider::new(CandidateRecord::named("gpt-4"));
//! let response = provider.extract("GPT-4 was released by OpenAI").await.unwrap();
//! assert_eq!(response.candidate.unwrap().model_name.as_deref(), Some("gpt-4"));
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Runtime::new().unwrap().block_on(f)
//! # }
//! ```

#![warn(missing_docs)]

pub mod anthropic;
pub mod ollama;
pub mod parser;
pub mod prompt;

use async_trait::async_trait;
use catalogue_domain::CandidateRecord;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;

pub use anthropic::AnthropicProvider;
pub use ollama::OllamaProvider;

/// Errors that can occur during inference calls
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Network or transport failure
    #[error("Communication error: {0}")]
    Communication(String),

    /// The call did not complete in time
    #[error("Inference call timed out")]
    Timeout,

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// The service failed on its side (5xx, overloaded)
    #[error("Service error (HTTP {status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Body or reason returned by the service
        message: String,
    },

    /// The service refused the request (4xx other than rate limiting)
    #[error("Request rejected (HTTP {status}): {message}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Body or reason returned by the service
        message: String,
    },

    /// Invalid or malformed response
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Provider is misconfigured (e.g. missing credentials)
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl LlmError {
    /// Whether retrying the same call may succeed
    ///
    /// Timeouts, transport errors, server-side failures and rate limiting are
    /// transient; everything else fails the same way on every attempt.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            LlmError::Communication(_)
                | LlmError::Timeout
                | LlmError::RateLimitExceeded
                | LlmError::Server { .. }
        )
    }

    /// Classify a non-success HTTP status returned by a provider
    pub fn from_status(status: u16, message: impl Into<String>, model: &str) -> Self {
        let message = message.into();
        match status {
            429 => LlmError::RateLimitExceeded,
            404 => LlmError::ModelNotAvailable(model.to_string()),
            500..=599 => LlmError::Server { status, message },
            _ => LlmError::Rejected { status, message },
        }
    }

    /// Map a transport-level reqwest failure
    pub(crate) fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Communication(format!("Request failed: {}", e))
        }
    }
}

/// Token accounting reported by a provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    /// Prompt tokens
    pub input_tokens: u64,
    /// Completion tokens
    pub output_tokens: u64,
    /// Prompt tokens served from the provider's prompt cache
    pub cache_read_input_tokens: u64,
    /// Prompt tokens written to the provider's prompt cache
    pub cache_creation_input_tokens: u64,
}

impl TokenUsage {
    /// Total tokens billed for the call (input + output)
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// Result of one successful provider call
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    /// Extracted candidate, or `None` when the service found nothing usable
    pub candidate: Option<CandidateRecord>,
    /// Token accounting
    pub usage: TokenUsage,
    /// Model that served the call
    pub model: String,
}

/// A structured-extraction inference service
///
/// Implementations make one call per invocation and keep any reusable
/// transport (connection pool, HTTP client) internal. They hold no
/// per-request state.
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// Model identifier used for calls
    fn model(&self) -> &str;

    /// Extract a candidate model record from unstructured text
    async fn extract(&self, text: &str) -> Result<ProviderResponse, LlmError>;
}

type MockResult = Result<Option<CandidateRecord>, LlmError>;

/// Mock inference provider for deterministic testing
///
/// Returns pre-configured results without making any network calls.
/// Resolution order for a call: the next scripted result (if any), then a
/// result registered for the exact input text, then the default.
///
/// # Examples
///
/// ```
/// use catalogue_domain::CandidateRecord;
/// use catalogue_llm::{LlmError, MockProvider};
///
/// // Fixed candidate for every input
/// let provider = MockProvider::new(CandidateRecord::named("gpt-4"));
///
/// // Nothing found, except for one specific text
/// let mut provider = MockProvider::not_found();
/// provider.add_response("Llama 2 by Meta", CandidateRecord::named("llama-2"));
///
/// // Fail twice, then succeed
/// let provider = MockProvider::new(CandidateRecord::named("gpt-4"));
/// provider.push_error(LlmError::Timeout);
/// provider.push_error(LlmError::RateLimitExceeded);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    model: String,
    default_candidate: Option<CandidateRecord>,
    usage: TokenUsage,
    delay: Option<Duration>,
    responses: Arc<Mutex<HashMap<String, MockResult>>>,
    script: Arc<Mutex<VecDeque<MockResult>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockProvider {
    /// Create a MockProvider returning the same candidate for all inputs
    pub fn new(candidate: CandidateRecord) -> Self {
        Self::with_default(Some(candidate))
    }

    /// Create a MockProvider that finds nothing for all inputs
    pub fn not_found() -> Self {
        Self::with_default(None)
    }

    fn with_default(default_candidate: Option<CandidateRecord>) -> Self {
        Self {
            model: "mock-extractor".to_string(),
            default_candidate,
            usage: TokenUsage {
                input_tokens: 500,
                output_tokens: 150,
                ..TokenUsage::default()
            },
            delay: None,
            responses: Arc::new(Mutex::new(HashMap::new())),
            script: Arc::new(Mutex::new(VecDeque::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Set the reported model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the reported token usage
    pub fn with_usage(mut self, input_tokens: u64, output_tokens: u64) -> Self {
        self.usage.input_tokens = input_tokens;
        self.usage.output_tokens = output_tokens;
        self
    }

    /// Delay every call (simulates a slow service)
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Register a candidate for a specific input text
    pub fn add_response(&mut self, text: impl Into<String>, candidate: CandidateRecord) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(text.into(), Ok(Some(candidate)));
    }

    /// Register "nothing found" for a specific input text
    pub fn add_not_found(&mut self, text: impl Into<String>) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(text.into(), Ok(None));
    }

    /// Register a failure for a specific input text
    pub fn add_error(&mut self, text: impl Into<String>, error: LlmError) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(text.into(), Err(error));
    }

    /// Queue a failure to be returned by the next unscripted call
    pub fn push_error(&self, error: LlmError) {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Err(error));
    }

    /// Queue a result to be returned by the next unscripted call
    pub fn push_result(&self, result: Result<Option<CandidateRecord>, LlmError>) {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(result);
    }

    /// Get the number of times extract was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *self.call_count.lock().unwrap_or_else(PoisonError::into_inner) = 0;
    }

    fn next_result(&self, text: &str) -> MockResult {
        if let Some(scripted) = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
        {
            return scripted;
        }

        let responses = self.responses.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(result) = responses.get(text) {
            return result.clone();
        }

        Ok(self.default_candidate.clone())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::not_found()
    }
}

#[async_trait]
impl InferenceProvider for MockProvider {
    fn model(&self) -> &str {
        &self.model
    }

    async fn extract(&self, text: &str) -> Result<ProviderResponse, LlmError> {
        *self.call_count.lock().unwrap_or_else(PoisonError::into_inner) += 1;

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let candidate = self.next_result(text)?;
        Ok(ProviderResponse {
            candidate,
            usage: self.usage,
            model: self.model.clone(),
        })
    }
}
