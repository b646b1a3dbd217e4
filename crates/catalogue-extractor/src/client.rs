//! Inference client: retries, timeouts and caching around a provider

use crate::cache::ResponseCache;
use crate::config::RetryPolicy;
use catalogue_domain::{CandidateRecord, Provenance};
use catalogue_llm::{InferenceProvider, LlmError};
use std::sync::Arc;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

/// Result of asking the inference service about a text
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceOutcome {
    /// A candidate record was extracted
    Found {
        /// The extracted candidate
        candidate: CandidateRecord,
        /// Accounting for the call
        provenance: Provenance,
    },

    /// The service found no model in the text
    NotFound {
        /// Accounting for the call
        provenance: Provenance,
    },

    /// The service could not be used
    ServiceFailure {
        /// Last failure observed
        reason: String,
        /// Attempts made, including the first
        attempts: u32,
    },
}

impl InferenceOutcome {
    /// Whether the outcome may be served again for the same text
    pub fn is_cacheable(&self) -> bool {
        !matches!(self, InferenceOutcome::ServiceFailure { .. })
    }

    /// Same outcome, marked as served from the cache
    pub fn replayed(&self) -> Self {
        match self {
            InferenceOutcome::Found {
                candidate,
                provenance,
            } => InferenceOutcome::Found {
                candidate: candidate.clone(),
                provenance: provenance.replayed(),
            },
            InferenceOutcome::NotFound { provenance } => InferenceOutcome::NotFound {
                provenance: provenance.replayed(),
            },
            failure => failure.clone(),
        }
    }
}

/// Calls an inference provider with a bounded timeout and retry budget
///
/// Never fails: every error ends up as `InferenceOutcome::ServiceFailure`.
pub struct InferenceClient {
    provider: Arc<dyn InferenceProvider>,
    policy: RetryPolicy,
    cache: Option<Arc<dyn ResponseCache>>,
}

impl InferenceClient {
    /// Create a client without a response cache
    pub fn new(provider: Arc<dyn InferenceProvider>, policy: RetryPolicy) -> Self {
        Self {
            provider,
            policy,
            cache: None,
        }
    }

    /// Serve repeated texts from the given cache
    pub fn with_cache(mut self, cache: Arc<dyn ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Model used by the underlying provider
    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Extract a candidate from text
    pub async fn extract(&self, text: &str) -> InferenceOutcome {
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(text) {
                debug!("Inference cache hit");
                return hit.replayed();
            }
        }

        let outcome = self.call_with_retry(text).await;

        if let Some(cache) = &self.cache {
            if outcome.is_cacheable() {
                cache.put(text, outcome.clone());
            }
        }
        outcome
    }

    async fn call_with_retry(&self, text: &str) -> InferenceOutcome {
        let max_attempts = self.policy.max_attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;

            let result = match timeout(self.policy.attempt_timeout(), self.provider.extract(text)).await {
                Ok(result) => result,
                Err(_) => Err(LlmError::Timeout),
            };

            match result {
                Ok(response) => {
                    let tokens = response.usage.total();
                    info!(
                        tokens,
                        cache_read = response.usage.cache_read_input_tokens,
                        cache_creation = response.usage.cache_creation_input_tokens,
                        attempt,
                        "Inference call succeeded"
                    );

                    let provenance = Provenance::new(tokens, response.model);
                    return match response.candidate {
                        Some(candidate) if !candidate.is_empty() => InferenceOutcome::Found {
                            candidate,
                            provenance,
                        },
                        _ => InferenceOutcome::NotFound { provenance },
                    };
                }
                Err(e) if e.is_transient() && attempt < max_attempts => {
                    let delay = self.policy.backoff(attempt);
                    warn!(
                        attempt,
                        max_attempts,
                        "Transient inference failure: {}; retrying in {:?}",
                        e,
                        delay
                    );
                    sleep(delay).await;
                }
                Err(e) => {
                    warn!(attempt, "Inference failed: {}", e);
                    return InferenceOutcome::ServiceFailure {
                        reason: e.to_string(),
                        attempts: attempt,
                    };
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::TtlCache;
    use catalogue_llm::MockProvider;
    use std::time::Duration;

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            initial_backoff_ms: 1,
            max_backoff_ms: 4,
            attempt_timeout_ms: 1_000,
        }
    }

    fn client_for(provider: &MockProvider, max_retries: u32) -> InferenceClient {
        InferenceClient::new(Arc::new(provider.clone()), fast_policy(max_retries))
    }

    #[tokio::test]
    async fn test_found() {
        let provider = MockProvider::new(CandidateRecord::named("gpt-4"));
        let outcome = client_for(&provider, 3).extract("GPT-4 text").await;

        match outcome {
            InferenceOutcome::Found { candidate, provenance } => {
                assert_eq!(candidate.model_name.as_deref(), Some("gpt-4"));
                assert_eq!(provenance.tokens_used, 650);
                assert_eq!(provenance.model_used, "mock-extractor");
                assert!(!provenance.cached);
            }
            other => panic!("Expected Found, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_candidate_is_not_found() {
        let provider = MockProvider::new(CandidateRecord::default());
        let outcome = client_for(&provider, 3).extract("weather report").await;

        assert!(matches!(outcome, InferenceOutcome::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_transient_failures_are_retried() {
        let provider = MockProvider::new(CandidateRecord::named("gpt-4"));
        provider.push_error(LlmError::RateLimitExceeded);
        provider.push_error(LlmError::Server {
            status: 529,
            message: "overloaded".to_string(),
        });

        let outcome = client_for(&provider, 3).extract("text").await;

        assert!(matches!(outcome, InferenceOutcome::Found { .. }));
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_retry_budget_exhausted() {
        let provider = MockProvider::new(CandidateRecord::named("gpt-4"));
        for _ in 0..4 {
            provider.push_error(LlmError::Communication("connection reset".to_string()));
        }

        let outcome = client_for(&provider, 3).extract("text").await;

        match outcome {
            InferenceOutcome::ServiceFailure { reason, attempts } => {
                assert_eq!(attempts, 4);
                assert!(reason.contains("connection reset"));
            }
            other => panic!("Expected ServiceFailure, got {:?}", other),
        }
        assert_eq!(provider.call_count(), 4);
    }

    #[tokio::test]
    async fn test_permanent_failure_is_not_retried() {
        let provider = MockProvider::new(CandidateRecord::named("gpt-4"));
        provider.push_error(LlmError::InvalidResponse("not json".to_string()));

        let outcome = client_for(&provider, 3).extract("text").await;

        assert!(matches!(outcome, InferenceOutcome::ServiceFailure { attempts: 1, .. }));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_slow_attempts_time_out() {
        let provider = MockProvider::new(CandidateRecord::named("gpt-4"))
            .with_delay(Duration::from_millis(500));
        let policy = RetryPolicy {
            attempt_timeout_ms: 20,
            ..fast_policy(1)
        };
        let client = InferenceClient::new(Arc::new(provider.clone()), policy);

        let outcome = client.extract("text").await;

        match outcome {
            InferenceOutcome::ServiceFailure { reason, attempts } => {
                assert_eq!(attempts, 2);
                assert_eq!(reason, LlmError::Timeout.to_string());
            }
            other => panic!("Expected ServiceFailure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_cache_replays_without_tokens() {
        let provider = MockProvider::new(CandidateRecord::named("gpt-4"));
        let cache = Arc::new(TtlCache::new(Duration::from_secs(60), 16));
        let client = client_for(&provider, 0).with_cache(cache);

        let first = client.extract("same text").await;
        let second = client.extract("same text").await;

        assert_eq!(provider.call_count(), 1);
        match (first, second) {
            (
                InferenceOutcome::Found { provenance: fresh, .. },
                InferenceOutcome::Found { provenance: replayed, .. },
            ) => {
                assert_eq!(fresh.tokens_used, 650);
                assert_eq!(replayed.tokens_used, 0);
                assert!(replayed.cached);
            }
            other => panic!("Expected two Found outcomes, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let provider = MockProvider::new(CandidateRecord::named("gpt-4"));
        provider.push_error(LlmError::Timeout);
        let cache = Arc::new(TtlCache::new(Duration::from_secs(60), 16));
        let client = client_for(&provider, 0).with_cache(cache.clone());

        let first = client.extract("text").await;
        assert!(matches!(first, InferenceOutcome::ServiceFailure { .. }));
        assert!(cache.is_empty());

        let second = client.extract("text").await;
        assert!(matches!(second, InferenceOutcome::Found { .. }));
        assert_eq!(provider.call_count(), 2);
    }
}
