//! Ollama Provider Implementation
//!
//! Provides integration with Ollama's local LLM API for running extraction
//! against local models.
//!
//! # Features
//!
//! - Async HTTP communication with Ollama API
//! - Structured output constrained by the candidate JSON schema
//! - Timeout handling
//!
//! # Examples
//!
//! ```no_run
//! use catalogue_llm::OllamaProvider;
//!
//! let provider = OllamaProvider::new("http://localhost:11434", "llama3.1").unwrap();
//! ```

use crate::parser::parse_candidate_text;
use crate::prompt::{candidate_schema, PromptBuilder};
use crate::{InferenceProvider, LlmError, ProviderResponse, TokenUsage};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::info;

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default timeout for requests (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Ollama API provider for local inference
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    client: reqwest::Client,
}

/// Request body for Ollama generate API
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    format: Value,
}

/// Response from Ollama generate API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
    #[serde(default)]
    prompt_eval_count: Option<u64>,
    #[serde(default)]
    eval_count: Option<u64>,
}

impl OllamaProvider {
    /// Create a new Ollama provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "llama3.1", "mistral")
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| LlmError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into(),
            model: model.into(),
            client,
        })
    }

    /// Create a new Ollama provider on `http://localhost:11434`
    pub fn default_endpoint(model: impl Into<String>) -> Result<Self, LlmError> {
        Self::new(DEFAULT_ENDPOINT, model)
    }
}

#[async_trait]
impl InferenceProvider for OllamaProvider {
    fn model(&self) -> &str {
        &self.model
    }

    async fn extract(&self, text: &str) -> Result<ProviderResponse, LlmError> {
        let url = format!("{}/api/generate", self.endpoint);

        let request_body = OllamaGenerateRequest {
            model: &self.model,
            prompt: PromptBuilder::new(text).build(),
            stream: false,
            format: candidate_schema(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(LlmError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::from_status(status.as_u16(), error_text, &self.model));
        }

        let body: OllamaGenerateResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let usage = TokenUsage {
            input_tokens: body.prompt_eval_count.unwrap_or(0),
            output_tokens: body.eval_count.unwrap_or(0),
            ..TokenUsage::default()
        };
        info!(tokens = usage.total(), model = %self.model, "Ollama extraction call completed");

        Ok(ProviderResponse {
            candidate: parse_candidate_text(&body.response)?,
            usage,
            model: self.model.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ollama_provider_creation() {
        let provider = OllamaProvider::new("http://localhost:11434", "llama3.1").unwrap();
        assert_eq!(provider.endpoint, "http://localhost:11434");
        assert_eq!(provider.model(), "llama3.1");
    }

    #[test]
    fn test_ollama_provider_default_endpoint() {
        let provider = OllamaProvider::default_endpoint("mistral").unwrap();
        assert_eq!(provider.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(provider.model, "mistral");
    }

    #[test]
    fn test_response_without_counts_decodes() {
        let body: OllamaGenerateResponse =
            serde_json::from_str(r#"{"response": "null", "done": true}"#).unwrap();
        assert_eq!(body.prompt_eval_count, None);
        assert_eq!(body.response, "null");
    }

    // Integration tests (requires running Ollama)
    #[tokio::test]
    #[ignore] // Only run when Ollama is available
    async fn test_ollama_extract_integration() {
        let provider = OllamaProvider::default_endpoint("llama3.1").unwrap();
        let result = provider
            .extract("GPT-4 is a large multimodal model released by OpenAI in March 2023.")
            .await;

        if let Ok(response) = result {
            assert_eq!(response.model, "llama3.1");
        }
    }

    #[tokio::test]
    async fn test_ollama_error_handling() {
        // Use invalid endpoint to trigger error
        let provider = OllamaProvider::new("http://localhost:99999", "llama3.1").unwrap();

        let result = provider.extract("test").await;
        match result {
            Err(LlmError::Communication(_)) => {} // Expected
            other => panic!("Expected Communication error, got {:?}", other.map(|r| r.model)),
        }
    }
}
