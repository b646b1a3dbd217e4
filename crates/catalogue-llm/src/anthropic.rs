//! Anthropic Provider Implementation
//!
//! Calls the Anthropic Messages API and forces structured output through a
//! single tool whose input schema is the candidate record.
//!
//! # Features
//!
//! - System prompt marked for prompt caching
//! - Token accounting including cache reads and writes
//! - HTTP status classification into transient and permanent failures
//!
//! # Examples
//!
//! ```no_run
//! use catalogue_llm::AnthropicProvider;
//!
//! let provider = AnthropicProvider::new("sk-ant-...", "claude-sonnet-4-5").unwrap();
//! ```

use crate::parser::{parse_candidate_text, parse_candidate_value};
use crate::prompt::{candidate_schema, PromptBuilder, SYSTEM_PROMPT, TOOL_DESCRIPTION, TOOL_NAME};
use crate::{InferenceProvider, LlmError, ProviderResponse, TokenUsage};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// Default Anthropic API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com";

/// Default model
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5";

/// Messages API version header value
pub const API_VERSION: &str = "2023-06-01";

/// Default completion budget
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Transport-level timeout (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Anthropic Messages API provider
pub struct AnthropicProvider {
    endpoint: String,
    model: String,
    api_key: String,
    max_tokens: u32,
    prompt_cache: bool,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: Vec<SystemBlock<'a>>,
    messages: Vec<Message>,
    tools: Vec<Tool>,
    tool_choice: ToolChoice,
}

#[derive(Serialize)]
struct SystemBlock<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    cache_control: Option<CacheControl>,
}

#[derive(Serialize)]
struct CacheControl {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct Tool {
    name: &'static str,
    description: &'static str,
    input_schema: Value,
}

#[derive(Serialize)]
struct ToolChoice {
    #[serde(rename = "type")]
    kind: &'static str,
    name: &'static str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    model: String,
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
    ToolUse { name: String, input: Value },
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct Usage {
    input_tokens: u64,
    output_tokens: u64,
    #[serde(default)]
    cache_creation_input_tokens: Option<u64>,
    #[serde(default)]
    cache_read_input_tokens: Option<u64>,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Configuration` if the API key is empty or the HTTP
    /// client cannot be built.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::Configuration(
                "Anthropic API key is not set".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| LlmError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: model.into(),
            api_key,
            max_tokens: DEFAULT_MAX_TOKENS,
            prompt_cache: true,
            client,
        })
    }

    /// Override the API endpoint (e.g. for a proxy)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the completion token budget
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Enable or disable prompt caching of the system prompt
    pub fn with_prompt_cache(mut self, enabled: bool) -> Self {
        self.prompt_cache = enabled;
        self
    }

    fn request_body<'a>(&'a self, text: &str) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system: vec![SystemBlock {
                kind: "text",
                text: SYSTEM_PROMPT,
                cache_control: self
                    .prompt_cache
                    .then_some(CacheControl { kind: "ephemeral" }),
            }],
            messages: vec![Message {
                role: "user",
                content: PromptBuilder::new(text).user_message(),
            }],
            tools: vec![Tool {
                name: TOOL_NAME,
                description: TOOL_DESCRIPTION,
                input_schema: candidate_schema(),
            }],
            tool_choice: ToolChoice {
                kind: "tool",
                name: TOOL_NAME,
            },
        }
    }
}

/// Turn a decoded Messages API response into a provider response
fn interpret(response: MessagesResponse) -> Result<ProviderResponse, LlmError> {
    let usage = TokenUsage {
        input_tokens: response.usage.input_tokens,
        output_tokens: response.usage.output_tokens,
        cache_read_input_tokens: response.usage.cache_read_input_tokens.unwrap_or(0),
        cache_creation_input_tokens: response.usage.cache_creation_input_tokens.unwrap_or(0),
    };

    let mut fallback_text = None;
    let mut candidate = None;
    for block in &response.content {
        match block {
            ContentBlock::ToolUse { name, input } if name == TOOL_NAME => {
                candidate = Some(parse_candidate_value(input)?);
                break;
            }
            ContentBlock::Text { text } if fallback_text.is_none() => {
                fallback_text = Some(text.as_str());
            }
            _ => {}
        }
    }

    let candidate = match (candidate, fallback_text) {
        (Some(candidate), _) => candidate,
        (None, Some(text)) => parse_candidate_text(text)?,
        (None, None) => {
            return Err(LlmError::InvalidResponse(
                "Response contained no structured output".to_string(),
            ))
        }
    };

    Ok(ProviderResponse {
        candidate,
        usage,
        model: response.model,
    })
}

#[async_trait]
impl InferenceProvider for AnthropicProvider {
    fn model(&self) -> &str {
        &self.model
    }

    async fn extract(&self, text: &str) -> Result<ProviderResponse, LlmError> {
        let url = format!("{}/v1/messages", self.endpoint);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&self.request_body(text))
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

        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let result = interpret(body)?;
        info!(
            input_tokens = result.usage.input_tokens,
            output_tokens = result.usage.output_tokens,
            cache_read = result.usage.cache_read_input_tokens,
            cache_creation = result.usage.cache_creation_input_tokens,
            "Anthropic extraction call completed"
        );
        debug!("Candidate found: {}", result.candidate.is_some());

        Ok(result)
    }
}
