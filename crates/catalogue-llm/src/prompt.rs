//! Prompt engineering for model-record extraction

use serde_json::{json, Value};

/// Name of the forced tool used for structured output
pub const TOOL_NAME: &str = "record_model";

/// Description attached to the structured-output tool
pub const TOOL_DESCRIPTION: &str =
    "Record the structured details of the AI/ML model described in the text.";

/// Instructions given to the inference service
///
/// Stable across requests so providers that support prompt caching can reuse it.
pub const SYSTEM_PROMPT: &str = r#"You are an expert at extracting structured information about AI/ML models from unstructured text.

Your task is to read the text and extract:
- model_name: the technical model identifier (e.g. "gpt-4", "llama-2-70b", "claude-3-opus")
- organization: the company or research group that created the model
- release_date: the release date in YYYY-MM-DD format
- description: a brief description of the model's capabilities
- license: the license type (e.g. "MIT", "Apache 2.0", "Proprietary")
- metadata: any other relevant details as a JSON object (parameters, context window, training data)

Rules:
- Only extract information that is explicitly stated in the text
- Use null for any field that is not mentioned
- Normalize model names to lowercase with hyphens (e.g. "GPT-4" becomes "gpt-4")
- Infer the release date from context when possible ("in March 2023" becomes "2023-03-01")
- Keep descriptions to one or two sentences
- If the text does not describe an AI/ML model, return null for every field"#;

/// Builds the per-request prompt for an extraction
pub struct PromptBuilder<'a> {
    text: &'a str,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder for the given input text
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    /// User turn carrying the text to analyze
    pub fn user_message(&self) -> String {
        format!("Extract model information from this text:\n\n{}", self.text)
    }

    /// Single-string prompt for providers without a separate system channel
    pub fn build(&self) -> String {
        let mut prompt = String::new();
        prompt.push_str(SYSTEM_PROMPT);
        prompt.push_str("\n\n");
        prompt.push_str(&self.user_message());
        prompt.push_str("\n\n");
        prompt.push_str(OUTPUT_FORMAT_REMINDER);
        prompt
    }
}

const OUTPUT_FORMAT_REMINDER: &str =
    "Respond with a single JSON object containing exactly these keys: model_name, organization, release_date, description, license, metadata. No additional text.";

/// JSON schema of the candidate record the service must produce
pub fn candidate_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "model_name": {
                "type": ["string", "null"],
                "description": "Technical model identifier, lowercase with hyphens"
            },
            "organization": {
                "type": ["string", "null"],
                "description": "Company or research group that created the model"
            },
            "release_date": {
                "type": ["string", "null"],
                "description": "Release date in YYYY-MM-DD format"
            },
            "description": {
                "type": ["string", "null"],
                "description": "Brief description of the model's capabilities"
            },
            "license": {
                "type": ["string", "null"],
                "description": "License type"
            },
            "metadata": {
                "type": ["object", "null"],
                "description": "Additional details such as parameters or context window"
            }
        },
        "required": ["model_name", "organization", "release_date", "description", "license", "metadata"]
    })
}
