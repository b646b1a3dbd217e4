//! Parse service output into candidate records

use crate::LlmError;
use catalogue_domain::CandidateRecord;
use serde_json::{Map, Value};

/// Parse a free-text response into a candidate
///
/// Returns `Ok(None)` when the service reported nothing (`null`, or an object
/// whose fields are all null).
pub fn parse_candidate_text(response: &str) -> Result<Option<CandidateRecord>, LlmError> {
    let json_str = extract_json(response)?;

    let json: Value = serde_json::from_str(&json_str)
        .map_err(|e| LlmError::InvalidResponse(format!("JSON parse error: {}", e)))?;

    parse_candidate_value(&json)
}

/// Parse an already-decoded JSON value into a candidate
pub fn parse_candidate_value(json: &Value) -> Result<Option<CandidateRecord>, LlmError> {
    let obj = match json {
        Value::Null => return Ok(None),
        Value::Object(obj) => obj,
        _ => {
            return Err(LlmError::InvalidResponse(
                "Expected a JSON object".to_string(),
            ))
        }
    };

    let candidate = CandidateRecord {
        model_name: string_field(obj, "model_name")?,
        organization: string_field(obj, "organization")?,
        release_date: date_field(obj)?,
        description: string_field(obj, "description")?,
        license: string_field(obj, "license")?,
        metadata: obj.get("metadata").filter(|v| !v.is_null()).cloned(),
    };

    if candidate.is_empty() {
        Ok(None)
    } else {
        Ok(Some(candidate))
    }
}

/// Extract JSON from response, handling markdown code blocks
fn extract_json(response: &str) -> Result<String, LlmError> {
    let trimmed = response.trim();

    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(LlmError::InvalidResponse("Empty code block".to_string()));
        }

        // Skip the opening fence and the closing fence
        let json_lines = &lines[1..lines.len().saturating_sub(1)];
        Ok(json_lines.join("\n"))
    } else {
        Ok(trimmed.to_string())
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Result<Option<String>, LlmError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(LlmError::InvalidResponse(format!(
            "Field '{}' must be a string, got {}",
            key, other
        ))),
    }
}

// Services occasionally emit a bare year as a number.
fn date_field(obj: &Map<String, Value>) -> Result<Option<String>, LlmError> {
    match obj.get("release_date") {
        Some(Value::Number(n)) if n.is_u64() => Ok(Some(n.to_string())),
        _ => string_field(obj, "release_date"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_valid_json() {
        let response = r#"{
            "model_name": "gpt-4",
            "organization": "OpenAI",
            "release_date": "2023-03-14",
            "description": "A large multimodal model",
            "license": "Proprietary",
            "metadata": {"context_window": 8192}
        }"#;

        let candidate = parse_candidate_text(response).unwrap().unwrap();
        assert_eq!(candidate.model_name.as_deref(), Some("gpt-4"));
        assert_eq!(candidate.organization.as_deref(), Some("OpenAI"));
        assert_eq!(candidate.release_date.as_deref(), Some("2023-03-14"));
        assert_eq!(candidate.metadata, Some(json!({"context_window": 8192})));
    }

    #[test]
    fn test_parse_json_with_markdown_wrapper() {
        let response = "```json\n{\"model_name\": \"llama-2\", \"organization\": \"Meta\"}\n```";

        let candidate = parse_candidate_text(response).unwrap().unwrap();
        assert_eq!(candidate.model_name.as_deref(), Some("llama-2"));
        assert_eq!(candidate.organization.as_deref(), Some("Meta"));
        assert!(candidate.license.is_none());
    }

    #[test]
    fn test_null_response_is_nothing_found() {
        assert!(parse_candidate_text("null").unwrap().is_none());
    }

    #[test]
    fn test_all_null_fields_is_nothing_found() {
        let response = r#"{"model_name": null, "organization": null, "release_date": null,
                           "description": null, "license": null, "metadata": null}"#;
        assert!(parse_candidate_text(response).unwrap().is_none());
    }

    #[test]
    fn test_numeric_year_is_accepted() {
        let value = json!({"model_name": "bert", "release_date": 2018});
        let candidate = parse_candidate_value(&value).unwrap().unwrap();
        assert_eq!(candidate.release_date.as_deref(), Some("2018"));
    }

    #[test]
    fn test_non_string_field_is_invalid() {
        let value = json!({"model_name": ["gpt-4"]});
        assert!(matches!(
            parse_candidate_value(&value),
            Err(LlmError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_invalid_json() {
        let result = parse_candidate_text("The model is GPT-4");
        assert!(matches!(result, Err(LlmError::InvalidResponse(_))));
    }

    #[test]
    fn test_array_is_invalid() {
        assert!(parse_candidate_text("[]").is_err());
    }
}
