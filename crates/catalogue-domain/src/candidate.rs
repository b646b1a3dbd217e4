//! Candidate records produced by the inference step

use serde::{Deserialize, Serialize};

/// Unvalidated structured output of the inference service
///
/// This is a closed schema: every field the extraction service may produce is
/// listed here and each one is optional. The release date is kept as the raw
/// string the service produced; coercion into a calendar date happens in the
/// schema mapper. A candidate whose fields are all absent or blank carries no
/// usable information and is treated as "nothing found".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    /// Technical model identifier (e.g. "gpt-4")
    #[serde(default)]
    pub model_name: Option<String>,

    /// Organization that created the model
    #[serde(default)]
    pub organization: Option<String>,

    /// Release date as produced by the service (ISO format expected)
    #[serde(default)]
    pub release_date: Option<String>,

    /// Brief description of model capabilities
    #[serde(default)]
    pub description: Option<String>,

    /// License type
    #[serde(default)]
    pub license: Option<String>,

    /// Additional details as a JSON value
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl CandidateRecord {
    /// Create a candidate with only the model name set
    pub fn named(model_name: impl Into<String>) -> Self {
        Self {
            model_name: Some(model_name.into()),
            ..Self::default()
        }
    }

    /// Set the organization
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    /// Set the raw release date
    pub fn with_release_date(mut self, release_date: impl Into<String>) -> Self {
        self.release_date = Some(release_date.into());
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the license
    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = Some(license.into());
        self
    }

    /// Set the metadata value
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Whether every field is absent, blank or JSON null
    pub fn is_empty(&self) -> bool {
        [
            &self.model_name,
            &self.organization,
            &self.release_date,
            &self.description,
            &self.license,
        ]
        .iter()
        .all(|field| is_blank(field))
            && self.metadata.as_ref().map_or(true, |m| m.is_null())
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |s| s.trim().is_empty())
}
