//! Gatekeeper configuration

use crate::GatekeeperError;
use catalogue_domain::RecordField;
use serde::{Deserialize, Serialize};

/// Descriptive fields that can anchor a record besides its natural key
pub const DESCRIPTIVE_FIELDS: [RecordField; 4] = [
    RecordField::Organization,
    RecordField::ReleaseDate,
    RecordField::Description,
    RecordField::License,
];

/// Configuration for validation rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Fields of which at least one must be present besides the natural key
    pub anchor_fields: Vec<RecordField>,

    /// Maximum length in characters of short text fields
    /// (name, display name, organization, license); `None` disables the check
    pub max_field_length: Option<usize>,

    /// Reject records without a license
    pub require_license: bool,

    /// Reject records without a release date
    pub require_release_date: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            anchor_fields: vec![RecordField::Organization],
            max_field_length: Some(255),
            require_license: false,
            require_release_date: false,
        }
    }
}

impl ValidationConfig {
    /// Create a permissive configuration (any descriptive field anchors, no length limit)
    pub fn permissive() -> Self {
        Self {
            anchor_fields: DESCRIPTIVE_FIELDS.to_vec(),
            max_field_length: None,
            require_license: false,
            require_release_date: false,
        }
    }

    /// Create a strict configuration for production catalogues
    pub fn strict() -> Self {
        Self {
            anchor_fields: vec![RecordField::Organization],
            max_field_length: Some(255),
            require_license: true,
            require_release_date: true,
        }
    }

    /// Check the configuration for consistency
    pub fn validate(&self) -> Result<(), GatekeeperError> {
        if self.anchor_fields.is_empty() {
            return Err(GatekeeperError::Config(
                "anchor_fields must name at least one field".to_string(),
            ));
        }
        if self
            .anchor_fields
            .iter()
            .any(|f| matches!(f, RecordField::Name | RecordField::DisplayName))
        {
            return Err(GatekeeperError::Config(
                "the natural key cannot be an anchor field".to_string(),
            ));
        }
        if self.max_field_length == Some(0) {
            return Err(GatekeeperError::Config(
                "max_field_length must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ValidationConfig::default();
        assert_eq!(config.anchor_fields, vec![RecordField::Organization]);
        assert_eq!(config.max_field_length, Some(255));
        assert!(!config.require_license);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_permissive_config() {
        let config = ValidationConfig::permissive();
        assert_eq!(config.anchor_fields, DESCRIPTIVE_FIELDS.to_vec());
        assert_eq!(config.max_field_length, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_strict_config() {
        let config = ValidationConfig::strict();
        assert!(config.require_license);
        assert!(config.require_release_date);
    }

    #[test]
    fn test_invalid_configs() {
        let mut config = ValidationConfig::default();
        config.anchor_fields.push(RecordField::Name);
        assert!(config.validate().is_err());

        let config = ValidationConfig {
            anchor_fields: vec![RecordField::DisplayName],
            ..ValidationConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ValidationConfig {
            max_field_length: Some(0),
            ..ValidationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ValidationConfig = toml::from_str(
            r#"
            anchor_fields = ["organization", "license"]
            require_license = true
            "#,
        )
        .unwrap();

        assert_eq!(
            config.anchor_fields,
            vec![RecordField::Organization, RecordField::License]
        );
        assert!(config.require_license);
        assert_eq!(config.max_field_length, Some(255));
    }

    #[test]
    fn test_empty_anchor_list_rejected() {
        let config: ValidationConfig = toml::from_str("anchor_fields = []").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("anchor_fields"));
    }
}
