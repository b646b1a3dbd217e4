//! Record validation logic

use crate::rules::{BusinessRule, MaxLength, PredicateRule, Required};
use crate::{ValidationConfig, DESCRIPTIVE_FIELDS};
use catalogue_domain::{CreateModel, RecordField};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Why a field was rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViolationReason {
    /// Required value absent or blank
    Missing,

    /// Value longer than allowed
    TooLong {
        /// Maximum length in characters
        max: usize,
        /// Actual length in characters
        actual: usize,
    },

    /// A business rule rejected the record
    Rule {
        /// Rule identifier
        rule: String,
        /// Human-readable explanation
        message: String,
    },
}

/// A field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Offending field
    pub field: RecordField,

    /// Reason for the rejection
    #[serde(flatten)]
    pub reason: ViolationReason,
}

impl FieldViolation {
    /// Create a violation
    pub fn new(field: RecordField, reason: ViolationReason) -> Self {
        Self { field, reason }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            ViolationReason::Missing => write!(f, "{}: missing", self.field),
            ViolationReason::TooLong { max, actual } => {
                write!(f, "{}: {} characters exceeds limit of {}", self.field, actual, max)
            }
            ViolationReason::Rule { rule, message } => {
                write!(f, "{}: {} ({})", self.field, message, rule)
            }
        }
    }
}

/// Outcome of validating a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// Record may be persisted
    Valid,

    /// Record rejected; lists every violation found
    Invalid(Vec<FieldViolation>),
}

impl ValidationOutcome {
    /// Whether the record passed validation
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid)
    }

    /// Violations found (empty when valid)
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            ValidationOutcome::Valid => &[],
            ValidationOutcome::Invalid(violations) => violations,
        }
    }
}

/// The Gatekeeper validates records before storage
pub struct Gatekeeper {
    config: ValidationConfig,
    rules: Vec<Box<dyn BusinessRule>>,
}

impl Gatekeeper {
    /// Create a new Gatekeeper with the given configuration
    pub fn new(config: ValidationConfig) -> Self {
        let mut rules: Vec<Box<dyn BusinessRule>> = Vec::new();
        if let Some(max) = config.max_field_length {
            rules.push(Box::new(MaxLength { max }));
        }
        if config.require_release_date {
            rules.push(Box::new(Required {
                field: RecordField::ReleaseDate,
            }));
        }
        if config.require_license {
            rules.push(Box::new(Required {
                field: RecordField::License,
            }));
        }

        Self { config, rules }
    }

    /// Create a Gatekeeper with default configuration
    pub fn default_config() -> Self {
        Self::new(ValidationConfig::default())
    }

    /// Add a business rule
    pub fn with_rule(mut self, rule: impl BusinessRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Add a business rule backed by a closure returning `true` for acceptable records
    pub fn with_predicate<F>(
        self,
        name: impl Into<String>,
        field: RecordField,
        message: impl Into<String>,
        predicate: F,
    ) -> Self
    where
        F: Fn(&CreateModel) -> bool + Send + Sync + 'static,
    {
        self.with_rule(PredicateRule::new(name, field, message, predicate))
    }

    /// Get the active configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate a record against the structural checks and every business rule
    pub fn validate(&self, record: &CreateModel) -> ValidationOutcome {
        let mut violations = Vec::new();

        // 1. Natural key
        if !record.has_value(RecordField::Name) {
            violations.push(FieldViolation::new(RecordField::Name, ViolationReason::Missing));
        }

        // 2. At least one anchor field; an empty list falls back to any descriptive field
        let anchors: &[RecordField] = if self.config.anchor_fields.is_empty() {
            &DESCRIPTIVE_FIELDS
        } else {
            &self.config.anchor_fields
        };
        if !anchors.iter().any(|f| record.has_value(*f)) {
            violations.extend(
                anchors
                    .iter()
                    .map(|f| FieldViolation::new(*f, ViolationReason::Missing)),
            );
        }

        // 3. Business rules
        for rule in &self.rules {
            let found = rule.check(record);
            if !found.is_empty() {
                debug!("Rule '{}' reported {} violation(s)", rule.name(), found.len());
            }
            violations.extend(found);
        }

        if violations.is_empty() {
            ValidationOutcome::Valid
        } else {
            ValidationOutcome::Invalid(violations)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_record() -> CreateModel {
        let mut record = CreateModel::named("gpt-4");
        record.organization = Some("OpenAI".to_string());
        record
    }

    #[test]
    fn test_valid_record() {
        let gatekeeper = Gatekeeper::default_config();
        assert_eq!(gatekeeper.validate(&create_test_record()), ValidationOutcome::Valid);
    }

    #[test]
    fn test_missing_name() {
        let gatekeeper = Gatekeeper::default_config();
        let mut record = create_test_record();
        record.name = "  ".to_string();

        let outcome = gatekeeper.validate(&record);
        assert_eq!(
            outcome.violations(),
            &[FieldViolation::new(RecordField::Name, ViolationReason::Missing)]
        );
    }

    #[test]
    fn test_missing_anchor() {
        let gatekeeper = Gatekeeper::default_config();
        let record = CreateModel::named("gpt-4");

        let outcome = gatekeeper.validate(&record);
        assert_eq!(
            outcome.violations(),
            &[FieldViolation::new(RecordField::Organization, ViolationReason::Missing)]
        );
    }

    #[test]
    fn test_any_anchor_suffices() {
        let config = ValidationConfig {
            anchor_fields: vec![RecordField::Organization, RecordField::License],
            ..ValidationConfig::default()
        };
        let gatekeeper = Gatekeeper::new(config);

        let mut record = CreateModel::named("llama-2");
        record.license = Some("Llama 2 Community License".to_string());
        assert!(gatekeeper.validate(&record).is_valid());
    }

    #[test]
    fn test_multiple_validation_errors() {
        let gatekeeper = Gatekeeper::default_config();
        let record = CreateModel::default();

        let outcome = gatekeeper.validate(&record);
        let fields: Vec<_> = outcome.violations().iter().map(|v| v.field).collect();
        assert_eq!(fields, vec![RecordField::Name, RecordField::Organization]);
    }

    #[test]
    fn test_too_long_fields() {
        let gatekeeper = Gatekeeper::default_config();
        let mut record = create_test_record();
        record.organization = Some("o".repeat(256));

        let outcome = gatekeeper.validate(&record);
        assert_eq!(
            outcome.violations(),
            &[FieldViolation::new(
                RecordField::Organization,
                ViolationReason::TooLong { max: 255, actual: 256 }
            )]
        );
    }

    #[test]
    fn test_strict_config_requires_license_and_date() {
        let gatekeeper = Gatekeeper::new(ValidationConfig::strict());

        let outcome = gatekeeper.validate(&create_test_record());
        let fields: Vec<_> = outcome.violations().iter().map(|v| v.field).collect();
        assert_eq!(fields, vec![RecordField::ReleaseDate, RecordField::License]);
    }

    #[test]
    fn test_permissive_config() {
        let gatekeeper = Gatekeeper::new(ValidationConfig::permissive());

        let mut record = CreateModel::named("x".repeat(300));
        record.description = Some("A model with a very long name".to_string());
        assert!(gatekeeper.validate(&record).is_valid());

        let outcome = gatekeeper.validate(&CreateModel::named("bare-name"));
        let fields: Vec<_> = outcome.violations().iter().map(|v| v.field).collect();
        assert_eq!(fields, DESCRIPTIVE_FIELDS.to_vec());
    }

    #[test]
    fn test_name_alone_rejected_with_empty_anchor_list() {
        let config = ValidationConfig {
            anchor_fields: Vec::new(),
            ..ValidationConfig::permissive()
        };
        let gatekeeper = Gatekeeper::new(config);

        let outcome = gatekeeper.validate(&CreateModel::named("Model X"));
        assert!(!outcome.is_valid());
        assert!(outcome
            .violations()
            .iter()
            .all(|v| v.reason == ViolationReason::Missing && v.field != RecordField::Name));

        let mut record = CreateModel::named("Model X");
        record.license = Some("MIT".to_string());
        assert!(gatekeeper.validate(&record).is_valid());
    }

    #[test]
    fn test_custom_predicate_runs_after_structural_checks() {
        let gatekeeper = Gatekeeper::default_config().with_predicate(
            "no_spaces",
            RecordField::Name,
            "model names must not contain spaces",
            |r: &CreateModel| !r.name.contains(' '),
        );

        let mut record = CreateModel::named("gpt 4");
        let outcome = gatekeeper.validate(&record);
        assert_eq!(outcome.violations().len(), 2);
        assert_eq!(outcome.violations()[0].field, RecordField::Organization);
        assert!(matches!(
            &outcome.violations()[1].reason,
            ViolationReason::Rule { rule, .. } if rule == "no_spaces"
        ));

        record.name = "gpt-4".to_string();
        record.organization = Some("OpenAI".to_string());
        assert!(gatekeeper.validate(&record).is_valid());
    }

    #[test]
    fn test_validation_is_deterministic() {
        let gatekeeper = Gatekeeper::new(ValidationConfig::strict());
        let record = CreateModel::default();

        assert_eq!(gatekeeper.validate(&record), gatekeeper.validate(&record));
    }

    #[test]
    fn test_violation_wire_format() {
        let violation = FieldViolation::new(
            RecordField::Name,
            ViolationReason::TooLong { max: 255, actual: 300 },
        );
        let json = serde_json::to_value(&violation).unwrap();

        assert_eq!(json["field"], "name");
        assert_eq!(json["kind"], "too_long");
        assert_eq!(json["max"], 255);
        assert_eq!(violation.to_string(), "name: 300 characters exceeds limit of 255");
    }
}
