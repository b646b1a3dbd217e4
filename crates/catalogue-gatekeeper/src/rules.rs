//! Pluggable business rules

use crate::validator::{FieldViolation, ViolationReason};
use catalogue_domain::{CreateModel, RecordField};

/// A business rule evaluated after the structural checks
///
/// Rules must be pure: same record, same verdict.
pub trait BusinessRule: Send + Sync {
    /// Short identifier reported in violations
    fn name(&self) -> &str;

    /// Check a record, returning every violation found
    fn check(&self, record: &CreateModel) -> Vec<FieldViolation>;
}

/// Business rule backed by a closure
///
/// The predicate returns `true` when the record is acceptable.
///
/// # Examples
///
/// ```
/// use catalogue_domain::{CreateModel, RecordField};
/// use catalogue_gatekeeper::{BusinessRule, PredicateRule};
///
/// let rule = PredicateRule::new(
///     "lowercase_name",
///     RecordField::Name,
///     "model names must be lowercase",
///     |r: &CreateModel| r.name == r.name.to_lowercase(),
/// );
///
/// assert!(rule.check(&CreateModel::named("gpt-4")).is_empty());
/// assert_eq!(rule.check(&CreateModel::named("GPT-4")).len(), 1);
/// ```
pub struct PredicateRule<F> {
    name: String,
    field: RecordField,
    message: String,
    predicate: F,
}

impl<F> PredicateRule<F>
where
    F: Fn(&CreateModel) -> bool + Send + Sync,
{
    /// Create a rule from a predicate
    pub fn new(
        name: impl Into<String>,
        field: RecordField,
        message: impl Into<String>,
        predicate: F,
    ) -> Self {
        Self {
            name: name.into(),
            field,
            message: message.into(),
            predicate,
        }
    }
}

impl<F> BusinessRule for PredicateRule<F>
where
    F: Fn(&CreateModel) -> bool + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, record: &CreateModel) -> Vec<FieldViolation> {
        if (self.predicate)(record) {
            Vec::new()
        } else {
            vec![FieldViolation::new(
                self.field,
                ViolationReason::Rule {
                    rule: self.name.clone(),
                    message: self.message.clone(),
                },
            )]
        }
    }
}

/// Built-in length limit on short text fields
pub(crate) struct MaxLength {
    pub(crate) max: usize,
}

impl BusinessRule for MaxLength {
    fn name(&self) -> &str {
        "max_field_length"
    }

    fn check(&self, record: &CreateModel) -> Vec<FieldViolation> {
        [
            RecordField::Name,
            RecordField::DisplayName,
            RecordField::Organization,
            RecordField::License,
        ]
        .into_iter()
        .filter_map(|field| {
            let actual = record.text(field)?.chars().count();
            (actual > self.max).then(|| {
                FieldViolation::new(
                    field,
                    ViolationReason::TooLong {
                        max: self.max,
                        actual,
                    },
                )
            })
        })
        .collect()
    }
}

/// Built-in requirement that a field is present
pub(crate) struct Required {
    pub(crate) field: RecordField,
}

impl BusinessRule for Required {
    fn name(&self) -> &str {
        "required_field"
    }

    fn check(&self, record: &CreateModel) -> Vec<FieldViolation> {
        if record.has_value(self.field) {
            Vec::new()
        } else {
            vec![FieldViolation::new(self.field, ViolationReason::Missing)]
        }
    }
}
