//! Model records - the persisted unit of the catalogue

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned identifier of a model record
///
/// Identifiers are assigned by the record store on creation and are never
/// reused for a different record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(i64);

impl ModelId {
    /// Wrap a raw identifier value
    ///
    /// This is primarily for storage layer deserialization.
    ///
    /// # Examples
    ///
    /// ```
    /// use catalogue_domain::ModelId;
    ///
    /// let id = ModelId::from_value(42);
    /// assert_eq!(id.value(), 42);
    /// assert_eq!(id.to_string(), "42");
    /// ```
    pub fn from_value(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw identifier value
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A catalogue entry describing one AI model
///
/// The `name` is the natural key: it is unique across all live records and
/// compared exactly (case-sensitive, no whitespace normalization).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRecord {
    /// Store-assigned identifier
    pub id: ModelId,

    /// Technical model identifier (natural key)
    pub name: String,

    /// Human-facing name
    pub display_name: String,

    /// Organization that created the model
    pub organization: Option<String>,

    /// Release date
    pub release_date: Option<NaiveDate>,

    /// Brief description of model capabilities
    pub description: Option<String>,

    /// License type (e.g. "Apache 2.0", "Proprietary")
    pub license: Option<String>,

    /// Free-form metadata (pricing, context window, capabilities, ...)
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,

    /// When the record was created (store-managed)
    pub created_at: DateTime<Utc>,

    /// When the record was last modified (store-managed)
    pub updated_at: DateTime<Utc>,
}

/// The create vocabulary of the catalogue
///
/// Everything a [`ModelRecord`] holds except the store-managed identifier and
/// timestamps. An absent natural key is represented by an empty `name`; the
/// validation gate rejects it before it reaches the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateModel {
    /// Technical model identifier (natural key)
    pub name: String,

    /// Human-facing name
    pub display_name: String,

    /// Organization that created the model
    pub organization: Option<String>,

    /// Release date
    pub release_date: Option<NaiveDate>,

    /// Brief description
    pub description: Option<String>,

    /// License type
    pub license: Option<String>,

    /// Free-form metadata
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

impl CreateModel {
    /// Create a record with the given natural key and everything else absent
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            ..Self::default()
        }
    }

    /// Textual value of a field, if the field is textual and present
    ///
    /// Dates and metadata are not textual and always return `None`.
    pub fn text(&self, field: RecordField) -> Option<&str> {
        match field {
            RecordField::Name => Some(self.name.as_str()),
            RecordField::DisplayName => Some(self.display_name.as_str()),
            RecordField::Organization => self.organization.as_deref(),
            RecordField::Description => self.description.as_deref(),
            RecordField::License => self.license.as_deref(),
            RecordField::ReleaseDate | RecordField::Metadata => None,
        }
    }

    /// Whether a field carries a usable value (present and not blank)
    pub fn has_value(&self, field: RecordField) -> bool {
        match field {
            RecordField::ReleaseDate => self.release_date.is_some(),
            RecordField::Metadata => self.metadata.as_ref().is_some_and(|m| !m.is_empty()),
            _ => self.text(field).is_some_and(|s| !s.trim().is_empty()),
        }
    }
}

/// Partial update of an existing record
///
/// Used by CRUD collaborators; the ingestion pipeline never updates records.
/// `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateModel {
    /// New natural key
    pub name: Option<String>,
    /// New display name
    pub display_name: Option<String>,
    /// New organization
    pub organization: Option<String>,
    /// New release date
    pub release_date: Option<NaiveDate>,
    /// New description
    pub description: Option<String>,
    /// New license
    pub license: Option<String>,
    /// Replacement metadata
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

impl UpdateModel {
    /// Whether the update changes nothing
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Named fields of a model record, used in field-level diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordField {
    /// The natural key
    Name,
    /// Human-facing name
    DisplayName,
    /// Creating organization
    Organization,
    /// Release date
    ReleaseDate,
    /// Description
    Description,
    /// License
    License,
    /// Metadata object
    Metadata,
}

impl RecordField {
    /// Get the field name as used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordField::Name => "name",
            RecordField::DisplayName => "display_name",
            RecordField::Organization => "organization",
            RecordField::ReleaseDate => "release_date",
            RecordField::Description => "description",
            RecordField::License => "license",
            RecordField::Metadata => "metadata",
        }
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
