//! Schema mapping from the inference vocabulary to the domain vocabulary

use catalogue_domain::{CandidateRecord, CreateModel, RecordField};
use chrono::NaiveDate;
use serde_json::Value;
use thiserror::Error;

/// Why a candidate could not be mapped
///
/// Mapping only coerces types; anything semantic is the validation gate's job.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// Release date is not `YYYY-MM-DD`, `YYYY-MM` or `YYYY`, or not a real date
    #[error("release date '{0}' is not a valid ISO date")]
    UnparseableReleaseDate(String),

    /// Metadata present but not a JSON object
    #[error("metadata must be a JSON object, got {0}")]
    MetadataNotObject(String),
}

impl MappingError {
    /// Field the error refers to
    pub fn field(&self) -> RecordField {
        match self {
            MappingError::UnparseableReleaseDate(_) => RecordField::ReleaseDate,
            MappingError::MetadataNotObject(_) => RecordField::Metadata,
        }
    }
}

/// Map a candidate record into a create record
///
/// `model_name` becomes both the natural key and the display name; an absent
/// model name maps to the empty string. A blank release date is treated as
/// absent. Text fields are carried unchanged.
pub fn map_candidate(candidate: &CandidateRecord) -> Result<CreateModel, MappingError> {
    let name = candidate.model_name.clone().unwrap_or_default();

    let release_date = match candidate.release_date.as_deref() {
        Some(raw) if !raw.trim().is_empty() => Some(parse_release_date(raw)?),
        _ => None,
    };

    let metadata = match &candidate.metadata {
        None | Some(Value::Null) => None,
        Some(Value::Object(map)) => Some(map.clone()),
        Some(other) => return Err(MappingError::MetadataNotObject(json_kind(other).to_string())),
    };

    Ok(CreateModel {
        display_name: name.clone(),
        name,
        organization: candidate.organization.clone(),
        release_date,
        description: candidate.description.clone(),
        license: candidate.license.clone(),
        metadata,
    })
}

/// Parse an ISO release date, allowing month or year precision
///
/// `YYYY-MM` maps to the first of the month, `YYYY` to January 1st.
///
/// # Examples
///
/// ```
/// use catalogue_extractor::parse_release_date;
/// use chrono::NaiveDate;
///
/// assert_eq!(parse_release_date("2023-03").unwrap(), NaiveDate::from_ymd_opt(2023, 3, 1).unwrap());
/// assert!(parse_release_date("March 2023").is_err());
/// ```
pub fn parse_release_date(raw: &str) -> Result<NaiveDate, MappingError> {
    let s = raw.trim();
    let unparseable = || MappingError::UnparseableReleaseDate(raw.to_string());

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }

    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    let parts: Vec<&str> = s.split('-').collect();
    match parts.as_slice() {
        [year, month] if year.len() == 4 && month.len() == 2 && all_digits(year) && all_digits(month) => {
            let year = year.parse().map_err(|_| unparseable())?;
            let month = month.parse().map_err(|_| unparseable())?;
            NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(unparseable)
        }
        [year] if year.len() == 4 && all_digits(year) => {
            let year = year.parse().map_err(|_| unparseable())?;
            NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(unparseable)
        }
        _ => Err(unparseable()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
