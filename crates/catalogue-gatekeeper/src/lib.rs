//! Catalogue Gatekeeper
//!
//! Validates create records before they reach the record store.
//!
//! The Gatekeeper provides:
//! - Structural checks (natural key, anchor fields)
//! - Built-in business rules (field length limits, required fields)
//! - Pluggable business rules (trait objects or closures)
//!
//! Validation never performs I/O and reports every violation it finds.
//!
//! # Examples
//!
//! ```
//! use catalogue_domain::CreateModel;
//! use catalogue_gatekeeper::{Gatekeeper, ValidationConfig};
//!
//! let gatekeeper = Gatekeeper::new(ValidationConfig::default());
//!
//! let mut record = CreateModel::named("gpt-4");
//! record.organization = Some("OpenAI".to_string());
//! assert!(gatekeeper.validate(&record).is_valid());
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod rules;
mod validator;

pub use config::{ValidationConfig, DESCRIPTIVE_FIELDS};
pub use error::GatekeeperError;
pub use rules::{BusinessRule, PredicateRule};
pub use validator::{FieldViolation, Gatekeeper, ValidationOutcome, ViolationReason};
