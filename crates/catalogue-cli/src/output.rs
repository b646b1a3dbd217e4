//! Output formatting for the CLI.

use crate::cli::OutputFormat;
use crate::error::Result;
use catalogue_domain::{ModelRecord, Provenance};
use catalogue_extractor::Rejection;
use colored::{Color, Colorize};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a single record.
    pub fn format_record(&self, record: &ModelRecord) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
            OutputFormat::Text => Ok(self.record_text(record)),
        }
    }

    /// Format the result of a successful extraction.
    pub fn format_created(&self, record: &ModelRecord, provenance: &Provenance) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let value = serde_json::json!({
                    "record": record,
                    "tokens_used": provenance.tokens_used,
                    "model_used": provenance.model_used,
                    "cached": provenance.cached,
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Text => {
                let mut lines = vec![
                    self.success(&format!("Created model '{}' (id {})", record.name, record.id)),
                    self.record_text(record),
                ];
                let mut usage = format!(
                    "{} tokens via {}",
                    provenance.tokens_used, provenance.model_used
                );
                if provenance.cached {
                    usage.push_str(" (cached)");
                }
                lines.push(self.colorize(&usage, Color::Cyan));
                Ok(lines.join("\n"))
            }
        }
    }

    /// Format a pipeline rejection.
    pub fn format_rejection(&self, rejection: &Rejection) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let mut value = serde_json::json!({
                    "error_kind": rejection.kind,
                    "detail": rejection.detail,
                    "rejected_at": rejection.rejected_at,
                });
                if let Some(id) = rejection.existing_id {
                    value["existing_id"] = serde_json::json!(id);
                }
                if !rejection.violations.is_empty() {
                    value["violations"] = serde_json::to_value(&rejection.violations)?;
                }
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Text => {
                let mut lines = vec![self.error(&rejection.to_string())];
                for violation in &rejection.violations {
                    lines.push(format!("  - {}", violation));
                }
                if let Some(id) = rejection.existing_id {
                    lines.push(self.info(&format!("Existing record: id {}", id)));
                }
                Ok(lines.join("\n"))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), Color::Green)
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), Color::Red)
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), Color::Blue)
    }

    fn record_text(&self, record: &ModelRecord) -> String {
        let mut rows = vec![
            ("Name", record.name.clone()),
            ("Display name", record.display_name.clone()),
        ];
        let optional = [
            ("Organization", record.organization.clone()),
            ("Released", record.release_date.map(|d| d.to_string())),
            ("License", record.license.clone()),
            ("Description", record.description.clone()),
        ];
        rows.extend(optional.into_iter().filter_map(|(label, v)| v.map(|v| (label, v))));
        if let Some(metadata) = &record.metadata {
            rows.push(("Metadata", serde_json::Value::Object(metadata.clone()).to_string()));
        }
        rows.push(("Created", record.created_at.to_rfc3339()));

        rows.iter()
            .map(|(label, value)| {
                format!("  {} {}", self.colorize(&format!("{:<13}", label), Color::Yellow), value)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: Color) -> String {
        if !self.color_enabled {
            return text.to_string();
        }
        text.color(color).to_string()
    }
}
