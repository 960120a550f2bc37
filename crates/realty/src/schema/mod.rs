//! Record shapes persisted by the service and the checks that guard them.

mod inquiry;
mod property;

use serde::Serialize;
use std::fmt;

pub use inquiry::{Inquiry, LeadSubmission, DEFAULT_LEAD_SOURCE};
pub use property::{Property, DEFAULT_CITY, DEFAULT_STATUS};

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Validation failure naming every offending field of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    record: &'static str,
    fields: Vec<FieldError>,
}

impl ValidationError {
    pub fn new(record: &'static str) -> Self {
        Self {
            record,
            fields: Vec::new(),
        }
    }

    pub fn single(
        record: &'static str,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let mut error = Self::new(record);
        error.push(field, message);
        error
    }

    pub(crate) fn from_validator(record: &'static str, errors: &validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, failures)| {
                let field = field.to_string();
                failures.iter().map(move |failure| FieldError {
                    field: field.clone(),
                    message: failure
                        .message
                        .as_ref()
                        .map(|message| message.to_string())
                        .unwrap_or_else(|| failure.code.to_string()),
                })
            })
            .collect();
        fields.sort_by(|left, right| left.field.cmp(&right.field));

        Self { record, fields }
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn record(&self) -> &'static str {
        self.record
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.fields
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|error| error.field == field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}", self.record)?;
        for (index, error) in self.fields.iter().enumerate() {
            let separator = if index == 0 { ": " } else { "; " };
            write!(f, "{separator}{} {}", error.field, error.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Trims a required text field in place.
pub(crate) fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

/// Trims an optional text field, dropping it when nothing is left.
pub(crate) fn trim_optional(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
