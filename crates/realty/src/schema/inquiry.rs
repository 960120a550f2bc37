use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{trim_optional, ValidationError};

pub const DEFAULT_LEAD_SOURCE: &str = "website";

/// Contact form payload as received. Required fields are optional here so that a
/// missing value is reported as a field error rather than a decode failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadSubmission {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub interested_location: Option<String>,
    #[serde(default)]
    pub budget_in_inr: Option<i64>,
    #[serde(default)]
    pub property_type: Option<String>,
}

/// Lead held in the `inquiry` collection. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Inquiry {
    #[validate(length(min = 1, message = "is required"))]
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub interested_location: Option<String>,
    #[validate(range(min = 0, message = "must be zero or greater"))]
    pub budget_in_inr: Option<i64>,
    pub property_type: Option<String>,
    #[serde(default = "default_source")]
    pub source: String,
}

fn default_source() -> String {
    DEFAULT_LEAD_SOURCE.to_string()
}

impl Inquiry {
    /// Normalizes a submission and checks it against the inquiry constraints.
    pub fn from_submission(submission: LeadSubmission) -> Result<Self, ValidationError> {
        let inquiry = Self {
            name: trim_optional(submission.name).unwrap_or_default(),
            email: trim_optional(submission.email).unwrap_or_default(),
            phone: trim_optional(submission.phone),
            message: trim_optional(submission.message),
            interested_location: trim_optional(submission.interested_location),
            budget_in_inr: submission.budget_in_inr,
            property_type: trim_optional(submission.property_type),
            source: default_source(),
        };

        inquiry
            .validate()
            .map_err(|errors| ValidationError::from_validator("inquiry", &errors))?;
        Ok(inquiry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> LeadSubmission {
        LeadSubmission {
            name: Some("Priya Reddy".to_string()),
            email: Some("priya@example.in".to_string()),
            phone: Some("+91 98480 22338".to_string()),
            message: Some("Looking for a 3BHK".to_string()),
            interested_location: Some("Kondapur".to_string()),
            budget_in_inr: Some(9_500_000),
            property_type: Some("Apartment".to_string()),
        }
    }

    #[test]
    fn valid_submission_defaults_source() {
        let inquiry = Inquiry::from_submission(submission()).expect("valid lead");
        assert_eq!(inquiry.source, "website");
        assert_eq!(inquiry.name, "Priya Reddy");
        assert_eq!(inquiry.budget_in_inr, Some(9_500_000));
    }

    #[test]
    fn malformed_email_is_rejected() {
        let mut lead = submission();
        lead.email = Some("not-an-email".to_string());

        let error = Inquiry::from_submission(lead).expect_err("invalid email");
        assert!(error.has_field("email"));
        assert_eq!(error.fields().len(), 1);
    }

    #[test]
    fn missing_required_fields_are_all_reported() {
        let error = Inquiry::from_submission(LeadSubmission::default()).expect_err("empty lead");
        assert!(error.has_field("name"));
        assert!(error.has_field("email"));
    }

    #[test]
    fn blank_name_counts_as_missing() {
        let mut lead = submission();
        lead.name = Some("   ".to_string());
        let error = Inquiry::from_submission(lead).expect_err("blank name");
        assert!(error.has_field("name"));
    }

    #[test]
    fn negative_budget_is_rejected() {
        let mut lead = submission();
        lead.budget_in_inr = Some(-5);
        let error = Inquiry::from_submission(lead).expect_err("negative budget");
        assert!(error.has_field("budget_in_inr"));
    }

    #[test]
    fn optional_text_is_trimmed_and_blank_dropped() {
        let mut lead = submission();
        lead.email = Some("  priya@example.in ".to_string());
        lead.phone = Some("   ".to_string());
        lead.message = None;

        let inquiry = Inquiry::from_submission(lead).expect("valid lead");
        assert_eq!(inquiry.email, "priya@example.in");
        assert!(inquiry.phone.is_none());
        assert!(inquiry.message.is_none());
    }
}
