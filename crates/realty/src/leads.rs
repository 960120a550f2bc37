//! Contact-form intake: validate, normalize, persist once.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::error::ServiceError;
use crate::schema::{Inquiry, LeadSubmission};
use crate::store::{to_document, DocumentId, DocumentStore, INQUIRY_COLLECTION};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    Received,
}

/// Acknowledgement returned to the submitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadReceipt {
    pub id: DocumentId,
    pub status: LeadStatus,
}

/// Service turning form submissions into stored inquiries.
pub struct LeadIntake<S> {
    store: Arc<S>,
}

impl<S> LeadIntake<S>
where
    S: DocumentStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Persists the submission as a new inquiry. Identical submissions are stored
    /// independently; there is no retry and no deduplication.
    pub fn submit(&self, submission: LeadSubmission) -> Result<LeadReceipt, ServiceError> {
        let inquiry = Inquiry::from_submission(submission)?;
        let document = to_document(&inquiry)?;

        let id = self
            .store
            .create_document(INQUIRY_COLLECTION, document)
            .inspect_err(|err| warn!(error = %err, "failed to persist inquiry"))?;

        info!(
            inquiry_id = %id,
            source = %inquiry.source,
            has_budget = inquiry.budget_in_inr.is_some(),
            "inquiry received"
        );

        Ok(LeadReceipt {
            id,
            status: LeadStatus::Received,
        })
    }
}
