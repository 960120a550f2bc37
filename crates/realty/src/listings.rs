//! Read-only browsing of the property collection.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ServiceError;
use crate::query::PropertyQuery;
use crate::schema::{Property, ValidationError};
use crate::store::{to_document, DocumentId, DocumentStore, PROPERTY_COLLECTION};

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const DEFAULT_MAX_PAGE_SIZE: usize = 100;

/// Stored property together with its store identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyListing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub property: Property,
}

/// Browse response body.
#[derive(Debug, Clone, Serialize)]
pub struct PropertyPage {
    pub items: Vec<PropertyListing>,
}

/// Service answering filtered browse requests against the store.
pub struct PropertyCatalog<S> {
    store: Arc<S>,
    max_page_size: usize,
}

impl<S> PropertyCatalog<S>
where
    S: DocumentStore + 'static,
{
    pub fn new(store: Arc<S>, max_page_size: usize) -> Self {
        Self {
            store,
            max_page_size: max_page_size.max(1),
        }
    }

    pub fn max_page_size(&self) -> usize {
        self.max_page_size
    }

    /// Returns at most `limit` matching properties in store order.
    pub fn browse(
        &self,
        query: &PropertyQuery,
        limit: Option<i64>,
    ) -> Result<PropertyPage, ServiceError> {
        let limit = self.resolve_limit(limit)?;
        let filter = query.filter();
        debug!(clauses = filter.clauses().len(), limit, "browsing properties");

        let documents = self
            .store
            .get_documents(PROPERTY_COLLECTION, &filter, limit)
            .inspect_err(|err| warn!(error = %err, "property query failed"))?;

        let items = documents
            .into_iter()
            .filter_map(|document| {
                let id = document.get("id").and_then(Value::as_str).map(str::to_owned);
                match serde_json::from_value::<PropertyListing>(Value::Object(document)) {
                    Ok(listing) => Some(listing),
                    Err(err) => {
                        warn!(id = ?id, error = %err, "skipping malformed property document");
                        None
                    }
                }
            })
            .collect();

        Ok(PropertyPage { items })
    }

    /// Validates and inserts properties, stopping at the first failure.
    pub fn seed<I>(&self, properties: I) -> Result<Vec<DocumentId>, ServiceError>
    where
        I: IntoIterator<Item = Property>,
    {
        let mut ids = Vec::new();
        for property in properties {
            let property = property.validated()?;
            let document = to_document(&property)?;
            ids.push(self.store.create_document(PROPERTY_COLLECTION, document)?);
        }
        Ok(ids)
    }

    fn resolve_limit(&self, limit: Option<i64>) -> Result<usize, ValidationError> {
        let requested = limit.unwrap_or(DEFAULT_PAGE_SIZE as i64);
        if requested < 1 {
            return Err(ValidationError::single(
                "property query",
                "limit",
                "must be at least 1",
            ));
        }

        let requested = usize::try_from(requested).unwrap_or(usize::MAX);
        Ok(requested.min(self.max_page_size))
    }
}
