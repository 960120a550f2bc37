use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use uuid::Uuid;

use super::{Document, DocumentId, DocumentStore, Filter, StoreError};

const DEFAULT_STORE_NAME: &str = "realty";

/// Process-local document store. Collections are created on first insert and keep
/// insertion order.
#[derive(Debug)]
pub struct InMemoryDocumentStore {
    name: String,
    collections: RwLock<BTreeMap<String, Vec<Document>>>,
}

impl InMemoryDocumentStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collections: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of documents held in `collection`.
    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .map(|guard| guard.get(collection).map_or(0, Vec::len))
            .unwrap_or(0)
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new(DEFAULT_STORE_NAME)
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("collection lock poisoned".to_string())
}

impl DocumentStore for InMemoryDocumentStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn create_document(
        &self,
        collection: &str,
        mut record: Document,
    ) -> Result<DocumentId, StoreError> {
        let id = DocumentId(Uuid::new_v4().to_string());
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        record.insert("id".to_string(), Value::String(id.0.clone()));
        record.insert("created_at".to_string(), Value::String(now.clone()));
        record.insert("updated_at".to_string(), Value::String(now));

        let mut guard = self.collections.write().map_err(|_| poisoned())?;
        guard.entry(collection.to_string()).or_default().push(record);
        Ok(id)
    }

    fn get_documents(
        &self,
        collection: &str,
        filter: &Filter,
        limit: usize,
    ) -> Result<Vec<Document>, StoreError> {
        let guard = self.collections.read().map_err(|_| poisoned())?;
        let Some(documents) = guard.get(collection) else {
            return Ok(Vec::new());
        };

        Ok(documents
            .iter()
            .filter(|document| filter.matches(document))
            .take(limit)
            .cloned()
            .collect())
    }

    fn list_collection_names(&self) -> Result<Vec<String>, StoreError> {
        let guard = self.collections.read().map_err(|_| poisoned())?;
        Ok(guard.keys().cloned().collect())
    }
}
