//! Document store seam shared by the browse and intake services.

pub mod filter;
mod memory;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub use filter::{Clause, Filter, FoldedText, Predicate};
pub use memory::InMemoryDocumentStore;

/// Schema-flexible record as held by the store.
pub type Document = serde_json::Map<String, Value>;

pub const PROPERTY_COLLECTION: &str = "property";
pub const INQUIRY_COLLECTION: &str = "inquiry";

/// Identifier assigned by the store on insert.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Storage abstraction so services can be exercised against any backend.
pub trait DocumentStore: Send + Sync {
    fn name(&self) -> &str;

    /// Whether a backend was configured at all.
    fn is_configured(&self) -> bool {
        true
    }

    fn create_document(&self, collection: &str, record: Document)
        -> Result<DocumentId, StoreError>;

    /// Returns at most `limit` documents matching `filter`, in store order.
    fn get_documents(
        &self,
        collection: &str,
        filter: &Filter,
        limit: usize,
    ) -> Result<Vec<Document>, StoreError>;

    fn list_collection_names(&self) -> Result<Vec<String>, StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document store is not configured")]
    NotConfigured,
    #[error("document store unavailable: {0}")]
    Unavailable(String),
    #[error("record could not be encoded as a document: {0}")]
    Encode(String),
}

/// Serializes a record into the document shape the store accepts.
pub fn to_document<T: Serialize>(record: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(record) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(StoreError::Encode(format!(
            "expected a JSON object, found {}",
            json_kind(&other)
        ))),
        Err(err) => Err(StoreError::Encode(err.to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Backend selected from configuration at startup.
#[derive(Debug)]
pub enum StoreBackend {
    Memory(InMemoryDocumentStore),
    /// No `DATABASE_URL` was supplied; every call fails with [`StoreError::NotConfigured`].
    Unconfigured,
}

impl DocumentStore for StoreBackend {
    fn name(&self) -> &str {
        match self {
            StoreBackend::Memory(store) => store.name(),
            StoreBackend::Unconfigured => "unconfigured",
        }
    }

    fn is_configured(&self) -> bool {
        !matches!(self, StoreBackend::Unconfigured)
    }

    fn create_document(
        &self,
        collection: &str,
        record: Document,
    ) -> Result<DocumentId, StoreError> {
        match self {
            StoreBackend::Memory(store) => store.create_document(collection, record),
            StoreBackend::Unconfigured => Err(StoreError::NotConfigured),
        }
    }

    fn get_documents(
        &self,
        collection: &str,
        filter: &Filter,
        limit: usize,
    ) -> Result<Vec<Document>, StoreError> {
        match self {
            StoreBackend::Memory(store) => store.get_documents(collection, filter, limit),
            StoreBackend::Unconfigured => Err(StoreError::NotConfigured),
        }
    }

    fn list_collection_names(&self) -> Result<Vec<String>, StoreError> {
        match self {
            StoreBackend::Memory(store) => store.list_collection_names(),
            StoreBackend::Unconfigured => Err(StoreError::NotConfigured),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn to_document_rejects_non_objects() {
        match to_document(&vec![1, 2, 3]) {
            Err(StoreError::Encode(message)) => assert!(message.contains("array")),
            other => panic!("expected encode error, got {other:?}"),
        }
        let doc = to_document(&json!({ "name": "Ravi" })).expect("object encodes");
        assert_eq!(doc.get("name"), Some(&json!("Ravi")));
    }

    #[test]
    fn unconfigured_backend_refuses_every_call() {
        let backend = StoreBackend::Unconfigured;
        assert!(!backend.is_configured());
        assert!(matches!(
            backend.create_document(INQUIRY_COLLECTION, Document::new()),
            Err(StoreError::NotConfigured)
        ));
        assert!(matches!(
            backend.get_documents(PROPERTY_COLLECTION, &Filter::new(), 5),
            Err(StoreError::NotConfigured)
        ));
        assert!(matches!(
            backend.list_collection_names(),
            Err(StoreError::NotConfigured)
        ));
    }

    #[test]
    fn memory_backend_delegates() {
        let backend = StoreBackend::Memory(InMemoryDocumentStore::new("listings"));
        assert!(backend.is_configured());
        assert_eq!(backend.name(), "listings");
        backend
            .create_document(PROPERTY_COLLECTION, Document::new())
            .expect("insert");
        assert_eq!(
            backend.list_collection_names().expect("names"),
            vec![PROPERTY_COLLECTION.to_string()]
        );
    }
}
