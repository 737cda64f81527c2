//! In-memory document store for tests and offline demos.

use async_trait::async_trait;

use crate::error::{CorpusError, Result};
use crate::store::DocumentStore;
use crate::types::Document;

/// A document store serving a fixed in-memory corpus.
///
/// Listing returns metadata-only views, outline fetches strip content, and
/// full fetches return the record as seeded.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    docs: Vec<Document>,
}

impl MemoryDocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with the given documents.
    pub fn with_docs(docs: Vec<Document>) -> Self {
        Self { docs }
    }

    /// Add a document to the store.
    pub fn insert(&mut self, doc: Document) {
        self.docs.push(doc);
    }

    fn find(&self, id: &str) -> Result<&Document> {
        self.docs
            .iter()
            .find(|d| d.id == id)
            .ok_or_else(|| CorpusError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn list_documents(&self) -> Result<Vec<Document>> {
        Ok(self.docs.iter().map(Document::summary).collect())
    }

    async fn get_outline(&self, id: &str) -> Result<Document> {
        Ok(self.find(id)?.outline_view())
    }

    async fn get_full(&self, id: &str) -> Result<Document> {
        Ok(self.find(id)?.clone())
    }
}
