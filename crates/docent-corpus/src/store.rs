//! The document store trait and its HTTP implementation.
//!
//! `DocumentStore` is the seam the tool dispatcher talks to: three read
//! operations of increasing depth over a document corpus.

use async_trait::async_trait;
use reqwest::{Client, Response};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{CorpusError, Result};
use crate::types::Document;

/// Default base URL of the hosted corpus API.
const DEFAULT_API_BASE: &str = "https://ds-acme-assignment.vercel.app/api";

/// Default timeout for requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ─────────────────────────────────────────────────────────────────────────────
// Document Store Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Read access to a document corpus.
///
/// Failures surface as [`CorpusError`]; callers that must not propagate them
/// (the tool dispatcher) catch them at their own boundary.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// List all documents with their metadata.
    async fn list_documents(&self) -> Result<Vec<Document>>;

    /// Fetch metadata and outline headings for a document.
    async fn get_outline(&self, id: &str) -> Result<Document>;

    /// Fetch metadata and full content for a document.
    async fn get_full(&self, id: &str) -> Result<Document>;
}

/// A store that can be shared across tasks.
pub type SharedStore = Arc<dyn DocumentStore>;

// ─────────────────────────────────────────────────────────────────────────────
// HTTP Store
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration for the HTTP document store.
#[derive(Debug, Clone)]
pub struct CorpusConfig {
    /// Base URL of the corpus API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl CorpusConfig {
    /// Create a config for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

/// Document store backed by the corpus REST API.
pub struct HttpDocumentStore {
    client: Client,
    config: CorpusConfig,
}

impl HttpDocumentStore {
    /// Create a new HTTP store with the given configuration.
    pub fn new(config: CorpusConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CorpusError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Fetch a URL and decode the JSON body.
    async fn fetch<T: serde::de::DeserializeOwned>(&self, url: String, id: Option<&str>) -> Result<T> {
        tracing::debug!(%url, "Corpus request");
        let response = self.client.get(&url).send().await?;
        Self::decode(response, id).await
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: Response,
        id: Option<&str>,
    ) -> Result<T> {
        let status = response.status();

        if status.as_u16() == 404 {
            return Err(CorpusError::NotFound(id.unwrap_or("unknown").to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CorpusError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| CorpusError::Serialization(e.to_string()))
    }
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn list_documents(&self) -> Result<Vec<Document>> {
        self.fetch(format!("{}/docs", self.config.base_url), None)
            .await
    }

    async fn get_outline(&self, id: &str) -> Result<Document> {
        self.fetch(format!("{}/docs/{}", self.config.base_url, id), Some(id))
            .await
    }

    async fn get_full(&self, id: &str) -> Result<Document> {
        self.fetch(
            format!("{}/docs/{}/full", self.config.base_url, id),
            Some(id),
        )
        .await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corpus_config_default() {
        let config = CorpusConfig::default();
        assert_eq!(config.base_url, DEFAULT_API_BASE);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_http_store_construction() {
        let store = HttpDocumentStore::new(CorpusConfig::new("http://localhost:3000/api"));
        assert!(store.is_ok());
    }
}
