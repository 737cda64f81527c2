//! Document records served by the corpus API.

use serde::{Deserialize, Serialize};

/// A document in the corpus.
///
/// The same record shape backs all three retrieval depths: a listing entry
/// carries only metadata, an outline adds `outline`, and a full fetch adds
/// `content`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document id (e.g. "company-overview").
    pub id: String,
    /// Human-readable title.
    pub title: String,
    /// Path of the source file in the corpus.
    #[serde(default)]
    pub path: String,
    /// Last-updated timestamp as reported by the API.
    #[serde(default)]
    pub last_updated: String,
    /// Document size in kilobytes.
    #[serde(default)]
    pub size_kb: f64,
    /// Outline headings, present on outline fetches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<Vec<String>>,
    /// Full markdown content, present on full fetches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Document {
    /// Create a metadata-only document record.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            path: String::new(),
            last_updated: String::new(),
            size_kb: 0.0,
            outline: None,
            content: None,
        }
    }

    /// Attach outline headings.
    pub fn with_outline(mut self, outline: Vec<String>) -> Self {
        self.outline = Some(outline);
        self
    }

    /// Attach full content.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// A copy of this record stripped to listing metadata.
    pub fn summary(&self) -> Document {
        Document {
            outline: None,
            content: None,
            ..self.clone()
        }
    }

    /// A copy of this record with outline but no content.
    pub fn outline_view(&self) -> Document {
        Document {
            content: None,
            ..self.clone()
        }
    }
}
