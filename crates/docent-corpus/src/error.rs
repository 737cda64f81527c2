//! Error types for the corpus crate.

use thiserror::Error;

/// Result type alias using the corpus error type.
pub type Result<T> = std::result::Result<T, CorpusError>;

/// Error type for document store operations.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Document does not exist.
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Non-success HTTP status from the corpus API.
    #[error("Corpus API returned HTTP {status}: {body}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The response body, if any.
        body: String,
    },

    /// Failed to parse a response payload.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = CorpusError::NotFound("leadership".to_string());
        assert!(err.to_string().contains("leadership"));
    }

    #[test]
    fn test_status_display() {
        let err = CorpusError::Status {
            status: 503,
            body: "unavailable".to_string(),
        };
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("unavailable"));
    }
}
