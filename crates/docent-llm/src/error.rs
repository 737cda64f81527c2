//! Error types for the LLM crate.

use std::time::Duration;
use thiserror::Error;

/// Result type alias using the LLM error type.
pub type Result<T> = std::result::Result<T, LlmError>;

/// Error type for language model operations.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Authentication failed (bad or missing API key).
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Provider rate limit hit.
    #[error("Rate limited: {message}")]
    RateLimit {
        /// The provider's error message.
        message: String,
        /// How long to wait before retrying, if the provider said.
        retry_after: Option<Duration>,
    },

    /// Provider-side error (5xx or malformed behaviour).
    #[error("Backend error: {0}")]
    Backend(String),

    /// Failed to serialize or parse a payload.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Whether an error is worth retrying with backoff.
///
/// Transport failures, rate limits, and provider 5xx errors are transient;
/// everything else fails fast.
pub fn is_retryable(error: &LlmError) -> bool {
    match error {
        LlmError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
        LlmError::RateLimit { .. } => true,
        LlmError::Backend(_) => true,
        _ => false,
    }
}

/// Parse a Retry-After header value (seconds form).
pub(crate) fn parse_retry_after(value: &str) -> Option<Duration> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LlmError::Auth("key rejected".to_string());
        assert!(err.to_string().contains("Authentication"));
        assert!(err.to_string().contains("key rejected"));
    }

    #[test]
    fn test_rate_limit_retryable() {
        let err = LlmError::RateLimit {
            message: "slow down".to_string(),
            retry_after: Some(Duration::from_secs(2)),
        };
        assert!(is_retryable(&err));
    }

    #[test]
    fn test_auth_not_retryable() {
        assert!(!is_retryable(&LlmError::Auth("nope".to_string())));
        assert!(!is_retryable(&LlmError::Config("missing key".to_string())));
    }

    #[test]
    fn test_backend_retryable() {
        assert!(is_retryable(&LlmError::Backend("500".to_string())));
    }

    #[test]
    fn test_parse_retry_after() {
        assert_eq!(parse_retry_after("30"), Some(Duration::from_secs(30)));
        assert_eq!(parse_retry_after(" 5 "), Some(Duration::from_secs(5)));
        assert_eq!(parse_retry_after("soon"), None);
    }
}
