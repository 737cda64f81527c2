//! Language backend trait and test implementations.
//!
//! This module defines the abstraction layer over language model providers
//! and provides a deterministic mock for testing the orchestration loop.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{LlmError, Result, is_retryable};
use crate::types::{GenerationRequest, GenerationResponse, Part, TokenUsage};

// ─────────────────────────────────────────────────────────────────────────────
// Shared Retry Logic
// ─────────────────────────────────────────────────────────────────────────────

/// Execute an async operation with exponential backoff retry.
///
/// Retries only transient errors (transport failures, rate limits, provider
/// 5xx). Non-retryable errors are returned immediately.
pub async fn with_retry<F, Fut, T>(
    max_retries: u32,
    initial_backoff: Duration,
    backend_name: &str,
    mut f: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut last_error = None;
    let mut backoff = initial_backoff;

    for attempt in 0..=max_retries {
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                if !is_retryable(&e) {
                    return Err(e);
                }

                last_error = Some(e);

                if attempt < max_retries {
                    tracing::warn!(
                        backend = backend_name,
                        attempt = attempt + 1,
                        max_retries,
                        backoff_ms = backoff.as_millis() as u64,
                        "Request failed, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                }
            }
        }
    }

    Err(last_error.unwrap())
}

// ─────────────────────────────────────────────────────────────────────────────
// Language Backend Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Trait for language model providers.
///
/// Implementations connect to an actual model service; the orchestrator only
/// ever talks to this trait.
#[async_trait]
pub trait LanguageBackend: Send + Sync {
    /// Execute a generation request and return the full response.
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse>;

    /// Get the name of this backend.
    fn name(&self) -> &str;
}

/// A backend that can be shared across tasks.
pub type SharedBackend = Arc<dyn LanguageBackend>;

// ─────────────────────────────────────────────────────────────────────────────
// Mock Backend
// ─────────────────────────────────────────────────────────────────────────────

/// A scripted reply for [`MockBackend`].
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return this response.
    Success(GenerationResponse),
    /// Fail with a backend error carrying this message.
    Error(String),
}

/// A mock backend for testing purposes.
///
/// Replies are returned in order and every request is recorded, which makes
/// the orchestration loop fully deterministic under test.
#[derive(Debug)]
pub struct MockBackend {
    name: String,
    replies: std::sync::Mutex<Vec<MockReply>>,
    request_log: std::sync::Mutex<Vec<GenerationRequest>>,
}

impl MockBackend {
    /// Create a mock backend with the given responses.
    pub fn new(responses: Vec<GenerationResponse>) -> Self {
        Self::with_replies(responses.into_iter().map(MockReply::Success).collect())
    }

    /// Create a mock backend with scripted replies (successes and errors).
    pub fn with_replies(replies: Vec<MockReply>) -> Self {
        Self {
            name: "mock".to_string(),
            replies: std::sync::Mutex::new(replies),
            request_log: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Create a mock backend with a single text response.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self::new(vec![GenerationResponse::new(
            "mock-model",
            vec![Part::text(text)],
            TokenUsage::new(10, 20),
        )])
    }

    /// Get all requests that were made to this backend.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.request_log.lock().unwrap().clone()
    }

    /// Get the number of requests made.
    pub fn request_count(&self) -> usize {
        self.request_log.lock().unwrap().len()
    }
}

#[async_trait]
impl LanguageBackend for MockBackend {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse> {
        self.request_log.lock().unwrap().push(request);

        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            return Err(LlmError::Backend(
                "MockBackend: no more replies available".to_string(),
            ));
        }
        match replies.remove(0) {
            MockReply::Success(response) => Ok(response),
            MockReply::Error(message) => Err(LlmError::Backend(message)),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Message;

    #[tokio::test]
    async fn test_mock_backend_single_response() {
        let backend = MockBackend::with_text("Hello!");

        let request = GenerationRequest::new("test-model", vec![Message::user("Hi")]);
        let response = backend.generate(request).await.unwrap();

        assert_eq!(response.text(), "Hello!");
        assert_eq!(backend.request_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_backend_ordered_replies() {
        let backend = MockBackend::new(vec![
            GenerationResponse::new("m", vec![Part::text("First")], TokenUsage::new(1, 1)),
            GenerationResponse::new("m", vec![Part::text("Second")], TokenUsage::new(1, 1)),
        ]);

        let r1 = backend
            .generate(GenerationRequest::new("m", vec![Message::user("1")]))
            .await
            .unwrap();
        let r2 = backend
            .generate(GenerationRequest::new("m", vec![Message::user("2")]))
            .await
            .unwrap();

        assert_eq!(r1.text(), "First");
        assert_eq!(r2.text(), "Second");
        assert_eq!(backend.request_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_backend_exhausted() {
        let backend = MockBackend::new(vec![]);
        let result = backend
            .generate(GenerationRequest::new("m", vec![Message::user("Hi")]))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_mock_backend_scripted_error() {
        let backend = MockBackend::with_replies(vec![MockReply::Error("boom".to_string())]);
        let err = backend
            .generate(GenerationRequest::new("m", vec![Message::user("Hi")]))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("boom"));
    }

    #[tokio::test]
    async fn test_with_retry_eventual_success() {
        let attempts = std::sync::Arc::new(std::sync::atomic::AtomicU32::new(0));
        let counter = attempts.clone();

        let result = with_retry(3, Duration::from_millis(1), "test", move || {
            let counter = counter.clone();
            async move {
                let n = counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                if n < 2 {
                    Err(LlmError::Backend("transient".to_string()))
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(std::sync::atomic::Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_with_retry_gives_up_on_fatal() {
        let attempts = std::sync::Arc::new(std::sync::atomic::AtomicU32::new(0));
        let counter = attempts.clone();

        let result: Result<u32> = with_retry(3, Duration::from_millis(1), "test", move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                Err(LlmError::Auth("bad key".to_string()))
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(std::sync::atomic::Ordering::SeqCst), 1);
    }
}
