//! Gemini API backend implementation.
//!
//! This module provides the `GeminiBackend` which connects to the
//! `generateContent` endpoint of the Gemini API.

use async_trait::async_trait;
use reqwest::{Client, Response, header};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::backend::{LanguageBackend, with_retry};
use crate::error::{LlmError, Result, parse_retry_after};
use crate::types::{
    FinishReason, FunctionDeclaration, GenerationRequest, GenerationResponse, Message, Part, Role,
    TokenUsage,
};

/// Default API base URL.
const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Default API version path segment.
const DEFAULT_API_VERSION: &str = "v1beta";

/// Default timeout for requests.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration for the Gemini backend.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key for authentication.
    pub api_key: String,

    /// Base URL for the API.
    pub base_url: String,

    /// API version path segment.
    pub api_version: String,

    /// Request timeout.
    pub timeout: Duration,

    /// Maximum retries for transient errors.
    pub max_retries: u32,

    /// Initial backoff duration for retries.
    pub retry_backoff: Duration,
}

impl GeminiConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_API_BASE.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: 3,
            retry_backoff: Duration::from_millis(500),
        }
    }

    /// Create config from the `GEMINI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| {
            LlmError::Config("GEMINI_API_KEY environment variable not set".to_string())
        })?;
        Ok(Self::new(api_key))
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set max retries.
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Gemini Backend
// ─────────────────────────────────────────────────────────────────────────────

/// Gemini API backend.
pub struct GeminiBackend {
    client: Client,
    config: GeminiConfig,
}

impl GeminiBackend {
    /// Create a new Gemini backend with the given configuration.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Create a backend from environment configuration.
    pub fn from_env() -> Result<Self> {
        Self::new(GeminiConfig::from_env()?)
    }

    /// Build the generateContent endpoint URL for a model.
    fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/{}/models/{}:generateContent",
            self.config.base_url, self.config.api_version, model
        )
    }

    /// Add authentication and content headers to a request.
    fn add_headers(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("x-goog-api-key", &self.config.api_key)
            .header(header::CONTENT_TYPE, "application/json")
    }

    /// Handle a successful response.
    async fn handle_response(model: &str, response: Response) -> Result<GenerationResponse> {
        if !response.status().is_success() {
            return Err(Self::handle_error_response(response).await);
        }

        let body = response.text().await?;
        let parsed: ApiResponse =
            serde_json::from_str(&body).map_err(|e| LlmError::Serialization(e.to_string()))?;

        Ok(parsed.into_response(model))
    }

    /// Handle an error response.
    async fn handle_error_response(response: Response) -> LlmError {
        let status = response.status();

        let retry_after_header = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = response.text().await.unwrap_or_default();

        if let Ok(error) = serde_json::from_str::<ApiError>(&body) {
            match status.as_u16() {
                401 | 403 => {
                    LlmError::Auth(format!("Authentication failed: {}", error.error.message))
                }
                429 => LlmError::RateLimit {
                    message: error.error.message,
                    retry_after: retry_after_header.as_deref().and_then(parse_retry_after),
                },
                500..=599 => LlmError::Backend(format!("Server error: {}", error.error.message)),
                _ => LlmError::Backend(error.error.message),
            }
        } else {
            LlmError::Backend(format!("HTTP {}: {}", status, body))
        }
    }
}

#[async_trait]
impl LanguageBackend for GeminiBackend {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse> {
        let model = request.model.clone();
        let body = ApiRequest::from(&request);

        with_retry(
            self.config.max_retries,
            self.config.retry_backoff,
            "gemini",
            || async {
                let response = self
                    .add_headers(self.client.post(self.generate_url(&model)))
                    .json(&body)
                    .send()
                    .await?;

                Self::handle_response(&model, response).await
            },
        )
        .await
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

/// Create a shared Gemini backend.
pub fn create_shared_backend(config: GeminiConfig) -> Result<Arc<dyn LanguageBackend>> {
    Ok(Arc::new(GeminiBackend::new(config)?))
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest {
    contents: Vec<ApiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<ApiContent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ApiTools>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<ApiGenerationConfig>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct ApiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<ApiPart>,
}

#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_call: Option<ApiFunctionCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_response: Option<ApiFunctionResponse>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct ApiFunctionCall {
    name: String,
    #[serde(default)]
    args: serde_json::Value,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct ApiFunctionResponse {
    name: String,
    response: serde_json::Value,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiTools {
    function_declarations: Vec<ApiFunctionDeclaration>,
}

#[derive(Debug, serde::Serialize)]
struct ApiFunctionDeclaration {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<ApiCandidate>,
    usage_metadata: Option<ApiUsageMetadata>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiCandidate {
    content: Option<ApiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiUsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[derive(Debug, serde::Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, serde::Deserialize)]
struct ApiErrorDetail {
    message: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Conversions
// ─────────────────────────────────────────────────────────────────────────────

fn role_str(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Model => "model",
    }
}

impl From<&Part> for ApiPart {
    fn from(part: &Part) -> Self {
        match part {
            Part::Text { text } => ApiPart {
                text: Some(text.clone()),
                ..Default::default()
            },
            Part::FunctionCall { name, args, .. } => ApiPart {
                function_call: Some(ApiFunctionCall {
                    name: name.clone(),
                    args: args.clone(),
                }),
                ..Default::default()
            },
            Part::FunctionResponse { name, response, .. } => ApiPart {
                function_response: Some(ApiFunctionResponse {
                    name: name.clone(),
                    response: response.clone(),
                }),
                ..Default::default()
            },
        }
    }
}

impl From<&Message> for ApiContent {
    fn from(message: &Message) -> Self {
        ApiContent {
            role: Some(role_str(message.role).to_string()),
            parts: message.parts.iter().map(ApiPart::from).collect(),
        }
    }
}

impl From<&GenerationRequest> for ApiRequest {
    fn from(request: &GenerationRequest) -> Self {
        let generation_config =
            if request.temperature.is_some() || request.max_output_tokens.is_some() {
                Some(ApiGenerationConfig {
                    temperature: request.temperature,
                    max_output_tokens: request.max_output_tokens,
                })
            } else {
                None
            };

        ApiRequest {
            contents: request.contents.iter().map(ApiContent::from).collect(),
            system_instruction: request.system_instruction.as_ref().map(|text| ApiContent {
                role: None,
                parts: vec![ApiPart {
                    text: Some(text.clone()),
                    ..Default::default()
                }],
            }),
            tools: if request.tools.is_empty() {
                Vec::new()
            } else {
                vec![ApiTools {
                    function_declarations: request
                        .tools
                        .iter()
                        .map(|t: &FunctionDeclaration| ApiFunctionDeclaration {
                            name: t.name.clone(),
                            description: t.description.clone(),
                            parameters: t.parameters.clone(),
                        })
                        .collect(),
                }]
            },
            generation_config,
        }
    }
}

impl ApiResponse {
    /// Convert the wire response to the provider-agnostic shape.
    ///
    /// A response with no candidates maps to empty parts, not an error.
    /// Function calls get locally synthesized ids since the wire has none.
    fn into_response(self, model: &str) -> GenerationResponse {
        let usage = self
            .usage_metadata
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_token_count,
                completion_tokens: u.candidates_token_count,
                total_tokens: u.total_token_count,
            })
            .unwrap_or_default();

        let Some(candidate) = self.candidates.into_iter().next() else {
            tracing::warn!(model, "Response contained no candidates");
            return GenerationResponse {
                model: model.to_string(),
                parts: Vec::new(),
                finish_reason: None,
                usage,
            };
        };

        let finish_reason = candidate.finish_reason.as_deref().map(|s| match s {
            "STOP" => FinishReason::Stop,
            "MAX_TOKENS" => FinishReason::MaxTokens,
            "SAFETY" => FinishReason::Safety,
            _ => FinishReason::Other,
        });

        let parts = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| {
                        if let Some(text) = part.text {
                            Some(Part::Text { text })
                        } else if let Some(call) = part.function_call {
                            Some(Part::FunctionCall {
                                id: format!("call-{}", Uuid::new_v4().simple()),
                                name: call.name,
                                args: call.args,
                            })
                        } else {
                            None
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        GenerationResponse {
            model: model.to_string(),
            parts,
            finish_reason,
            usage,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = GeminiConfig::new("key");
        assert_eq!(config.base_url, DEFAULT_API_BASE);
        assert_eq!(config.api_version, "v1beta");
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_generate_url() {
        let backend = GeminiBackend::new(
            GeminiConfig::new("key").with_base_url("http://localhost:9999"),
        )
        .unwrap();
        assert_eq!(
            backend.generate_url("gemini-3-pro-preview"),
            "http://localhost:9999/v1beta/models/gemini-3-pro-preview:generateContent"
        );
    }

    #[test]
    fn test_request_wire_format() {
        let request = GenerationRequest::new(
            "gemini-3-pro-preview",
            vec![
                Message::user("Who runs ACME?"),
                Message::model_parts(vec![Part::function_call(
                    "call-1",
                    "getTable",
                    serde_json::json!({}),
                )]),
                Message::function_responses(vec![Part::function_response(
                    "call-1",
                    "getTable",
                    serde_json::json!({"documents": []}),
                )]),
            ],
        )
        .with_system_instruction("Answer from documents.")
        .with_tools(vec![FunctionDeclaration::new(
            "getTable",
            "List documents",
            serde_json::json!({"type": "object", "properties": {}}),
        )])
        .with_temperature(0.5);

        let body = serde_json::to_value(ApiRequest::from(&request)).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][1]["parts"][0]["functionCall"]["name"], "getTable");
        // Function responses travel under the user role, keyed by name only.
        assert_eq!(body["contents"][2]["role"], "user");
        assert_eq!(
            body["contents"][2]["parts"][0]["functionResponse"]["name"],
            "getTable"
        );
        assert!(body["contents"][2]["parts"][0]["functionResponse"]
            .get("id")
            .is_none());
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Answer from documents.");
        assert_eq!(body["tools"][0]["functionDeclarations"][0]["name"], "getTable");
        // 0.5 survives the f32 → f64 widening in serde_json exactly.
        assert_eq!(body["generationConfig"]["temperature"], 0.5);
    }

    #[test]
    fn test_response_parsing_with_function_call() {
        let body = serde_json::json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        {"text": "Checking."},
                        {"functionCall": {"name": "getOutline", "args": {"id": "leadership"}}}
                    ]
                },
                "finishReason": "STOP"
            }],
            "usageMetadata": {
                "promptTokenCount": 12,
                "candidatesTokenCount": 7,
                "totalTokenCount": 19
            }
        });

        let parsed: ApiResponse = serde_json::from_value(body).unwrap();
        let response = parsed.into_response("gemini-3-pro-preview");

        assert_eq!(response.usage.total_tokens, 19);
        assert!(response.has_function_calls());
        let calls = response.function_calls();
        assert_eq!(calls[0].name, "getOutline");
        assert_eq!(calls[0].args["id"], "leadership");
        assert!(calls[0].id.starts_with("call-"));
        assert_eq!(response.finish_reason, Some(FinishReason::Stop));
    }

    #[test]
    fn test_response_parsing_zero_candidates() {
        let parsed: ApiResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        let response = parsed.into_response("m");
        assert!(response.is_empty());
        assert_eq!(response.usage, TokenUsage::default());
    }

    #[test]
    fn test_missing_usage_defaults_to_zero() {
        let body = serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Hi"}]},
                "finishReason": "STOP"
            }]
        });
        let parsed: ApiResponse = serde_json::from_value(body).unwrap();
        let response = parsed.into_response("m");
        assert_eq!(response.usage.total_tokens, 0);
        assert_eq!(response.text(), "Hi");
    }
}
