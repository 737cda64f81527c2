//! Core types for language model requests and responses.
//!
//! These types are shaped after the Gemini `generateContent` API while
//! staying provider-agnostic: a backend maps them onto its own wire format.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Roles and Messages
// ─────────────────────────────────────────────────────────────────────────────

/// The role of a message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// A message in the conversation context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message author.
    pub role: Role,
    /// The content parts of the message.
    pub parts: Vec<Part>,
}

impl Message {
    /// Create a user message with text content.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part::text(text)],
        }
    }

    /// Create a model message with text content.
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![Part::text(text)],
        }
    }

    /// Create a model message from content parts.
    pub fn model_parts(parts: Vec<Part>) -> Self {
        Self {
            role: Role::Model,
            parts,
        }
    }

    /// Create a user message carrying function responses.
    ///
    /// Function results travel back to the model under the user role.
    pub fn function_responses(parts: Vec<Part>) -> Self {
        Self {
            role: Role::User,
            parts,
        }
    }

    /// Extract all text from the message.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                Part::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Parts
// ─────────────────────────────────────────────────────────────────────────────

/// A content part within a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Part {
    /// Plain text.
    Text {
        /// The text content.
        text: String,
    },
    /// A function call requested by the model.
    FunctionCall {
        /// Locally assigned id for this call (the wire carries none).
        id: String,
        /// Name of the function to call.
        name: String,
        /// Arguments as JSON.
        args: serde_json::Value,
    },
    /// The result of an executed function, sent back to the model.
    FunctionResponse {
        /// Id of the function call this responds to.
        id: String,
        /// Name of the function; the wire associates responses by name.
        name: String,
        /// The response payload.
        response: serde_json::Value,
    },
}

impl Part {
    /// Create a text part.
    pub fn text(content: impl Into<String>) -> Self {
        Part::Text {
            text: content.into(),
        }
    }

    /// Create a function call part.
    pub fn function_call(
        id: impl Into<String>,
        name: impl Into<String>,
        args: serde_json::Value,
    ) -> Self {
        Part::FunctionCall {
            id: id.into(),
            name: name.into(),
            args,
        }
    }

    /// Create a function response part.
    pub fn function_response(
        id: impl Into<String>,
        name: impl Into<String>,
        response: serde_json::Value,
    ) -> Self {
        Part::FunctionResponse {
            id: id.into(),
            name: name.into(),
            response,
        }
    }
}

/// A function call extracted from a model response.
#[derive(Debug, Clone)]
pub struct FunctionCall {
    /// Locally assigned id for this call.
    pub id: String,
    /// Name of the function to call.
    pub name: String,
    /// Arguments as JSON.
    pub args: serde_json::Value,
}

impl From<FunctionCall> for Part {
    fn from(call: FunctionCall) -> Self {
        Part::FunctionCall {
            id: call.id,
            name: call.name,
            args: call.args,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Function Declarations
// ─────────────────────────────────────────────────────────────────────────────

/// Declaration of a function the model may call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDeclaration {
    /// Name of the function.
    pub name: String,
    /// Description of what the function does.
    pub description: String,
    /// JSON Schema for the function's parameters.
    pub parameters: serde_json::Value,
}

impl FunctionDeclaration {
    /// Create a new function declaration.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Generation Request
// ─────────────────────────────────────────────────────────────────────────────

/// A generation request to a language model provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The model to use.
    pub model: String,

    /// The ordered conversation context.
    pub contents: Vec<Message>,

    /// System instruction (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<String>,

    /// Functions available to the model.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<FunctionDeclaration>,

    /// Temperature for sampling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl GenerationRequest {
    /// Create a new request with the given model and context.
    pub fn new(model: impl Into<String>, contents: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            contents,
            system_instruction: None,
            tools: Vec::new(),
            temperature: None,
            max_output_tokens: None,
        }
    }

    /// Set the system instruction.
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// Add function declarations to the request.
    pub fn with_tools(mut self, tools: Vec<FunctionDeclaration>) -> Self {
        self.tools = tools;
        self
    }

    /// Set temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the output token limit.
    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Generation Response
// ─────────────────────────────────────────────────────────────────────────────

/// Why the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural end of the response.
    Stop,
    /// Hit the output token limit.
    MaxTokens,
    /// Blocked by a safety filter.
    Safety,
    /// Anything else the provider reports.
    Other,
}

/// A generation response from the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// The model that produced the response.
    pub model: String,

    /// The content parts of the first candidate.
    ///
    /// Empty when the provider returned no candidates.
    pub parts: Vec<Part>,

    /// Why generation stopped, when reported.
    pub finish_reason: Option<FinishReason>,

    /// Token usage counters.
    pub usage: TokenUsage,
}

impl GenerationResponse {
    /// Create a new response.
    pub fn new(model: impl Into<String>, parts: Vec<Part>, usage: TokenUsage) -> Self {
        Self {
            model: model.into(),
            parts,
            finish_reason: Some(FinishReason::Stop),
            usage,
        }
    }

    /// Get all function calls from the response, in order.
    pub fn function_calls(&self) -> Vec<FunctionCall> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                Part::FunctionCall { id, name, args } => Some(FunctionCall {
                    id: id.clone(),
                    name: name.clone(),
                    args: args.clone(),
                }),
                _ => None,
            })
            .collect()
    }

    /// Check if the response requests any function calls.
    pub fn has_function_calls(&self) -> bool {
        self.parts
            .iter()
            .any(|part| matches!(part, Part::FunctionCall { .. }))
    }

    /// Get the concatenated text content of the response.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                Part::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }

    /// True when the provider produced no candidates at all.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// Token usage counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt.
    pub prompt_tokens: u32,
    /// Tokens in the completion.
    pub completion_tokens: u32,
    /// Total tokens reported by the provider.
    pub total_tokens: u32,
}

impl TokenUsage {
    /// Create new usage counters.
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
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
    fn test_message_user() {
        let msg = Message::user("Hello");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.text(), "Hello");
    }

    #[test]
    fn test_message_model() {
        let msg = Message::model("Hi there");
        assert_eq!(msg.role, Role::Model);
        assert_eq!(msg.text(), "Hi there");
    }

    #[test]
    fn test_function_responses_use_user_role() {
        let msg = Message::function_responses(vec![Part::function_response(
            "call-1",
            "getTable",
            serde_json::json!({"documents": []}),
        )]);
        assert_eq!(msg.role, Role::User);
    }

    #[test]
    fn test_request_builder() {
        let request = GenerationRequest::new("gemini-3-pro-preview", vec![Message::user("Hi")])
            .with_system_instruction("Be helpful.")
            .with_temperature(0.2)
            .with_max_output_tokens(2048);

        assert_eq!(request.model, "gemini-3-pro-preview");
        assert_eq!(request.temperature, Some(0.2));
        assert_eq!(request.max_output_tokens, Some(2048));
        assert!(request.system_instruction.is_some());
    }

    #[test]
    fn test_response_function_calls() {
        let response = GenerationResponse::new(
            "test-model",
            vec![
                Part::text("Let me look that up."),
                Part::function_call("call-1", "getOutline", serde_json::json!({"id": "intro"})),
            ],
            TokenUsage::new(10, 5),
        );

        assert!(response.has_function_calls());
        let calls = response.function_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "getOutline");
        assert_eq!(response.text(), "Let me look that up.");
    }

    #[test]
    fn test_response_empty() {
        let response = GenerationResponse::new("test-model", vec![], TokenUsage::default());
        assert!(response.is_empty());
        assert!(!response.has_function_calls());
        assert_eq!(response.text(), "");
    }

    #[test]
    fn test_token_usage() {
        let usage = TokenUsage::new(100, 50);
        assert_eq!(usage.total_tokens, 150);
        assert_eq!(TokenUsage::default().total_tokens, 0);
    }

    #[test]
    fn test_serialize_roundtrip() {
        let request = GenerationRequest::new("m", vec![Message::user("Hello")]);
        let json = serde_json::to_string(&request).unwrap();
        let parsed: GenerationRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.model, request.model);
        assert_eq!(parsed.contents.len(), 1);
    }
}
