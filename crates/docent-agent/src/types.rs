//! Core types for the agent crate.
//!
//! This module defines the record of one conversation exchange:
//! - [`Turn`]: one user-query-to-answer exchange
//! - [`ToolInvocation`]: one dispatched retrieval call with timing and outcome
//! - [`TurnMetadata`]: duration and token accounting, set at finalization

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use docent_llm::{Role, TokenUsage};

// ─────────────────────────────────────────────────────────────────────────────
// ID Types
// ─────────────────────────────────────────────────────────────────────────────

/// Unique identifier for a turn within a conversation.
///
/// Assigned from a per-conversation counter starting at 1, so ids are unique
/// and ordered even for turns created in the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TurnId(u64);

impl TurnId {
    /// Create a turn id from its counter value.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the underlying counter value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TurnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a tool invocation, unique across the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvocationId(Uuid);

impl InvocationId {
    /// Create a new random invocation id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for InvocationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InvocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Messages
// ─────────────────────────────────────────────────────────────────────────────

/// How confident the agent is in a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// Optional metadata attached to a model response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageMetadata {
    /// Free-form note on how the answer was produced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    /// Confidence level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
    /// Document ids cited in the answer.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources_cited: Vec<String>,
}

/// A role-tagged message within a turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnMessage {
    /// The author role.
    pub role: Role,
    /// The message text.
    pub content: String,
    /// When the message was recorded.
    pub timestamp: DateTime<Utc>,
    /// Optional response metadata (model messages only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MessageMetadata>,
}

impl TurnMessage {
    /// Create a user message timestamped now.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
            metadata: None,
        }
    }

    /// Create a model message timestamped now.
    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            content: content.into(),
            timestamp: Utc::now(),
            metadata: None,
        }
    }

    /// Attach metadata.
    pub fn with_metadata(mut self, metadata: MessageMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tool Invocations
// ─────────────────────────────────────────────────────────────────────────────

/// Outcome of a dispatched tool call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvocationStatus {
    Success,
    Error,
}

/// One dispatched retrieval call, as recorded in the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInvocation {
    /// Process-unique id for this invocation.
    pub invocation_id: InvocationId,
    /// 1-based position within the turn, gapless, in dispatch order.
    pub sequence: u32,
    /// Name of the tool that was called.
    pub tool_name: String,
    /// Arguments as requested by the model.
    pub arguments: serde_json::Value,
    /// When the call was dispatched.
    pub invoked_at: DateTime<Utc>,
    /// When the call completed.
    pub completed_at: DateTime<Utc>,
    /// Wall-clock duration of the call.
    pub duration_ms: u64,
    /// Whether the call succeeded.
    pub status: InvocationStatus,
    /// Success payload, or an `{"error": ...}` description. Never absent.
    pub result: serde_json::Value,
}

impl ToolInvocation {
    /// Check if this invocation succeeded.
    pub fn is_success(&self) -> bool {
        self.status == InvocationStatus::Success
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Turn
// ─────────────────────────────────────────────────────────────────────────────

/// Duration and token accounting for a finalized turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnMetadata {
    /// Total duration from turn creation to finalization.
    pub total_duration_ms: u64,
    /// Number of tool invocations made during the turn.
    pub tool_call_count: u32,
    /// Token usage reported by the backend for the final answer.
    pub token_usage: TokenUsage,
}

/// A single conversation turn (user query, tool calls, response).
///
/// A turn is mutable only while the orchestrator is driving it. Once a
/// response is set or the turn is marked failed, nothing touches it again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// Unique identifier for this turn.
    pub turn_id: TurnId,
    /// When this turn was created.
    pub timestamp: DateTime<Utc>,
    /// The user's query. Set once at creation.
    pub user_message: TurnMessage,
    /// Tool invocations made during the turn, in dispatch order.
    pub tool_invocations: Vec<ToolInvocation>,
    /// The model's answer, or the substituted error description on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_response: Option<TurnMessage>,
    /// Accounting, set only at successful finalization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turn_metadata: Option<TurnMetadata>,
    /// Terminal failure flag.
    #[serde(default)]
    pub failed: bool,
}

impl Turn {
    /// Create a new turn for the given user query.
    pub fn new(turn_id: TurnId, query: impl Into<String>) -> Self {
        let user_message = TurnMessage::user(query);
        Self {
            turn_id,
            timestamp: user_message.timestamp,
            user_message,
            tool_invocations: Vec::new(),
            model_response: None,
            turn_metadata: None,
            failed: false,
        }
    }

    /// Set the model response and accounting. Valid at most once.
    pub fn finalize(&mut self, response: TurnMessage, metadata: TurnMetadata) {
        debug_assert!(self.model_response.is_none(), "turn finalized twice");
        self.model_response = Some(response);
        self.turn_metadata = Some(metadata);
    }

    /// Mark the turn failed, substituting an error-bearing response.
    ///
    /// Leaves `turn_metadata` unset. Valid at most once.
    pub fn fail(&mut self, description: impl Into<String>) {
        debug_assert!(self.model_response.is_none(), "turn failed after terminal");
        self.model_response = Some(TurnMessage::model(description));
        self.failed = true;
    }

    /// True when the turn completed successfully.
    pub fn is_finalized(&self) -> bool {
        self.model_response.is_some() && !self.failed
    }

    /// True when the turn ended in failure.
    pub fn is_failed(&self) -> bool {
        self.failed
    }

    /// Check if this turn made any tool calls.
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_invocations.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
