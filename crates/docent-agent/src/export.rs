//! Conversation export.
//!
//! A structured document built on demand from already-finalized turns. This
//! is pure read-side aggregation; the orchestrator is not involved.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Turn;

/// Version stamp written into exports.
pub const AGENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Top-level metadata for an exported conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    /// Version of the agent that produced the conversation.
    pub agent_version: String,
    /// Model identifier used for the conversation.
    pub model: String,
    /// Number of turns in the export.
    pub total_turns: u32,
    /// Number of tool invocations across all turns.
    pub total_tool_calls: u32,
}

/// Conversation-level aggregates derived from the turn list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMetadata {
    /// Sum of finalized turn durations.
    pub total_duration_ms: u64,
    /// Sum of token totals across finalized turns.
    pub total_tokens: u64,
    /// Number of user messages.
    pub user_messages: u32,
    /// Number of model responses (including substituted error responses).
    pub model_responses: u32,
    /// Number of tool invocations.
    pub tool_invocations: u32,
    /// Failure descriptions: failed turns and error-status invocations.
    pub errors: Vec<String>,
}

/// A complete exported conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationExport {
    /// Conversation identifier.
    pub conversation_id: String,
    /// When the conversation started.
    pub created_at: DateTime<Utc>,
    /// When the export was produced.
    pub updated_at: DateTime<Utc>,
    /// Agent/model metadata.
    pub metadata: ExportMetadata,
    /// The full ordered turn list.
    pub turns: Vec<Turn>,
    /// Derived aggregates.
    pub conversation_metadata: ConversationMetadata,
}

impl ConversationExport {
    /// Build an export from a finalized turn slice.
    pub fn build(
        conversation_id: impl Into<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        model: &str,
        turns: &[Turn],
    ) -> Self {
        let total_tool_calls: u32 = turns.iter().map(|t| t.tool_invocations.len() as u32).sum();
        let total_tokens: u64 = turns
            .iter()
            .filter_map(|t| t.turn_metadata.as_ref())
            .map(|m| m.token_usage.total_tokens as u64)
            .sum();
        let total_duration_ms: u64 = turns
            .iter()
            .filter_map(|t| t.turn_metadata.as_ref())
            .map(|m| m.total_duration_ms)
            .sum();
        let model_responses = turns.iter().filter(|t| t.model_response.is_some()).count() as u32;

        let mut errors = Vec::new();
        for turn in turns {
            if turn.is_failed() {
                if let Some(response) = &turn.model_response {
                    errors.push(format!("turn {}: {}", turn.turn_id, response.content));
                }
            }
            for invocation in &turn.tool_invocations {
                if !invocation.is_success() {
                    let detail = invocation
                        .result
                        .get("error")
                        .and_then(|v| v.as_str())
                        .unwrap_or("unknown error");
                    errors.push(format!(
                        "turn {} {}[{}]: {}",
                        turn.turn_id, invocation.tool_name, invocation.sequence, detail
                    ));
                }
            }
        }

        Self {
            conversation_id: conversation_id.into(),
            created_at,
            updated_at,
            metadata: ExportMetadata {
                agent_version: AGENT_VERSION.to_string(),
                model: model.to_string(),
                total_turns: turns.len() as u32,
                total_tool_calls,
            },
            turns: turns.to_vec(),
            conversation_metadata: ConversationMetadata {
                total_duration_ms,
                total_tokens,
                user_messages: turns.len() as u32,
                model_responses,
                tool_invocations: total_tool_calls,
                errors,
            },
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use docent_llm::TokenUsage;

    use crate::ledger::{DispatchRecord, InvocationLedger};
    use crate::types::{InvocationStatus, TurnId, TurnMessage, TurnMetadata};

    fn finalized_turn(id: u64, tokens: u32, tool_calls: u32) -> Turn {
        let mut turn = Turn::new(TurnId::new(id), "question");
        let mut ledger = InvocationLedger::new();
        for i in 0..tool_calls {
            let now = Utc::now();
            ledger.append(DispatchRecord {
                tool_name: "getTable".to_string(),
                arguments: serde_json::json!({}),
                invoked_at: now,
                completed_at: now,
                duration_ms: i as u64,
                status: InvocationStatus::Success,
                result: serde_json::json!({"documents": []}),
            });
        }
        turn.tool_invocations = ledger.entries().to_vec();
        turn.finalize(
            TurnMessage::model("answer"),
            TurnMetadata {
                total_duration_ms: 100,
                tool_call_count: tool_calls,
                token_usage: TokenUsage::new(tokens, 0),
            },
        );
        turn
    }

    #[test]
    fn test_build_aggregates() {
        let turns = vec![finalized_turn(1, 30, 2), finalized_turn(2, 70, 1)];
        let now = Utc::now();
        let export = ConversationExport::build("conv-1", now, now, "gemini-3-pro-preview", &turns);

        assert_eq!(export.metadata.total_turns, 2);
        assert_eq!(export.metadata.total_tool_calls, 3);
        assert_eq!(export.conversation_metadata.total_tokens, 100);
        assert_eq!(export.conversation_metadata.total_duration_ms, 200);
        assert_eq!(export.conversation_metadata.user_messages, 2);
        assert_eq!(export.conversation_metadata.model_responses, 2);
        assert!(export.conversation_metadata.errors.is_empty());
    }

    #[test]
    fn test_errors_collected_from_failures() {
        let mut failed = Turn::new(TurnId::new(1), "q");
        failed.fail("Error: backend down. Please try again.");

        let mut with_bad_call = finalized_turn(2, 10, 0);
        let now = Utc::now();
        let mut ledger = InvocationLedger::new();
        ledger.append(DispatchRecord {
            tool_name: "getFull".to_string(),
            arguments: serde_json::json!({"id": "ghost"}),
            invoked_at: now,
            completed_at: now,
            duration_ms: 1,
            status: InvocationStatus::Error,
            result: serde_json::json!({"error": "Document not found: ghost"}),
        });
        with_bad_call.tool_invocations = ledger.entries().to_vec();

        let export = ConversationExport::build(
            "conv-2",
            now,
            now,
            "gemini-3-pro-preview",
            &[failed, with_bad_call],
        );

        assert_eq!(export.conversation_metadata.errors.len(), 2);
        assert!(export.conversation_metadata.errors[0].contains("backend down"));
        assert!(export.conversation_metadata.errors[1].contains("ghost"));
    }

    #[test]
    fn test_export_roundtrip_reproduces_counts() {
        let turns = vec![finalized_turn(1, 25, 3)];
        let now = Utc::now();
        let export = ConversationExport::build("conv-3", now, now, "m", &turns);

        let json = serde_json::to_string_pretty(&export).unwrap();
        let restored: ConversationExport = serde_json::from_str(&json).unwrap();

        let recomputed_tool_calls: u32 = restored
            .turns
            .iter()
            .map(|t| t.tool_invocations.len() as u32)
            .sum();
        let recomputed_tokens: u64 = restored
            .turns
            .iter()
            .filter_map(|t| t.turn_metadata.as_ref())
            .map(|m| m.token_usage.total_tokens as u64)
            .sum();

        assert_eq!(recomputed_tool_calls, export.metadata.total_tool_calls);
        assert_eq!(recomputed_tokens, export.conversation_metadata.total_tokens);
    }
}
