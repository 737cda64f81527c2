//! The conversation orchestrator.
//!
//! One instance owns one conversation: its history store, its turn counter,
//! and — while [`Orchestrator::process_query`] runs — the in-flight turn.
//! The turn moves through a fixed state machine:
//!
//! ```text
//! INIT ──► AWAITING_MODEL ──► DISPATCHING_TOOLS ─┐
//!              ▲   │                             │
//!              └───┴─────────────────────────────┘
//!                  │
//!                  ├──► FINALIZED   (final text; history appended)
//!                  └──► FAILED      (backend error; history untouched)
//! ```
//!
//! `AWAITING_MODEL` steps are bounded by the iteration ceiling; tool calls
//! within one `DISPATCHING_TOOLS` step run sequentially in the order the
//! backend requested them, so ledger order is deterministic.

use std::time::Instant;

use docent_corpus::SharedStore;
use docent_llm::{GenerationRequest, Message, Part, SharedBackend};

use crate::dispatch::ToolDispatcher;
use crate::history::ConversationHistory;
use crate::ledger::InvocationLedger;
use crate::progress::{self, SnapshotSender};
use crate::prompt::{DEFAULT_MODEL, SYSTEM_INSTRUCTION};
use crate::types::{Confidence, MessageMetadata, Turn, TurnId, TurnMessage, TurnMetadata};

/// Hard ceiling on backend steps per turn, guarding against a model that
/// never stops requesting tools.
pub const MAX_ITERATIONS: u32 = 10;

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Model identifier to use.
    pub model: String,
    /// Maximum backend steps per turn.
    pub max_iterations: u32,
    /// Temperature for sampling.
    pub temperature: Option<f32>,
    /// Output token limit per backend call.
    pub max_output_tokens: Option<u32>,
    /// System instruction handed to the backend on every step.
    pub system_instruction: String,
}

impl OrchestratorConfig {
    /// Create a config with the specified model.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            max_iterations: MAX_ITERATIONS,
            temperature: None,
            max_output_tokens: None,
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
        }
    }

    /// Set max iterations.
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
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

    /// Set the system instruction.
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = instruction.into();
        self
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Orchestrator
// ─────────────────────────────────────────────────────────────────────────────

/// The conversation orchestrator.
pub struct Orchestrator {
    backend: SharedBackend,
    dispatcher: ToolDispatcher,
    history: ConversationHistory,
    config: OrchestratorConfig,
    next_turn_id: u64,
}

impl Orchestrator {
    /// Create an orchestrator over the given backend and document store.
    pub fn new(backend: SharedBackend, store: SharedStore, config: OrchestratorConfig) -> Self {
        Self {
            backend,
            dispatcher: ToolDispatcher::new(store),
            history: ConversationHistory::new(),
            config,
            next_turn_id: 0,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Get the conversation history.
    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// Process one user query to a terminal turn.
    ///
    /// The caller rejects empty input; this method assumes a real query.
    /// Snapshots go to `sink` at creation, after every completed tool
    /// invocation, and exactly once when the turn reaches its end.
    ///
    /// Never returns an error: backend failures come back as a failed turn
    /// carrying an error-bearing response. When the iteration ceiling is hit
    /// or the backend yields no candidates, the turn ends with no
    /// `model_response` and no failure flag, and history is left untouched.
    pub async fn process_query(&mut self, query: &str, sink: &SnapshotSender) -> Turn {
        let started = Instant::now();
        self.next_turn_id += 1;

        let mut turn = Turn::new(TurnId::new(self.next_turn_id), query);
        tracing::info!(turn_id = %turn.turn_id, query_len = query.len(), "Turn started");
        progress::emit(sink, &turn);

        // Context for this turn: prior history plus the new query, extended
        // in place with each tool exchange.
        let mut contents = self.history.to_messages();
        contents.push(Message::user(query));

        let mut ledger = InvocationLedger::new();
        let mut iterations = 0u32;

        loop {
            if iterations >= self.config.max_iterations {
                tracing::warn!(
                    turn_id = %turn.turn_id,
                    iterations,
                    "Iteration ceiling reached; ending turn without a response"
                );
                break;
            }
            iterations += 1;

            let mut request = GenerationRequest::new(&self.config.model, contents.clone())
                .with_system_instruction(&self.config.system_instruction)
                .with_tools(ToolDispatcher::declarations());
            if let Some(temperature) = self.config.temperature {
                request = request.with_temperature(temperature);
            }
            if let Some(max_output_tokens) = self.config.max_output_tokens {
                request = request.with_max_output_tokens(max_output_tokens);
            }

            tracing::debug!(
                turn_id = %turn.turn_id,
                iteration = iterations,
                messages = contents.len(),
                "Awaiting model"
            );

            let response = match self.backend.generate(request).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::error!(
                        turn_id = %turn.turn_id,
                        iteration = iterations,
                        error = %e,
                        "Backend call failed; turn failed"
                    );
                    turn.tool_invocations = ledger.entries().to_vec();
                    turn.fail(format!("Error: {}. Please try again.", e));
                    progress::emit(sink, &turn);
                    return turn;
                }
            };

            if response.is_empty() {
                tracing::warn!(
                    turn_id = %turn.turn_id,
                    iteration = iterations,
                    "Backend returned no candidates; ending turn without a response"
                );
                break;
            }

            let calls = response.function_calls();
            if !calls.is_empty() {
                tracing::debug!(
                    turn_id = %turn.turn_id,
                    iteration = iterations,
                    call_count = calls.len(),
                    tools = %calls.iter().map(|c| c.name.as_str()).collect::<Vec<_>>().join(", "),
                    "Dispatching tools"
                );

                let mut response_parts = Vec::with_capacity(calls.len());
                for call in &calls {
                    let record = self.dispatcher.dispatch(&call.name, call.args.clone()).await;
                    let entry = ledger.append(record);
                    response_parts.push(Part::function_response(
                        &call.id,
                        &call.name,
                        entry.result.clone(),
                    ));
                    turn.tool_invocations = ledger.entries().to_vec();
                    progress::emit(sink, &turn);
                }

                // The model's call parts and our result parts both join the
                // context for the next step.
                contents.push(Message::model_parts(response.parts.clone()));
                contents.push(Message::function_responses(response_parts));
                continue;
            }

            // Final text: the turn finalizes.
            let text = response.text();
            let metadata = TurnMetadata {
                total_duration_ms: started.elapsed().as_millis() as u64,
                tool_call_count: ledger.len() as u32,
                token_usage: response.usage,
            };

            tracing::info!(
                turn_id = %turn.turn_id,
                iterations,
                tool_calls = ledger.len(),
                total_tokens = response.usage.total_tokens,
                response_len = text.len(),
                "Turn finalized"
            );

            self.history.append_exchange(query, &text);
            turn.tool_invocations = ledger.entries().to_vec();
            turn.finalize(
                TurnMessage::model(&text).with_metadata(MessageMetadata {
                    reasoning: Some("Synthesized from document tools".to_string()),
                    confidence: Some(Confidence::High),
                    sources_cited: Vec::new(),
                }),
                metadata,
            );
            progress::emit(sink, &turn);
            return turn;
        }

        // Ceiling reached or zero candidates: the loop ended with nothing to
        // say. The turn stays response-less and unflagged, and history is not
        // touched.
        turn.tool_invocations = ledger.entries().to_vec();
        progress::emit(sink, &turn);
        turn
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
