//! Agent core for Docent.
//!
//! This crate implements the conversation orchestration loop: the turn state
//! machine, the tool-invocation ledger, the bounded multi-iteration protocol
//! with the language model backend, and the progress/history contracts.
//!
//! ```text
//! query ──► Orchestrator ──► LanguageBackend ──► function calls?
//!               │                 ▲                    │
//!               │                 │ results            ▼
//!               │                 └──────────── ToolDispatcher ──► DocumentStore
//!               │
//!               ├──► InvocationLedger      (per-turn call record)
//!               ├──► ConversationHistory   (finalized exchanges)
//!               └──► SnapshotSender        (progress to the host UI)
//! ```

pub mod dispatch;
pub mod error;
pub mod export;
pub mod history;
pub mod ledger;
pub mod orchestrator;
pub mod progress;
pub mod prompt;
pub mod types;

pub use dispatch::{RetrievalCall, ToolDispatcher};
pub use error::DispatchError;
pub use export::{AGENT_VERSION, ConversationExport, ConversationMetadata, ExportMetadata};
pub use history::{ConversationHistory, HistoryEntry};
pub use ledger::{DispatchRecord, InvocationLedger};
pub use orchestrator::{MAX_ITERATIONS, Orchestrator, OrchestratorConfig};
pub use progress::{SnapshotReceiver, SnapshotSender, snapshot_channel};
pub use prompt::{DEFAULT_MODEL, SYSTEM_INSTRUCTION};
pub use types::{
    Confidence, InvocationId, InvocationStatus, MessageMetadata, ToolInvocation, Turn, TurnId,
    TurnMessage, TurnMetadata,
};
