//! The invocation ledger: the ordered, immutable record of tool calls
//! within a single turn.
//!
//! Sequence numbering is the ledger's responsibility: entries are numbered
//! `len + 1` at append time, which makes the 1-based gapless invariant hold
//! by construction.

use chrono::{DateTime, Utc};

use crate::types::{InvocationId, InvocationStatus, ToolInvocation};

/// The dispatcher's output for one completed call, before the ledger assigns
/// its identity and position.
#[derive(Debug, Clone)]
pub struct DispatchRecord {
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
    /// Success payload or error description.
    pub result: serde_json::Value,
}

/// Append-only ledger of tool invocations for one turn.
#[derive(Debug, Default)]
pub struct InvocationLedger {
    entries: Vec<ToolInvocation>,
}

impl InvocationLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a completed call, assigning its sequence number and id.
    ///
    /// Returns a reference to the stored entry; stored entries are never
    /// mutated afterwards.
    pub fn append(&mut self, record: DispatchRecord) -> &ToolInvocation {
        let entry = ToolInvocation {
            invocation_id: InvocationId::new(),
            sequence: self.entries.len() as u32 + 1,
            tool_name: record.tool_name,
            arguments: record.arguments,
            invoked_at: record.invoked_at,
            completed_at: record.completed_at,
            duration_ms: record.duration_ms,
            status: record.status,
            result: record.result,
        };
        self.entries.push(entry);
        self.entries.last().unwrap()
    }

    /// Get all entries in dispatch order.
    pub fn entries(&self) -> &[ToolInvocation] {
        &self.entries
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the ledger is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
