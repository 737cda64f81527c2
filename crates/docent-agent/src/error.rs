//! Error types for the agent crate.
//!
//! The orchestrator itself never returns an error: backend failures become
//! failed turns and tool failures become error-status ledger entries. The
//! only error type here describes a malformed tool request, and it too is
//! absorbed into ledger data by the dispatcher.

use thiserror::Error;

/// A tool request from the model that cannot be dispatched as asked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The model asked for a tool that does not exist.
    #[error("unknown tool '{0}': available tools are getTable, getOutline, getFull")]
    UnknownTool(String),

    /// A required argument was not supplied.
    #[error("missing required argument '{argument}' for tool '{tool}'")]
    MissingArgument {
        /// The tool that was called.
        tool: String,
        /// The argument that was missing.
        argument: &'static str,
    },

    /// A required argument was supplied but empty.
    #[error("argument '{argument}' for tool '{tool}' must be a non-empty string")]
    EmptyArgument {
        /// The tool that was called.
        tool: String,
        /// The offending argument.
        argument: &'static str,
    },
}
