//! The tool dispatcher: maps requested tool calls onto document store
//! operations.
//!
//! This is the sole error-containment boundary for retrieval: whatever goes
//! wrong — an unknown tool name, a missing argument, a store failure — comes
//! back as a populated error-status record for the ledger, never as an
//! error the orchestrator has to handle. The model sees the failure text in
//! the next context and can adapt.

use std::time::Instant;

use chrono::Utc;

use docent_corpus::SharedStore;
use docent_llm::FunctionDeclaration;

use crate::error::DispatchError;
use crate::ledger::DispatchRecord;
use crate::types::InvocationStatus;

// ─────────────────────────────────────────────────────────────────────────────
// Retrieval Calls
// ─────────────────────────────────────────────────────────────────────────────

/// A validated retrieval request.
///
/// Tool names dispatch through this fixed union; anything that does not
/// parse into it is a malformed request, not a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetrievalCall {
    /// List all documents.
    Table,
    /// Fetch the outline of one document.
    Outline { id: String },
    /// Fetch the full content of one document.
    Full { id: String },
}

impl RetrievalCall {
    /// Parse a requested tool name and argument payload.
    pub fn parse(name: &str, args: &serde_json::Value) -> Result<Self, DispatchError> {
        match name {
            "getTable" => Ok(RetrievalCall::Table),
            "getOutline" => Ok(RetrievalCall::Outline {
                id: required_id(name, args)?,
            }),
            "getFull" => Ok(RetrievalCall::Full {
                id: required_id(name, args)?,
            }),
            other => Err(DispatchError::UnknownTool(other.to_string())),
        }
    }
}

/// Extract the required non-empty `id` argument.
fn required_id(tool: &str, args: &serde_json::Value) -> Result<String, DispatchError> {
    let id = args
        .get("id")
        .and_then(|v| v.as_str())
        .ok_or_else(|| DispatchError::MissingArgument {
            tool: tool.to_string(),
            argument: "id",
        })?;

    if id.trim().is_empty() {
        return Err(DispatchError::EmptyArgument {
            tool: tool.to_string(),
            argument: "id",
        });
    }

    Ok(id.to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tool Dispatcher
// ─────────────────────────────────────────────────────────────────────────────

/// Dispatches requested tool calls to the document store.
pub struct ToolDispatcher {
    store: SharedStore,
}

impl ToolDispatcher {
    /// Create a dispatcher over the given store.
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// The function declarations advertised to the backend.
    pub fn declarations() -> Vec<FunctionDeclaration> {
        vec![
            FunctionDeclaration::new(
                "getTable",
                "Retrieves a list of all available documents with their IDs and titles.",
                serde_json::json!({
                    "type": "object",
                    "properties": {}
                }),
            ),
            FunctionDeclaration::new(
                "getOutline",
                "Retrieves the outline (list of headings) for a specific document ID.",
                serde_json::json!({
                    "type": "object",
                    "properties": {
                        "id": {
                            "type": "string",
                            "description": "The unique ID of the document (e.g., \"company-overview\")"
                        }
                    },
                    "required": ["id"]
                }),
            ),
            FunctionDeclaration::new(
                "getFull",
                "Retrieves the full markdown content of a specific document ID.",
                serde_json::json!({
                    "type": "object",
                    "properties": {
                        "id": {
                            "type": "string",
                            "description": "The unique ID of the document."
                        }
                    },
                    "required": ["id"]
                }),
            ),
        ]
    }

    /// Execute one requested call and return a populated record.
    ///
    /// Never fails: malformed requests and store errors become error-status
    /// records whose result explains what went wrong.
    pub async fn dispatch(&self, tool_name: &str, arguments: serde_json::Value) -> DispatchRecord {
        let invoked_at = Utc::now();
        let started = Instant::now();

        tracing::debug!(tool = tool_name, "Dispatching tool call");

        let outcome = match RetrievalCall::parse(tool_name, &arguments) {
            Ok(RetrievalCall::Table) => self
                .store
                .list_documents()
                .await
                .map(|docs| serde_json::json!({ "documents": docs }))
                .map_err(|e| e.to_string()),
            Ok(RetrievalCall::Outline { id }) => self
                .store
                .get_outline(&id)
                .await
                .map(|doc| serde_json::json!({ "outline": doc }))
                .map_err(|e| e.to_string()),
            Ok(RetrievalCall::Full { id }) => self
                .store
                .get_full(&id)
                .await
                .map(|doc| serde_json::json!({ "content": doc }))
                .map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        let duration_ms = started.elapsed().as_millis() as u64;
        let completed_at = Utc::now();

        let (status, result) = match outcome {
            Ok(result) => (InvocationStatus::Success, result),
            Err(message) => {
                tracing::warn!(tool = tool_name, error = %message, "Tool call failed");
                (
                    InvocationStatus::Error,
                    serde_json::json!({ "error": message }),
                )
            }
        };

        DispatchRecord {
            tool_name: tool_name.to_string(),
            arguments,
            invoked_at,
            completed_at,
            duration_ms,
            status,
            result,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use docent_corpus::{Document, MemoryDocumentStore};

    fn dispatcher() -> ToolDispatcher {
        let store = MemoryDocumentStore::with_docs(vec![
            Document::new("leadership", "Leadership")
                .with_outline(vec!["# Team".to_string()])
                .with_content("# Team\nJane Doe is CEO."),
        ]);
        ToolDispatcher::new(Arc::new(store))
    }

    #[test]
    fn test_parse_table() {
        let call = RetrievalCall::parse("getTable", &serde_json::json!({})).unwrap();
        assert_eq!(call, RetrievalCall::Table);
    }

    #[test]
    fn test_parse_outline_requires_id() {
        let err = RetrievalCall::parse("getOutline", &serde_json::json!({})).unwrap_err();
        assert!(matches!(err, DispatchError::MissingArgument { .. }));

        let err =
            RetrievalCall::parse("getOutline", &serde_json::json!({"id": "  "})).unwrap_err();
        assert!(matches!(err, DispatchError::EmptyArgument { .. }));

        let call =
            RetrievalCall::parse("getOutline", &serde_json::json!({"id": "leadership"})).unwrap();
        assert_eq!(
            call,
            RetrievalCall::Outline {
                id: "leadership".to_string()
            }
        );
    }

    #[test]
    fn test_parse_unknown_tool() {
        let err = RetrievalCall::parse("deleteEverything", &serde_json::json!({})).unwrap_err();
        assert!(matches!(err, DispatchError::UnknownTool(_)));
    }

    #[test]
    fn test_declarations_cover_all_three_tools() {
        let decls = ToolDispatcher::declarations();
        let names: Vec<&str> = decls.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["getTable", "getOutline", "getFull"]);
        assert_eq!(decls[1].parameters["required"][0], "id");
    }

    #[tokio::test]
    async fn test_dispatch_table() {
        let record = dispatcher().dispatch("getTable", serde_json::json!({})).await;
        assert_eq!(record.status, InvocationStatus::Success);
        assert_eq!(record.result["documents"][0]["id"], "leadership");
        // Listing carries no content.
        assert!(record.result["documents"][0].get("content").is_none());
    }

    #[tokio::test]
    async fn test_dispatch_full() {
        let record = dispatcher()
            .dispatch("getFull", serde_json::json!({"id": "leadership"}))
            .await;
        assert_eq!(record.status, InvocationStatus::Success);
        assert!(
            record.result["content"]["content"]
                .as_str()
                .unwrap()
                .contains("Jane Doe")
        );
    }

    #[tokio::test]
    async fn test_dispatch_not_found_is_error_record() {
        let record = dispatcher()
            .dispatch("getFull", serde_json::json!({"id": "payroll"}))
            .await;
        assert_eq!(record.status, InvocationStatus::Error);
        assert!(
            record.result["error"]
                .as_str()
                .unwrap()
                .contains("payroll")
        );
    }

    #[tokio::test]
    async fn test_dispatch_unknown_tool_is_error_record() {
        let record = dispatcher()
            .dispatch("getEverything", serde_json::json!({}))
            .await;
        assert_eq!(record.status, InvocationStatus::Error);
        let message = record.result["error"].as_str().unwrap();
        assert!(message.contains("getEverything"));
        assert!(message.contains("getTable"));
    }

    #[tokio::test]
    async fn test_dispatch_missing_argument_is_error_record() {
        let record = dispatcher().dispatch("getOutline", serde_json::json!({})).await;
        assert_eq!(record.status, InvocationStatus::Error);
        assert!(record.result["error"].as_str().unwrap().contains("'id'"));
    }
}
