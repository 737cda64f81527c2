//! The conversation history store.
//!
//! Append-only log of finalized user/model exchanges. Only the orchestrator's
//! finalization path writes here; failed turns leave no trace, so future
//! context replays from the last successful exchange.

use serde::{Deserialize, Serialize};

use docent_llm::{Message, Role};

/// One finalized history entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The author role.
    pub role: Role,
    /// The message text.
    pub content: String,
}

/// Append-only log of finalized exchanges for one conversation.
#[derive(Debug, Default)]
pub struct ConversationHistory {
    entries: Vec<HistoryEntry>,
}

impl ConversationHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finalized user/model exchange (two entries).
    pub fn append_exchange(&mut self, query: impl Into<String>, response: impl Into<String>) {
        self.entries.push(HistoryEntry {
            role: Role::User,
            content: query.into(),
        });
        self.entries.push(HistoryEntry {
            role: Role::Model,
            content: response.into(),
        });
    }

    /// Get all entries in order.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the history is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the history as backend context messages.
    pub fn to_messages(&self) -> Vec<Message> {
        self.entries
            .iter()
            .map(|entry| match entry.role {
                Role::User => Message::user(&entry.content),
                Role::Model => Message::model(&entry.content),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exchange_appends_pair() {
        let mut history = ConversationHistory::new();
        assert!(history.is_empty());

        history.append_exchange("Who is the CEO?", "Jane Doe. Source: leadership.md");

        assert_eq!(history.len(), 2);
        assert_eq!(history.entries()[0].role, Role::User);
        assert_eq!(history.entries()[1].role, Role::Model);
    }

    #[test]
    fn test_to_messages_preserves_order() {
        let mut history = ConversationHistory::new();
        history.append_exchange("first", "answer one");
        history.append_exchange("second", "answer two");

        let messages = history.to_messages();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].text(), "first");
        assert_eq!(messages[3].text(), "answer two");
    }
}
