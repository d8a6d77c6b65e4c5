//! Conversation history
//!
//! The model-visible history of one run: an append-only sequence of
//! role-tagged entries. Entries are never rewritten, only appended, so
//! replaying from index 0 always reconstructs exactly what the model saw.
//! A [`Conversation`] is owned by a single run and never shared between
//! concurrent runs.

use serde::{Deserialize, Serialize};

/// Author of a conversation entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    /// Provider-authored entry carrying a tool result
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

/// One entry in the model-visible history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnEntry {
    pub role: Role,
    pub content: String,
}

impl TurnEntry {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn tool(content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: content.into(),
        }
    }
}

/// Append-only sequence of [`TurnEntry`] values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Conversation {
    entries: Vec<TurnEntry>,
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn with_system_prompt(prompt: impl Into<String>) -> Self {
        let mut conversation = Self::new();
        conversation.append(TurnEntry::system(prompt));
        conversation
    }

    /// Append one entry. There is deliberately no way to mutate or remove
    /// existing entries.
    pub fn append(&mut self, entry: TurnEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TurnEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&TurnEntry> {
        self.entries.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TurnEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_constructors() {
        assert_eq!(TurnEntry::user("hi").role, Role::User);
        assert_eq!(TurnEntry::assistant("hello").role, Role::Assistant);
        assert_eq!(TurnEntry::tool("result").role, Role::Tool);
        assert_eq!(TurnEntry::system("be brief").role, Role::System);
    }

    #[test]
    fn test_append_preserves_order() {
        let mut conversation = Conversation::with_system_prompt("be brief");
        conversation.append(TurnEntry::user("what's on my calendar?"));
        conversation.append(TurnEntry::assistant("Let me check. "));
        conversation.append(TurnEntry::tool("2 events"));

        let roles: Vec<Role> = conversation.iter().map(|e| e.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant, Role::Tool]);
        assert_eq!(conversation.last().unwrap().content, "2 events");
    }

    #[test]
    fn test_replay_reconstructs_history() {
        let mut conversation = Conversation::new();
        conversation.append(TurnEntry::user("a"));
        conversation.append(TurnEntry::assistant("b"));

        let mut replayed = Conversation::new();
        for entry in conversation.entries() {
            replayed.append(entry.clone());
        }
        assert_eq!(replayed.entries(), conversation.entries());
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Tool).unwrap(), "\"tool\"");
        assert_eq!(Role::Assistant.as_str(), "assistant");
    }
}
