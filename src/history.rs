//! Conversation history for a single run
//!
//! The history is append-only: turns are never edited or removed once pushed.

use serde::{Deserialize, Serialize};

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Output contract and tool listing
    System,
    /// The query, or a corrective instruction after a malformed reply
    User,
    /// Raw reply from the oracle
    Oracle,
    /// Result (or error notice) of a tool invocation
    ToolResult,
}

/// A single entry in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    /// Tool name, set only on tool-result turns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    /// True when a tool-result turn carries an error notice
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl Turn {
    pub fn system(content: impl Into<String>) -> Self {
        Self::plain(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(Role::User, content)
    }

    pub fn oracle(content: impl Into<String>) -> Self {
        Self::plain(Role::Oracle, content)
    }

    /// Successful tool output
    pub fn tool_output(tool: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::ToolResult,
            content: content.into(),
            tool: Some(tool.into()),
            is_error: false,
        }
    }

    /// Tool error notice (unknown tool or failed execution)
    pub fn tool_error(tool: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::ToolResult,
            content: content.into(),
            tool: Some(tool.into()),
            is_error: true,
        }
    }

    fn plain(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool: None,
            is_error: false,
        }
    }
}

/// Ordered, append-only sequence of turns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    turns: Vec<Turn>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Number of turns with the given role
    pub fn count(&self, role: Role) -> usize {
        self.turns.iter().filter(|t| t.role == role).count()
    }

    /// Turns after the leading system and user setup turns
    pub fn steps(&self) -> impl Iterator<Item = &Turn> {
        self.turns
            .iter()
            .skip_while(|t| matches!(t.role, Role::System))
            .skip(1)
    }
}
