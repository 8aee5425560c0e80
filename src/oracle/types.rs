//! Step decision types produced by the oracle

use serde::{Deserialize, Serialize};

use crate::tools::ToolArgs;

/// The single action requested by one oracle step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    /// Invoke tool `name` with `args`
    ToolCall { name: String, args: ToolArgs },
    /// Stop and return `answer`
    Finish { answer: String },
}

impl Action {
    pub fn is_finish(&self) -> bool {
        matches!(self, Action::Finish { .. })
    }
}

/// Result of parsing an action line
///
/// `Malformed` exists only at the parsing boundary; it never reaches the
/// loop as an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedAction {
    ToolCall { name: String, args: ToolArgs },
    Finish { answer: String },
    Malformed { reason: String },
}

impl ParsedAction {
    /// Convert into an `Action`, or the malformed reason
    pub fn into_action(self) -> Result<Action, String> {
        match self {
            ParsedAction::ToolCall { name, args } => Ok(Action::ToolCall { name, args }),
            ParsedAction::Finish { answer } => Ok(Action::Finish { answer }),
            ParsedAction::Malformed { reason } => Err(reason),
        }
    }
}

/// A well-formed oracle reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDecision {
    /// Free-text reasoning (the `Thought:` line plus any unlabeled text)
    pub rationale: String,
    pub action: Action,
    /// Optional summary of user preferences (the `Preference:` line)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preference: Option<String>,
    /// The reply text exactly as received
    pub raw: String,
}
