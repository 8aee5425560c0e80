//! Oracle layer - turns a conversation history into the next step decision
//!
//! This module provides:
//! - `Oracle` trait consumed by the reasoning loop
//! - Step decision types and the strict reply parser
//! - `ChatClient` seam plus the `ChatOracle` adapter
//! - `ScriptedChatClient` for replaying canned replies

pub mod chat;
pub mod parser;
pub mod scripted;
pub mod types;

pub use chat::{ChatClient, ChatMessage, ChatOracle, ChatRole};
pub use parser::{parse_action, parse_decision};
pub use scripted::ScriptedChatClient;
pub use types::{Action, ParsedAction, StepDecision};

use async_trait::async_trait;

use crate::history::History;

/// Decides the next step of a run
///
/// Implementations are typically backed by a language model, so calls may be
/// nondeterministic and must not be assumed idempotent.
#[async_trait]
pub trait Oracle: Send + Sync {
    async fn decide(&self, history: &History) -> Result<StepDecision, OracleError>;
}

/// Errors an oracle can report
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    /// The reply did not match the Thought / Action / Preference contract
    #[error("Malformed oracle reply: {reason}")]
    Malformed { raw: String, reason: String },

    /// The backing client failed
    #[error("Oracle backend failed: {0}")]
    Backend(String),
}
