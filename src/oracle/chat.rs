//! Chat-completion seam and the oracle adapter built on it
//!
//! The network client itself is an external collaborator: anything that can
//! turn a list of chat messages into reply text implements `ChatClient`.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};

use super::parser::parse_decision;
use super::types::StepDecision;
use super::{Oracle, OracleError};
use crate::history::{History, Role};

/// Role of a chat message as seen by a chat-completion API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A message sent to the chat client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Chat-completion client - one request, one reply text
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, OracleError>;
}

#[async_trait]
impl<C: ChatClient + ?Sized> ChatClient for Arc<C> {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, OracleError> {
        (**self).complete(messages).await
    }
}

/// Oracle that renders the history as chat messages and parses the reply
pub struct ChatOracle<C: ChatClient> {
    client: C,
}

impl<C: ChatClient> ChatOracle<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Map history turns onto chat roles; tool results become observations
    pub fn to_messages(history: &History) -> Vec<ChatMessage> {
        history
            .turns()
            .iter()
            .map(|turn| match turn.role {
                Role::System => ChatMessage::system(turn.content.clone()),
                Role::User => ChatMessage::user(turn.content.clone()),
                Role::Oracle => ChatMessage::assistant(turn.content.clone()),
                Role::ToolResult => ChatMessage::user(format!("Observation: {}", turn.content)),
            })
            .collect()
    }
}

#[async_trait]
impl<C: ChatClient> Oracle for ChatOracle<C> {
    async fn decide(&self, history: &History) -> Result<StepDecision, OracleError> {
        let messages = Self::to_messages(history);
        debug!("Sending {} messages to chat client", messages.len());
        let reply = self.client.complete(messages).await?;
        parse_decision(&reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::Turn;
    use crate::oracle::types::Action;
    use crate::oracle::ScriptedChatClient;

    fn sample_history() -> History {
        let mut history = History::new();
        history.push(Turn::system("contract"));
        history.push(Turn::user("10 + 5?"));
        history.push(Turn::oracle("Action: add(a=10, b=5)"));
        history.push(Turn::tool_output("add", "15"));
        history
    }

    #[test]
    fn test_chat_role_serialization() {
        assert_eq!(serde_json::to_string(&ChatRole::Assistant).unwrap(), "\"assistant\"");
    }

    #[test]
    fn test_to_messages_maps_roles() {
        let messages = ChatOracle::<ScriptedChatClient>::to_messages(&sample_history());

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0], ChatMessage::system("contract"));
        assert_eq!(messages[1], ChatMessage::user("10 + 5?"));
        assert_eq!(messages[2].role, ChatRole::Assistant);
        assert_eq!(messages[3], ChatMessage::user("Observation: 15"));
    }

    #[tokio::test]
    async fn test_decide_parses_reply() {
        let client = ScriptedChatClient::new(vec!["Thought: done\nAction: Finish[15]".to_string()]);
        let oracle = ChatOracle::new(client);

        let decision = oracle.decide(&sample_history()).await.unwrap();
        assert_eq!(decision.action, Action::Finish { answer: "15".to_string() });
        assert_eq!(oracle.client().calls(), 1);
    }

    #[tokio::test]
    async fn test_decide_reports_malformed_reply() {
        let client = ScriptedChatClient::new(vec!["I am not following the format".to_string()]);
        let oracle = ChatOracle::new(client);

        let err = oracle.decide(&sample_history()).await.unwrap_err();
        assert!(matches!(err, OracleError::Malformed { .. }));
    }

    #[tokio::test]
    async fn test_decide_propagates_backend_error() {
        let oracle = ChatOracle::new(ScriptedChatClient::new(vec![]));
        let err = oracle.decide(&sample_history()).await.unwrap_err();
        assert!(matches!(err, OracleError::Backend(_)));
    }

    #[tokio::test]
    async fn test_arc_client_is_shared() {
        let client = Arc::new(ScriptedChatClient::new(vec!["Action: Finish[ok]".to_string()]));
        let oracle = ChatOracle::new(Arc::clone(&client));

        oracle.decide(&History::new()).await.unwrap();
        assert_eq!(client.calls(), 1);
    }
}
