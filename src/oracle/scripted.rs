//! Scripted chat client - replays canned replies in order
//!
//! Used by tests and by the CLI to drive a run deterministically without a
//! network model. Every request is recorded so callers can inspect exactly
//! what the oracle was shown.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use super::chat::{ChatClient, ChatMessage};
use super::OracleError;
use crate::error::Result;

pub struct ScriptedChatClient {
    replies: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedChatClient {
    pub fn new(replies: Vec<String>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Load replies from a YAML list of strings
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let replies: Vec<String> = serde_yaml::from_str(content)?;
        Ok(Self::new(replies))
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Number of completion requests received so far
    pub fn calls(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Replies not yet consumed
    pub fn remaining(&self) -> usize {
        self.replies.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Snapshot of every request received, oldest first
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ChatClient for ScriptedChatClient {
    async fn complete(&self, messages: Vec<ChatMessage>) -> std::result::Result<String, OracleError> {
        let served = {
            let mut requests = self
                .requests
                .lock()
                .map_err(|e| OracleError::Backend(format!("request log poisoned: {}", e)))?;
            requests.push(messages);
            requests.len()
        };

        let mut replies = self
            .replies
            .lock()
            .map_err(|e| OracleError::Backend(format!("reply queue poisoned: {}", e)))?;
        replies
            .pop_front()
            .ok_or_else(|| OracleError::Backend(format!("script exhausted at request {}", served)))
    }
}
