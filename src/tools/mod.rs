//! Tool system - capabilities the reasoning loop may invoke
//!
//! A tool takes a mapping of named string arguments and returns text or a
//! `ToolError`. Tools are registered in a `ToolRegistry` before a run starts
//! and are read-only for the duration of every run.

mod calculator;
mod function;
mod registry;

pub use calculator::{AddTool, DivideTool, MultiplyTool, SubtractTool};
pub use function::FnTool;
pub use registry::ToolRegistry;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A capability that can be called by the oracle
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (matches the function name in an `Action:` line)
    fn name(&self) -> &str;

    /// Human-readable description shown to the oracle
    fn description(&self) -> &str;

    /// Execute the tool
    async fn execute(&self, args: &ToolArgs) -> Result<String, ToolError>;
}

/// Errors a tool can report
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolError {
    #[error("missing required argument '{name}'")]
    MissingArgument { name: String },

    #[error("invalid value '{value}' for argument '{name}': {reason}")]
    InvalidArgument { name: String, value: String, reason: String },

    #[error("{0}")]
    Failed(String),
}

/// Name and description pair used for prompting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescription {
    pub name: String,
    pub description: String,
}

/// Named string arguments for a tool call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolArgs(BTreeMap<String, String>);

impl ToolArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Insert an argument, returning the previous value if the name was present
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Get an argument or fail with `MissingArgument`
    pub fn require(&self, name: &str) -> Result<&str, ToolError> {
        self.get(name).ok_or_else(|| ToolError::MissingArgument { name: name.to_string() })
    }

    /// Parse a required argument into any `FromStr` type
    pub fn number<T>(&self, name: &str) -> Result<T, ToolError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        let value = self.require(name)?;
        value.trim().parse().map_err(|e: T::Err| ToolError::InvalidArgument {
            name: name.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ToolArgs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl fmt::Display for ToolArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{}={:?}", k, v)).collect();
        write!(f, "{}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_args_builder_and_get() {
        let args = ToolArgs::new().with("a", "10").with("b", "5");
        assert_eq!(args.len(), 2);
        assert_eq!(args.get("a"), Some("10"));
        assert_eq!(args.get("c"), None);
    }

    #[test]
    fn test_tool_args_require_missing() {
        let args = ToolArgs::new();
        let err = args.require("city").unwrap_err();
        assert_eq!(err, ToolError::MissingArgument { name: "city".to_string() });
        assert_eq!(err.to_string(), "missing required argument 'city'");
    }

    #[test]
    fn test_tool_args_number() {
        let args = ToolArgs::new().with("a", " 42 ").with("b", "abc");
        assert_eq!(args.number::<i64>("a").unwrap(), 42);
        assert_eq!(args.number::<f64>("a").unwrap(), 42.0);

        let err = args.number::<f64>("b").unwrap_err();
        assert!(matches!(err, ToolError::InvalidArgument { .. }));
        assert!(err.to_string().contains("'abc'"));
    }

    #[test]
    fn test_tool_args_from_iter_and_display() {
        let args: ToolArgs = vec![("b", "2"), ("a", "1")].into_iter().collect();
        // BTreeMap ordering makes display deterministic
        assert_eq!(args.to_string(), "a=\"1\", b=\"2\"");
    }

    #[test]
    fn test_tool_args_serialize_transparent() {
        let args = ToolArgs::new().with("city", "Beijing");
        let json = serde_json::to_value(&args).unwrap();
        assert_eq!(json, serde_json::json!({"city": "Beijing"}));
    }
}
