//! Error types for reactloop
//!
//! Centralized error handling using thiserror. Run-level outcomes (budget
//! exhausted, parse failure, cancellation) are not errors: they are reported
//! through `RunResult`. This enum covers setup and programming errors.

use thiserror::Error;

/// All error types that can occur in reactloop
#[derive(Debug, Error)]
pub enum ReactError {
    /// Invalid loop or application configuration
    #[error("Config error: {0}")]
    Config(String),

    /// A tool with the same name is already registered
    #[error("Duplicate tool: {0}")]
    DuplicateTool(String),

    /// Requested tool is not in the registry
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Tool ran but reported a failure
    #[error("Tool '{tool}' failed: {message}")]
    ToolExecution { tool: String, message: String },

    /// Prompt template could not be registered or rendered
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Event not allowed in the current loop state
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for reactloop operations
pub type Result<T> = std::result::Result<T, ReactError>;
