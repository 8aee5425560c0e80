//! Reactloop - a tool-augmented reasoning loop
//!
//! Reactloop alternates between asking an oracle (usually a language model)
//! for the next step and executing the tool it picked, feeding each
//! observation back until the oracle produces a final answer or the step
//! budget runs out.

pub mod error;
pub mod history;
pub mod oracle;
pub mod prompt;
pub mod runner;
pub mod tools;

pub use error::{ReactError, Result};
pub use history::{History, Role, Turn};
pub use oracle::{Action, Oracle, OracleError, StepDecision};
pub use runner::{AbortReason, LoopConfig, ReasoningLoop, RunReport, RunResult};
pub use tools::{Tool, ToolArgs, ToolError, ToolRegistry};
