//! Runner module - the reasoning loop and its results.
//!
//! This module provides:
//! - ReasoningLoop for executing a single query
//! - LoopState and LoopEvent, the explicit state machine driving each step
//! - RunResult and RunReport for representing what a run produced

mod loop_runner;
mod outcome;
mod state;

pub use loop_runner::{LoopConfig, ReasoningLoop};
pub use outcome::{AbortReason, RunReport, RunResult};
pub use state::{LoopEvent, LoopState, Termination};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_exports() {
        let result = RunResult::Aborted {
            reason: AbortReason::Cancelled,
        };
        assert_eq!(result.termination(), Termination::Cancelled);
        assert!(!LoopState::default().is_terminal());
    }
}
