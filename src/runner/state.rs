//! Loop state machine
//!
//! Every step of a run is expressed as a `LoopEvent` applied to the current
//! `LoopState`. Terminated states are absorbing: applying any event to them
//! is an `InvalidTransition` error.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ReactError, Result};

/// How a run terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    Success,
    BudgetExceeded,
    ParseFailure,
    OracleFailure,
    Cancelled,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Termination::Success => "success",
            Termination::BudgetExceeded => "budget-exceeded",
            Termination::ParseFailure => "parse-failure",
            Termination::OracleFailure => "oracle-failure",
            Termination::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

/// Current position of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopState {
    /// Waiting for the oracle's next decision
    #[default]
    AwaitingDecision,
    /// A tool call was decided and is being executed
    ToolDispatch,
    Terminated(Termination),
}

/// Something that happened during a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopEvent {
    FinishDecided,
    ToolCallDecided,
    /// Tool output or error notice was appended
    ToolObserved,
    /// Oracle reply could not be parsed; `retry` is false once retries are spent
    ParseFailed { retry: bool },
    BudgetExhausted,
    OracleFailed,
    Cancelled,
}

impl LoopState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoopState::Terminated(_))
    }

    pub fn termination(&self) -> Option<Termination> {
        match self {
            LoopState::Terminated(t) => Some(*t),
            _ => None,
        }
    }

    /// Apply an event, returning the next state
    pub fn transition(self, event: LoopEvent) -> Result<LoopState> {
        use LoopEvent as E;
        use LoopState as S;

        let next = match (self, event) {
            (S::Terminated(t), _) => {
                return Err(ReactError::InvalidTransition(format!(
                    "{:?} on terminated state ({}) is not allowed",
                    event, t
                )));
            }
            (S::AwaitingDecision, E::FinishDecided) => S::Terminated(Termination::Success),
            (S::AwaitingDecision, E::ToolCallDecided) => S::ToolDispatch,
            (S::AwaitingDecision, E::ParseFailed { retry: true }) => S::AwaitingDecision,
            (S::AwaitingDecision, E::ParseFailed { retry: false }) => S::Terminated(Termination::ParseFailure),
            (S::AwaitingDecision, E::BudgetExhausted) => S::Terminated(Termination::BudgetExceeded),
            (S::AwaitingDecision, E::OracleFailed) => S::Terminated(Termination::OracleFailure),
            (S::ToolDispatch, E::ToolObserved) => S::AwaitingDecision,
            (_, E::Cancelled) => S::Terminated(Termination::Cancelled),
            (state, event) => {
                return Err(ReactError::InvalidTransition(format!(
                    "{:?} is not allowed in state {:?}",
                    event, state
                )));
            }
        };
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_EVENTS: [LoopEvent; 8] = [
        LoopEvent::FinishDecided,
        LoopEvent::ToolCallDecided,
        LoopEvent::ToolObserved,
        LoopEvent::ParseFailed { retry: true },
        LoopEvent::ParseFailed { retry: false },
        LoopEvent::BudgetExhausted,
        LoopEvent::OracleFailed,
        LoopEvent::Cancelled,
    ];

    #[test]
    fn test_initial_state() {
        assert_eq!(LoopState::default(), LoopState::AwaitingDecision);
        assert!(!LoopState::default().is_terminal());
    }

    #[test]
    fn test_tool_round_trip() {
        let state = LoopState::AwaitingDecision
            .transition(LoopEvent::ToolCallDecided)
            .unwrap();
        assert_eq!(state, LoopState::ToolDispatch);

        let state = state.transition(LoopEvent::ToolObserved).unwrap();
        assert_eq!(state, LoopState::AwaitingDecision);
    }

    #[test]
    fn test_finish_terminates_with_success() {
        let state = LoopState::AwaitingDecision.transition(LoopEvent::FinishDecided).unwrap();
        assert_eq!(state.termination(), Some(Termination::Success));
    }

    #[test]
    fn test_parse_failure_retry_and_abort() {
        let state = LoopState::AwaitingDecision
            .transition(LoopEvent::ParseFailed { retry: true })
            .unwrap();
        assert_eq!(state, LoopState::AwaitingDecision);

        let state = state.transition(LoopEvent::ParseFailed { retry: false }).unwrap();
        assert_eq!(state.termination(), Some(Termination::ParseFailure));
    }

    #[test]
    fn test_abort_events() {
        let cases = [
            (LoopEvent::BudgetExhausted, Termination::BudgetExceeded),
            (LoopEvent::OracleFailed, Termination::OracleFailure),
            (LoopEvent::Cancelled, Termination::Cancelled),
        ];
        for (event, expected) in cases {
            let state = LoopState::AwaitingDecision.transition(event).unwrap();
            assert_eq!(state.termination(), Some(expected));
        }
    }

    #[test]
    fn test_cancel_during_dispatch() {
        let state = LoopState::ToolDispatch.transition(LoopEvent::Cancelled).unwrap();
        assert_eq!(state.termination(), Some(Termination::Cancelled));
    }

    #[test]
    fn test_dispatch_rejects_decisions() {
        for event in [LoopEvent::FinishDecided, LoopEvent::ToolCallDecided, LoopEvent::BudgetExhausted] {
            let err = LoopState::ToolDispatch.transition(event).unwrap_err();
            assert!(matches!(err, ReactError::InvalidTransition(_)));
        }
    }

    #[test]
    fn test_awaiting_rejects_tool_observed() {
        assert!(LoopState::AwaitingDecision.transition(LoopEvent::ToolObserved).is_err());
    }

    #[test]
    fn test_terminated_states_are_absorbing() {
        let terminals = [
            Termination::Success,
            Termination::BudgetExceeded,
            Termination::ParseFailure,
            Termination::OracleFailure,
            Termination::Cancelled,
        ];
        for termination in terminals {
            for event in ALL_EVENTS {
                let err = LoopState::Terminated(termination).transition(event).unwrap_err();
                assert!(matches!(err, ReactError::InvalidTransition(_)));
            }
        }
    }

    #[test]
    fn test_termination_display() {
        assert_eq!(Termination::BudgetExceeded.to_string(), "budget-exceeded");
        assert_eq!(Termination::Success.to_string(), "success");
    }
}
