//! Run results and the report handed back to the caller

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::state::Termination;
use crate::history::History;

/// Why a run stopped without a final answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AbortReason {
    /// Step budget spent without a `Finish` action
    BudgetExceeded { max_steps: usize },
    /// Oracle kept replying outside the contract
    ParseFailure { reason: String, raw: String },
    /// The oracle's backing client failed
    OracleFailure { message: String },
    Cancelled,
}

impl AbortReason {
    pub fn termination(&self) -> Termination {
        match self {
            AbortReason::BudgetExceeded { .. } => Termination::BudgetExceeded,
            AbortReason::ParseFailure { .. } => Termination::ParseFailure,
            AbortReason::OracleFailure { .. } => Termination::OracleFailure,
            AbortReason::Cancelled => Termination::Cancelled,
        }
    }
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::BudgetExceeded { max_steps } => {
                write!(f, "step budget of {} exhausted without a final answer", max_steps)
            }
            AbortReason::ParseFailure { reason, .. } => write!(f, "unrecoverable parse failure: {}", reason),
            AbortReason::OracleFailure { message } => write!(f, "oracle failed: {}", message),
            AbortReason::Cancelled => write!(f, "run cancelled"),
        }
    }
}

/// Final answer or abort reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunResult {
    Success { answer: String },
    Aborted { reason: AbortReason },
}

impl RunResult {
    pub fn is_success(&self) -> bool {
        matches!(self, RunResult::Success { .. })
    }

    pub fn answer(&self) -> Option<&str> {
        match self {
            RunResult::Success { answer } => Some(answer),
            RunResult::Aborted { .. } => None,
        }
    }

    pub fn abort_reason(&self) -> Option<&AbortReason> {
        match self {
            RunResult::Success { .. } => None,
            RunResult::Aborted { reason } => Some(reason),
        }
    }

    pub fn termination(&self) -> Termination {
        match self {
            RunResult::Success { .. } => Termination::Success,
            RunResult::Aborted { reason } => reason.termination(),
        }
    }
}

/// Everything a run produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub result: RunResult,
    pub history: History,
    /// Number of oracle calls made, malformed replies included
    pub oracle_calls: usize,
    /// Most recent preference summary reported by the oracle
    pub preference: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    /// Wall-clock duration of the run
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}
