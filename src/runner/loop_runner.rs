//! Reasoning loop implementation - think, act, observe until a final answer.
//!
//! Each step asks the oracle for a decision given the full history so far.
//! A tool call is dispatched and its output (or error notice) is appended as
//! an observation; a `Finish` action ends the run. Runs are bounded by a step
//! budget and can be cancelled between steps.

use std::sync::Arc;

use chrono::Utc;
use log::{debug, info, warn};
use tokio_util::sync::CancellationToken;

use super::outcome::{AbortReason, RunReport, RunResult};
use super::state::{LoopEvent, LoopState};
use crate::error::{ReactError, Result};
use crate::history::{History, Turn};
use crate::oracle::{Action, Oracle, OracleError};
use crate::prompt::{PromptRenderer, correction};
use crate::tools::{ToolArgs, ToolRegistry};

/// Configuration for the ReasoningLoop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopConfig {
    /// Maximum oracle calls per run, malformed replies included
    pub max_steps: usize,
    /// Consecutive malformed replies tolerated before aborting
    pub parse_retries: u32,
    /// Handlebars template for the system prompt; the default is used when unset
    pub system_template: Option<String>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            max_steps: 8,
            parse_retries: 1,
            system_template: None,
        }
    }
}

impl LoopConfig {
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_parse_retries(mut self, parse_retries: u32) -> Self {
        self.parse_retries = parse_retries;
        self
    }

    pub fn with_system_template(mut self, template: impl Into<String>) -> Self {
        self.system_template = Some(template.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_steps == 0 {
            return Err(ReactError::Config("max_steps must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Runs the think/act/observe loop against an oracle and a tool registry.
///
/// The loop holds no per-run state: every call to `run` starts from a fresh
/// history, so one instance can serve many queries.
pub struct ReasoningLoop<O>
where
    O: Oracle + ?Sized,
{
    /// Decides each step
    oracle: Arc<O>,
    /// Tools the oracle may call, read-only during runs
    registry: Arc<ToolRegistry>,
    /// Renders the system prompt
    renderer: PromptRenderer,
    config: LoopConfig,
    cancel: Option<CancellationToken>,
}

impl<O> ReasoningLoop<O>
where
    O: Oracle + ?Sized,
{
    /// Create a loop with the default configuration.
    pub fn new(oracle: Arc<O>, registry: Arc<ToolRegistry>) -> Self {
        Self {
            oracle,
            registry,
            renderer: PromptRenderer::new(),
            config: LoopConfig::default(),
            cancel: None,
        }
    }

    /// Create a loop with a custom configuration.
    pub fn with_config(oracle: Arc<O>, registry: Arc<ToolRegistry>, config: LoopConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            oracle,
            registry,
            renderer: PromptRenderer::new(),
            config,
            cancel: None,
        })
    }

    /// Stop runs between steps once `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Render the system turn that opens every run.
    pub fn system_prompt(&self) -> Result<String> {
        self.renderer.render_system(
            self.config.system_template.as_deref(),
            &self.registry.describe_all(),
            self.config.max_steps,
        )
    }

    /// Run the loop for one query.
    ///
    /// Budget exhaustion, parse failures, oracle failures and cancellation are
    /// reported in the returned `RunReport`; `Err` means the loop itself could
    /// not run (for example a broken system template).
    pub async fn run(&self, query: &str) -> Result<RunReport> {
        let started_at = Utc::now();
        let max_steps = self.config.max_steps;

        let mut history = History::new();
        history.push(Turn::system(self.system_prompt()?));
        history.push(Turn::user(query));
        info!("Starting run: max_steps={}, tools={}", max_steps, self.registry.len());

        let mut state = LoopState::default();
        let mut oracle_calls = 0usize;
        let mut parse_failures = 0u32;
        let mut preference: Option<String> = None;

        let result = loop {
            if self.is_cancelled() {
                state = state.transition(LoopEvent::Cancelled)?;
                info!("Run cancelled after {} oracle calls", oracle_calls);
                break RunResult::Aborted {
                    reason: AbortReason::Cancelled,
                };
            }

            if oracle_calls >= max_steps {
                state = state.transition(LoopEvent::BudgetExhausted)?;
                warn!("Step budget of {} exhausted without a final answer", max_steps);
                break RunResult::Aborted {
                    reason: AbortReason::BudgetExceeded { max_steps },
                };
            }

            oracle_calls += 1;
            debug!("Step {}/{}: consulting oracle", oracle_calls, max_steps);

            let decision = match self.oracle.decide(&history).await {
                Ok(decision) => decision,
                Err(OracleError::Malformed { raw, reason }) => {
                    history.push(Turn::oracle(raw.clone()));
                    parse_failures += 1;
                    let retry = parse_failures <= self.config.parse_retries;
                    state = state.transition(LoopEvent::ParseFailed { retry })?;

                    if !retry {
                        warn!("Giving up after {} consecutive malformed replies: {}", parse_failures, reason);
                        break RunResult::Aborted {
                            reason: AbortReason::ParseFailure { reason, raw },
                        };
                    }

                    warn!("Malformed oracle reply, requesting correction: {}", reason);
                    history.push(Turn::user(correction(&reason)));
                    continue;
                }
                Err(OracleError::Backend(message)) => {
                    state = state.transition(LoopEvent::OracleFailed)?;
                    warn!("Oracle failed: {}", message);
                    break RunResult::Aborted {
                        reason: AbortReason::OracleFailure { message },
                    };
                }
            };

            parse_failures = 0;
            history.push(Turn::oracle(decision.raw));
            if decision.preference.is_some() {
                preference = decision.preference;
            }

            match decision.action {
                Action::Finish { answer } => {
                    state = state.transition(LoopEvent::FinishDecided)?;
                    info!("Run finished with an answer after {} oracle calls", oracle_calls);
                    break RunResult::Success { answer };
                }
                Action::ToolCall { name, args } => {
                    state = state.transition(LoopEvent::ToolCallDecided)?;
                    if self.is_cancelled() {
                        state = state.transition(LoopEvent::Cancelled)?;
                        info!("Run cancelled before invoking '{}'", name);
                        break RunResult::Aborted {
                            reason: AbortReason::Cancelled,
                        };
                    }
                    history.push(self.dispatch(&name, &args).await);
                    state = state.transition(LoopEvent::ToolObserved)?;
                }
            }
        };

        if state.termination() != Some(result.termination()) {
            return Err(ReactError::InvalidTransition(format!(
                "run ended in state {:?} but reported {}",
                state,
                result.termination()
            )));
        }

        Ok(RunReport {
            result,
            history,
            oracle_calls,
            preference,
            started_at,
            finished_at: Utc::now(),
        })
    }

    /// Invoke a tool and turn the outcome into an observation.
    ///
    /// Unknown tools and execution failures never abort the run; the error
    /// text is shown to the oracle instead.
    async fn dispatch(&self, name: &str, args: &ToolArgs) -> Turn {
        debug!("Invoking tool '{}' with {}", name, args);
        match self.registry.invoke(name, args).await {
            Ok(output) => {
                debug!("Tool '{}' returned {} bytes", name, output.len());
                Turn::tool_output(name, output)
            }
            Err(err @ ReactError::UnknownTool(_)) => {
                warn!("Oracle requested unknown tool '{}'", name);
                Turn::tool_error(name, format!("Error: {}. Available tools: {}", err, self.available_tools()))
            }
            Err(err) => {
                warn!("{}", err);
                Turn::tool_error(name, format!("Error: {}", err))
            }
        }
    }

    fn available_tools(&self) -> String {
        let names = self.registry.names();
        if names.is_empty() {
            "(none)".to_string()
        } else {
            names.join(", ")
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }
}
