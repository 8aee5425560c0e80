//! Strict parser for oracle replies
//!
//! A reply is made of labeled lines:
//!
//! ```text
//! Thought: <rationale>
//! Action: add(a=10, b="5")        or        Action: Finish[final answer]
//! Preference: <optional summary>
//! ```
//!
//! Exactly one `Action:` line must be present. Unlabeled lines are treated as
//! rationale. `Hobby:` is accepted as an alias for `Preference:`.

use std::sync::LazyLock;

use regex::Regex;

use super::OracleError;
use super::types::{ParsedAction, StepDecision};
use crate::tools::ToolArgs;

static LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(Thought|Action|Preference|Hobby)\s*[:：]\s*(.*?)\s*$").expect("label regex is valid")
});

static FINISH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^Finish\[(.*)\]$").expect("finish regex is valid"));

static CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^([A-Za-z_][A-Za-z0-9_]*)\s*\((.*)\)$").expect("call regex is valid")
});

static ARG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\A\s*([A-Za-z_][A-Za-z0-9_]*)\s*=\s*("(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.)*'|[^,\s()"'=]+)\s*"#)
        .expect("argument regex is valid")
});

/// Longest action excerpt quoted back in error messages
const EXCERPT_CHARS: usize = 80;

/// Parse a full oracle reply into a step decision
pub fn parse_decision(raw: &str) -> Result<StepDecision, OracleError> {
    let malformed = |reason: String| OracleError::Malformed {
        raw: raw.to_string(),
        reason,
    };

    let mut rationale: Vec<&str> = Vec::new();
    let mut action_lines: Vec<&str> = Vec::new();
    let mut preference: Option<String> = None;

    for line in raw.lines() {
        match LABEL.captures(line) {
            Some(caps) => {
                let value = caps.get(2).map_or("", |m| m.as_str());
                match &caps[1] {
                    "Action" => action_lines.push(value),
                    "Thought" => {
                        if !value.is_empty() {
                            rationale.push(value);
                        }
                    }
                    _ => {
                        if preference.is_none() && !value.is_empty() {
                            preference = Some(value.to_string());
                        }
                    }
                }
            }
            None => {
                let text = line.trim();
                if !text.is_empty() {
                    rationale.push(text);
                }
            }
        }
    }

    let action_line = match action_lines.as_slice() {
        [] => return Err(malformed("missing `Action:` line".to_string())),
        [line] => *line,
        lines => {
            return Err(malformed(format!(
                "expected exactly one `Action:` line, found {}",
                lines.len()
            )));
        }
    };

    let action = parse_action(action_line).into_action().map_err(malformed)?;

    Ok(StepDecision {
        rationale: rationale.join("\n"),
        action,
        preference,
        raw: raw.to_string(),
    })
}

/// Parse the text after `Action:` into a tagged action
pub fn parse_action(text: &str) -> ParsedAction {
    let text = strip_backticks(text.trim());
    if text.is_empty() {
        return ParsedAction::Malformed {
            reason: "empty action".to_string(),
        };
    }

    if let Some(caps) = FINISH.captures(text) {
        let answer = caps[1].trim();
        if answer.is_empty() {
            return ParsedAction::Malformed {
                reason: "Finish[] carries no answer".to_string(),
            };
        }
        return ParsedAction::Finish {
            answer: answer.to_string(),
        };
    }

    if let Some(caps) = CALL.captures(text) {
        let name = &caps[1];
        return match parse_args(&caps[2]) {
            Ok(args) => ParsedAction::ToolCall {
                name: name.to_string(),
                args,
            },
            Err(reason) => ParsedAction::Malformed {
                reason: format!("tool call '{}': {}", name, reason),
            },
        };
    }

    ParsedAction::Malformed {
        reason: format!(
            "action must be `tool_name(arg=\"value\")` or `Finish[answer]`, got '{}'",
            excerpt(text)
        ),
    }
}

/// Parse `a=1, b="two"` into named arguments
fn parse_args(input: &str) -> Result<ToolArgs, String> {
    let mut args = ToolArgs::new();
    if input.trim().is_empty() {
        return Ok(args);
    }

    let mut rest = input;
    loop {
        let caps = ARG
            .captures(rest)
            .ok_or_else(|| format!("invalid argument near '{}'", excerpt(rest.trim())))?;
        let end = caps.get(0).map_or(0, |m| m.end());
        let name = &caps[1];

        if args.insert(name, unquote(&caps[2])).is_some() {
            return Err(format!("duplicate argument '{}'", name));
        }

        rest = &rest[end..];
        if rest.is_empty() {
            return Ok(args);
        }
        match rest.strip_prefix(',') {
            Some(next) if !next.trim().is_empty() => rest = next,
            Some(_) => return Err("trailing ',' in argument list".to_string()),
            None => return Err(format!("expected ',' between arguments near '{}'", excerpt(rest))),
        }
    }
}

fn unquote(value: &str) -> String {
    let quoted = value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"')) || (value.starts_with('\'') && value.ends_with('\'')));
    if !quoted {
        return value.to_string();
    }

    let inner = &value[1..value.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn strip_backticks(text: &str) -> &str {
    text.strip_prefix('`')
        .and_then(|t| t.strip_suffix('`'))
        .map(str::trim)
        .unwrap_or(text)
}

fn excerpt(text: &str) -> String {
    if text.chars().count() <= EXCERPT_CHARS {
        text.to_string()
    } else {
        let cut: String = text.chars().take(EXCERPT_CHARS).collect();
        format!("{}...", cut)
    }
}
