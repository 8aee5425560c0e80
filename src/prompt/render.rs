//! Prompt Renderer - Render the system prompt and corrective messages using Handlebars

use handlebars::Handlebars;
use serde::Serialize;

use crate::error::{ReactError, Result};
use crate::tools::ToolDescription;

/// Default system prompt: output contract, tool listing and step limit
pub const DEFAULT_SYSTEM_TEMPLATE: &str = r#"You are a careful assistant that solves the user's request step by step.

You can use these tools:
{{#each tools}}
- {{name}}: {{description}}
{{else}}
(no tools available)
{{/each}}

Every reply must use exactly this format:

Thought: <your reasoning about what to do next>
Action: <one action>
Preference: <optional short summary of the user's preferences>

The action is either a tool call or the final answer:
- tool_name(arg="value", other="value") calls a tool with named arguments
- Finish[final answer] ends the task with the final answer

Rules:
- Write exactly one Action line per reply.
- Call one tool at a time and wait for its Observation before continuing.
- Use only the tools listed above.
- You have at most {{max_steps}} steps. Finish before running out.
"#;

#[derive(Serialize)]
struct SystemContext<'a> {
    tools: &'a [ToolDescription],
    max_steps: usize,
}

/// Renders prompt templates using Handlebars templating
pub struct PromptRenderer {
    handlebars: Handlebars<'static>,
}

impl Default for PromptRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptRenderer {
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        // Tool descriptions are plain text, never HTML
        handlebars.register_escape_fn(handlebars::no_escape);
        Self { handlebars }
    }

    /// Render a template string with any serializable context
    pub fn render_with<T: Serialize>(&self, template: &str, context: &T) -> Result<String> {
        self.handlebars
            .render_template(template, context)
            .map_err(|e| ReactError::Prompt(format!("Failed to render template: {}", e)))
    }

    /// Render the system prompt for the given tools and step limit
    ///
    /// `template` falls back to `DEFAULT_SYSTEM_TEMPLATE` when `None`.
    pub fn render_system(&self, template: Option<&str>, tools: &[ToolDescription], max_steps: usize) -> Result<String> {
        let template = template.unwrap_or(DEFAULT_SYSTEM_TEMPLATE);
        self.render_with(template, &SystemContext { tools, max_steps })
    }
}

/// Corrective instruction appended after a malformed oracle reply
pub fn correction(reason: &str) -> String {
    format!(
        "Your previous reply could not be parsed: {}.\n\
         Reply again using exactly one `Thought:` line and one `Action:` line, \
         where the action is `tool_name(arg=\"value\")` or `Finish[answer]`.",
        reason
    )
}
