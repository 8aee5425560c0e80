//! Prompt System - system prompt rendering
//!
//! The system prompt carries the reply contract and the tool listing. It is
//! rendered with Handlebars so the template can be overridden from config.

mod render;

pub use render::{DEFAULT_SYSTEM_TEMPLATE, PromptRenderer, correction};
