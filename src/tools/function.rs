//! Closure-backed tool, for registering plain functions by name

use async_trait::async_trait;

use super::{Tool, ToolArgs, ToolError};

type ToolFn = dyn Fn(&ToolArgs) -> Result<String, ToolError> + Send + Sync;

/// A tool whose behavior is a synchronous closure
pub struct FnTool {
    name: String,
    description: String,
    func: Box<ToolFn>,
}

impl FnTool {
    pub fn new<F>(name: impl Into<String>, description: impl Into<String>, func: F) -> Self
    where
        F: Fn(&ToolArgs) -> Result<String, ToolError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            func: Box::new(func),
        }
    }
}

#[async_trait]
impl Tool for FnTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn execute(&self, args: &ToolArgs) -> Result<String, ToolError> {
        (self.func)(args)
    }
}
