//! Tool registry - manages tool registration and invocation

use std::collections::HashMap;
use std::fmt;

use log::debug;

use super::{AddTool, DivideTool, FnTool, MultiplyTool, SubtractTool, Tool, ToolArgs, ToolDescription, ToolError};
use crate::error::{ReactError, Result};

/// Name-indexed set of tools, kept in registration order
///
/// Registration takes `&mut self`, so once a registry is shared behind an
/// `Arc` it can no longer change.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the arithmetic tools
    pub fn calculator() -> Self {
        let mut registry = Self::new();
        registry.push(Box::new(AddTool));
        registry.push(Box::new(SubtractTool));
        registry.push(Box::new(MultiplyTool));
        registry.push(Box::new(DivideTool));
        registry
    }

    /// Register a tool; fails if the name is already taken
    pub fn register(&mut self, tool: impl Tool + 'static) -> Result<()> {
        self.register_boxed(Box::new(tool))
    }

    /// Register an already boxed tool
    pub fn register_boxed(&mut self, tool: Box<dyn Tool>) -> Result<()> {
        if self.index.contains_key(tool.name()) {
            return Err(ReactError::DuplicateTool(tool.name().to_string()));
        }
        self.push(tool);
        Ok(())
    }

    /// Register a closure as a tool
    pub fn register_fn<F>(&mut self, name: impl Into<String>, description: impl Into<String>, func: F) -> Result<()>
    where
        F: Fn(&ToolArgs) -> std::result::Result<String, ToolError> + Send + Sync + 'static,
    {
        self.register(FnTool::new(name, description, func))
    }

    fn push(&mut self, tool: Box<dyn Tool>) {
        debug!("Registering tool '{}'", tool.name());
        self.index.insert(tool.name().to_string(), self.tools.len());
        self.tools.push(tool);
    }

    /// Name and description of every tool, in registration order
    pub fn describe_all(&self) -> Vec<ToolDescription> {
        self.tools
            .iter()
            .map(|t| ToolDescription {
                name: t.name().to_string(),
                description: t.description().to_string(),
            })
            .collect()
    }

    /// Invoke a tool by name
    pub async fn invoke(&self, name: &str, args: &ToolArgs) -> Result<String> {
        let tool = self.get(name).ok_or_else(|| ReactError::UnknownTool(name.to_string()))?;
        tool.execute(args).await.map_err(|e| ReactError::ToolExecution {
            tool: name.to_string(),
            message: e.to_string(),
        })
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.index.get(name).map(|&i| self.tools[i].as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Tool names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry").field("tools", &self.names()).finish()
    }
}
