use super::{tool::ToolRegistry, Tool};
use crate::{PlannerError, Result};
use serde_json::Value;
use tracing::debug;

/// Dispatches function calls from the model to registered tools
#[derive(Debug, Default)]
pub struct FunctionFactory {
    registry: ToolRegistry,
}

impl FunctionFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool with the factory
    pub fn register_tool<T: Tool + 'static>(&mut self, tool: T) {
        self.registry.register(tool);
    }

    /// Execute a function call by name
    pub async fn execute_function(&self, function_name: &str, parameters: Value) -> Result<Value> {
        let tool = self
            .registry
            .get(function_name)
            .ok_or_else(|| PlannerError::ToolNotFound(function_name.to_string()))?;

        debug!(tool = function_name, %parameters, "executing tool");
        tool.execute(parameters).await
    }

    /// Get all available tools for chat completion function calling
    pub fn get_openai_tools(&self) -> Vec<Value> {
        self.registry.to_openai_tools()
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.registry.get(name).is_some()
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.registry.names()
    }
}
