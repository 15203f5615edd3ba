// file: src/agent/tool.rs
// description: callable tool abstraction and the registry exposed to the model
// reference: https://platform.openai.com/docs/guides/function-calling

use crate::error::{AgentError, Result};
use crate::llm::ToolDefinition;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON schema of the arguments object.
    fn parameters(&self) -> Value;

    async fn call(&self, args: Value) -> Result<String>;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        }
    }
}

/// Ordered set of tools, looked up by name.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registering a second tool with the same name replaces the first.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.retain(|t| t.name() != tool.name());
        self.tools.push(tool);
    }

    pub fn with(mut self, tool: Arc<dyn Tool>) -> Self {
        self.register(tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Decode the model's raw argument string and run the named tool.
    pub async fn execute(&self, name: &str, raw_arguments: &str) -> Result<String> {
        let tool = self.get(name).ok_or_else(|| {
            AgentError::AgentLoop(format!(
                "Unknown tool '{}'. Available tools: {}",
                name,
                self.names().join(", ")
            ))
        })?;

        let args = parse_arguments(raw_arguments)?;
        tool.call(args).await
    }
}

/// Empty input means "no arguments"; anything else must be JSON.
fn parse_arguments(raw: &str) -> Result<Value> {
    if raw.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }

    serde_json::from_str(raw).map_err(|e| {
        AgentError::Validation(format!("Tool arguments are not valid JSON ({}): {}", e, raw))
    })
}
