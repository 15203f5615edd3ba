// file: src/agent/executor.rs
// description: tool-calling agent loop that turns a task into a finished post
// reference: https://platform.openai.com/docs/guides/function-calling

use crate::agent::prompt::build_system_prompt;
use crate::agent::tool::ToolRegistry;
use crate::error::{AgentError, Result};
use crate::llm::{ChatMessage, ChatModel, ToolCall};
use crate::models::GeneratedPost;
use crate::utils::Validator;
use crate::utils::logging::format_step;
use std::sync::Arc;
use tracing::{debug, info, warn};

const LOG_PREVIEW_CHARS: usize = 500;

/// Notified as the loop makes progress; the pipeline uses it to drive the spinner.
pub trait GenerationObserver: Send + Sync {
    fn on_iteration(&self, _iteration: usize) {}
    fn on_tool_call(&self, _name: &str) {}
    fn on_tool_result(&self, _name: &str, _output: &Result<String>) {}
}

pub struct NoopObserver;

impl GenerationObserver for NoopObserver {}

pub struct PostGenerator {
    model: Arc<dyn ChatModel>,
    system_prompt: String,
    max_iterations: usize,
}

impl PostGenerator {
    pub fn new(model: Arc<dyn ChatModel>, system_prompt: impl Into<String>, max_iterations: usize) -> Self {
        Self {
            model,
            system_prompt: system_prompt.into(),
            max_iterations: max_iterations.max(1),
        }
    }

    pub async fn generate(&self, task: &str, tools: &ToolRegistry) -> Result<GeneratedPost> {
        self.generate_observed(task, tools, &NoopObserver).await
    }

    /// Alternate model turns and tool executions until the model answers with
    /// text, or the iteration cap is hit.
    pub async fn generate_observed(
        &self,
        task: &str,
        tools: &ToolRegistry,
        observer: &dyn GenerationObserver,
    ) -> Result<GeneratedPost> {
        Validator::validate_task(task)?;

        let mut messages = vec![
            ChatMessage::system(build_system_prompt(&self.system_prompt, &tools.names())),
            ChatMessage::user(task),
        ];
        let definitions = tools.definitions();
        let mut tool_calls_made = 0;

        for iteration in 1..=self.max_iterations {
            observer.on_iteration(iteration);
            debug!(
                "{}",
                format_step(iteration, self.max_iterations, "requesting model turn")
            );

            let turn = self.model.complete(&messages, &definitions).await?;

            if !turn.tool_calls.is_empty() {
                messages.push(ChatMessage::assistant(
                    turn.content.clone(),
                    turn.tool_calls.clone(),
                ));

                for call in &turn.tool_calls {
                    tool_calls_made += 1;
                    let output = self.run_tool(call, tools, observer).await?;
                    messages.push(ChatMessage::tool_result(call.id.clone(), output));
                }

                continue;
            }

            if let Some(text) = turn.final_text() {
                info!(
                    "Post generated after {} iteration(s) and {} tool call(s)",
                    iteration, tool_calls_made
                );
                return Ok(GeneratedPost::new(
                    text.to_string(),
                    self.model.model_name().to_string(),
                    iteration,
                    tool_calls_made,
                ));
            }

            return Err(AgentError::ModelResponse(format!(
                "Model returned neither text nor tool calls (finish_reason: {})",
                turn.finish_reason.as_deref().unwrap_or("none")
            )));
        }

        Err(AgentError::AgentLoop(format!(
            "Max iterations ({}) reached without a final answer",
            self.max_iterations
        )))
    }

    /// Runs one tool call. Failures are reported back to the model as text,
    /// except rejected credentials which end the run.
    async fn run_tool(
        &self,
        call: &ToolCall,
        tools: &ToolRegistry,
        observer: &dyn GenerationObserver,
    ) -> Result<String> {
        let name = call.function.name.as_str();
        info!("Calling tool {}", name);
        debug!("{} arguments: {}", name, call.function.arguments);
        observer.on_tool_call(name);

        let result = tools.execute(name, &call.function.arguments).await;
        observer.on_tool_result(name, &result);

        match result {
            Ok(output) => {
                debug!(
                    "{} returned {} bytes: {}",
                    name,
                    output.len(),
                    Validator::truncate_text(&output, LOG_PREVIEW_CHARS)
                );
                Ok(output)
            }
            Err(e) if e.is_auth() => Err(e),
            Err(e) => {
                warn!("Tool {} failed: {}", name, e);
                Ok(format!("Error: {}", e))
            }
        }
    }
}
