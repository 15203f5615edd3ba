// file: src/llm/openai.rs
// description: OpenAI-compatible chat completions client with tool calling
// reference: https://platform.openai.com/docs/api-reference/chat/create

use crate::config::ModelConfig;
use crate::error::{AgentError, Result};
use crate::llm::client::ChatModel;
use crate::llm::message::{AssistantTurn, ChatMessage, ToolCall, ToolDefinition};
use crate::utils::retry::{StatusClass, classify_status, is_retryable_transport};
use crate::utils::{RetryPolicy, retry_async};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<OpenAiTool<'a>>,
}

#[derive(Debug, Serialize)]
struct OpenAiTool<'a> {
    #[serde(rename = "type")]
    tool_type: &'static str,
    function: &'a ToolDefinition,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCall>>,
}

pub struct OpenAiChatClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    retry: RetryPolicy,
}

impl OpenAiChatClient {
    /// Fails with `MissingCredential` before any connection is opened.
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let api_key = config.api_key()?.to_string();

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AgentError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    async fn send_once(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<AssistantTurn> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            tools: tools
                .iter()
                .map(|function| OpenAiTool {
                    tool_type: "function",
                    function,
                })
                .collect(),
        };

        debug!(
            "Requesting completion from {} ({} messages, {} tools)",
            self.model,
            messages.len(),
            tools.len()
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AgentError::ModelRequest {
                message: format!("Failed to send chat completion request: {}", e),
                retryable: is_retryable_transport(&e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = format!("Chat completion failed with status {}: {}", status, error_text);

            return Err(match classify_status(status) {
                StatusClass::Auth => AgentError::ModelAuth(message),
                StatusClass::Retryable => AgentError::ModelRequest {
                    message,
                    retryable: true,
                },
                StatusClass::Permanent => AgentError::ModelRequest {
                    message,
                    retryable: false,
                },
            });
        }

        let body: ChatResponse = response.json().await.map_err(|e| {
            AgentError::ModelResponse(format!("Failed to parse chat completion: {}", e))
        })?;

        let choice = body.choices.into_iter().next().ok_or_else(|| {
            AgentError::ModelResponse("Chat completion contained no choices".to_string())
        })?;

        Ok(AssistantTurn {
            content: choice.message.content,
            tool_calls: choice.message.tool_calls.unwrap_or_default(),
            finish_reason: choice.finish_reason,
        })
    }
}

#[async_trait]
impl ChatModel for OpenAiChatClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<AssistantTurn> {
        retry_async(&self.retry, "chat completion", || {
            self.send_once(messages, tools)
        })
        .await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
