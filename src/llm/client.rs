// file: src/llm/client.rs
// description: chat model abstraction driven by the post generator
// reference: https://docs.rs/async-trait

use crate::error::Result;
use crate::llm::message::{AssistantTurn, ChatMessage, ToolDefinition};
use async_trait::async_trait;

#[async_trait]
pub trait ChatModel: Send + Sync {
    /// One completion over the full conversation so far.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<AssistantTurn>;

    fn model_name(&self) -> &str;
}
