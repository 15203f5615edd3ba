// file: src/llm/mod.rs
// description: language model client and chat message types
// reference: internal module structure

pub mod client;
pub mod message;
pub mod openai;

pub use client::ChatModel;
pub use message::{AssistantTurn, ChatMessage, FunctionCall, Role, ToolCall, ToolDefinition};
pub use openai::OpenAiChatClient;
