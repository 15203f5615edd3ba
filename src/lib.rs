// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod agent;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod research;
pub mod utils;

pub use agent::{PostGenerator, Tool, ToolRegistry, WebResearcher};
pub use config::{AgentConfig, Config, EmptyResultPolicy, ModelConfig, ResearchConfig, RetryConfig};
pub use error::{AgentError, Result};
pub use llm::{ChatModel, OpenAiChatClient};
pub use models::{Document, GeneratedPost};
pub use pipeline::{PostPipeline, ProgressTracker, RunReport, RunStats};
pub use research::{ContentAggregator, FirecrawlClient, SearchProvider};
pub use utils::{RetryPolicy, Validator};
