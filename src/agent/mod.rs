// file: src/agent/mod.rs
// description: post generator agent, its tools and prompts
// reference: internal module structure

pub mod executor;
pub mod prompt;
pub mod researcher;
pub mod tool;

pub use executor::{GenerationObserver, NoopObserver, PostGenerator};
pub use researcher::{RESEARCH_TOOL_NAME, ResearchArgs, WebResearcher};
pub use tool::{Tool, ToolRegistry};
