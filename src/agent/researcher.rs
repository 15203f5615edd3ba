// file: src/agent/researcher.rs
// description: WebResearcher tool wrapping the content aggregator
// reference: https://docs.rs/schemars

use crate::agent::tool::Tool;
use crate::error::{AgentError, Result};
use crate::research::ContentAggregator;
use crate::utils::Validator;
use async_trait::async_trait;
use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

pub const RESEARCH_TOOL_NAME: &str = "WebResearcher";
const RESEARCH_TOOL_DESCRIPTION: &str =
    "Searches the web and summarizes up-to-date information on a topic.";

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ResearchArgs {
    /// Topic or search query to research on the web.
    pub query: String,
}

impl ResearchArgs {
    /// Accepts `{"query": "..."}` or a bare JSON string.
    fn from_value(args: Value) -> Result<Self> {
        match args {
            Value::String(query) => Ok(Self { query }),
            other => serde_json::from_value(other).map_err(|e| {
                AgentError::Validation(format!("{} expects {{\"query\": string}}: {}", RESEARCH_TOOL_NAME, e))
            }),
        }
    }
}

pub struct WebResearcher {
    aggregator: ContentAggregator,
    limit: usize,
    max_chars: Option<usize>,
}

impl WebResearcher {
    pub fn new(aggregator: ContentAggregator, limit: usize) -> Self {
        Self {
            aggregator,
            limit,
            max_chars: None,
        }
    }

    pub fn with_max_chars(mut self, max_chars: Option<usize>) -> Self {
        self.max_chars = max_chars;
        self
    }
}

#[async_trait]
impl Tool for WebResearcher {
    fn name(&self) -> &str {
        RESEARCH_TOOL_NAME
    }

    fn description(&self) -> &str {
        RESEARCH_TOOL_DESCRIPTION
    }

    fn parameters(&self) -> Value {
        let mut schema = serde_json::to_value(schema_for!(ResearchArgs)).unwrap_or_default();
        if let Value::Object(map) = &mut schema {
            map.remove("$schema");
        }
        schema
    }

    async fn call(&self, args: Value) -> Result<String> {
        let args = ResearchArgs::from_value(args)?;
        let text = self.aggregator.aggregate(&args.query, self.limit).await?;

        if text.is_empty() {
            return Ok(format!(
                "No web results were found for \"{}\". Work from general knowledge or try a different query.",
                args.query
            ));
        }

        Ok(match self.max_chars {
            Some(max) if text.chars().count() > max => {
                warn!("Research text for \"{}\" truncated to {} chars", args.query, max);
                Validator::truncate_text(&text, max)
            }
            _ => text,
        })
    }
}
