// file: src/pipeline/runner.rs
// description: wires research, tools and the chat model into one generation run
// reference: orchestrates the research-then-write workflow

use crate::agent::{PostGenerator, ToolRegistry, WebResearcher};
use crate::config::Config;
use crate::error::{AgentError, Result};
use crate::llm::{ChatModel, OpenAiChatClient};
use crate::models::GeneratedPost;
use crate::pipeline::progress::{ProgressTracker, RunStats};
use crate::research::{ContentAggregator, FirecrawlClient, SearchProvider};
use crate::utils::RetryPolicy;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone)]
pub struct RunReport {
    pub post: GeneratedPost,
    pub stats: RunStats,
}

pub struct PostPipeline {
    aggregator: ContentAggregator,
    research_limit: usize,
    tools: ToolRegistry,
    generator: Option<PostGenerator>,
    progress: Option<bool>,
}

impl PostPipeline {
    /// Build against the live Firecrawl and chat completion APIs. Credentials
    /// must already be resolved; no request is sent here.
    pub fn from_config(config: &Config) -> Result<Self> {
        let retry = RetryPolicy::from(&config.retry);
        let search: Arc<dyn SearchProvider> = Arc::new(FirecrawlClient::new(&config.research)?);
        let model: Arc<dyn ChatModel> =
            Arc::new(OpenAiChatClient::new(&config.model)?.with_retry(retry));

        Ok(Self::new(config, search, Some(model)))
    }

    /// Only the research half; needs no model credential.
    pub fn research_only(config: &Config) -> Result<Self> {
        let search: Arc<dyn SearchProvider> = Arc::new(FirecrawlClient::new(&config.research)?);
        Ok(Self::new(config, search, None))
    }

    pub fn new(
        config: &Config,
        search: Arc<dyn SearchProvider>,
        model: Option<Arc<dyn ChatModel>>,
    ) -> Self {
        let aggregator = ContentAggregator::new(search)
            .with_retry(RetryPolicy::from(&config.retry))
            .with_empty_result(config.research.empty_result);

        let researcher = WebResearcher::new(aggregator.clone(), config.research.limit)
            .with_max_chars(config.research.max_chars);
        let tools = ToolRegistry::new().with(Arc::new(researcher));

        let generator = model.map(|model| {
            PostGenerator::new(
                model,
                config.agent.system_prompt.clone(),
                config.agent.max_iterations,
            )
        });

        Self {
            aggregator,
            research_limit: config.research.limit,
            tools,
            generator,
            progress: None,
        }
    }

    /// Show a spinner on stderr while running.
    pub fn with_progress(mut self, colored: bool) -> Self {
        self.progress = Some(colored);
        self
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub async fn research(&self, topic: &str) -> Result<String> {
        self.aggregator.aggregate(topic, self.research_limit).await
    }

    pub async fn run(&self, task: &str) -> Result<RunReport> {
        let generator = self.generator.as_ref().ok_or_else(|| {
            AgentError::Config("Pipeline was built without a language model".to_string())
        })?;

        let tracker = match self.progress {
            Some(colored) => ProgressTracker::new(colored),
            None => ProgressTracker::hidden(),
        };

        info!("Generating post for task: {}", task);

        match generator.generate_observed(task, &self.tools, &tracker).await {
            Ok(post) => {
                tracker.finish();
                let stats = tracker.get_stats();
                info!("Run complete: {}", stats.summary());
                Ok(RunReport { post, stats })
            }
            Err(e) => {
                tracker.abandon();
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{AssistantTurn, ChatMessage, ToolCall, ToolDefinition};
    use crate::models::Document;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    struct TwoDocs;

    #[async_trait]
    impl SearchProvider for TwoDocs {
        async fn search(&self, _topic: &str, limit: usize) -> Result<Vec<Document>> {
            Ok(vec![Document::new("A"), Document::new("B")]
                .into_iter()
                .take(limit)
                .collect())
        }

        fn name(&self) -> &str {
            "two-docs"
        }
    }

    /// Calls WebResearcher once, then writes a post quoting the research.
    struct ResearchThenWrite {
        tools_seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ChatModel for ResearchThenWrite {
        async fn complete(
            &self,
            messages: &[ChatMessage],
            tools: &[ToolDefinition],
        ) -> Result<AssistantTurn> {
            *self.tools_seen.lock().unwrap() = tools.iter().map(|t| t.name.clone()).collect();

            match messages.last().and_then(|m| m.tool_call_id.as_ref()) {
                None => Ok(AssistantTurn::calls(vec![ToolCall::new(
                    "call_1",
                    "WebResearcher",
                    r#"{"query":"AI agents 2025"}"#,
                )])),
                Some(_) => {
                    let research = messages.last().and_then(|m| m.content.clone()).unwrap_or_default();
                    Ok(AssistantTurn::text(format!("Post: {}", research)))
                }
            }
        }

        fn model_name(&self) -> &str {
            "research-then-write"
        }
    }

    fn test_config() -> Config {
        let mut config = Config::default_config();
        config.retry.initial_backoff_ms = 0;
        config.retry.max_backoff_ms = 0;
        config
    }

    #[tokio::test]
    async fn test_run_uses_research_tool() {
        let model = Arc::new(ResearchThenWrite {
            tools_seen: Mutex::new(Vec::new()),
        });
        let chat: Arc<dyn ChatModel> = model.clone();
        let pipeline = PostPipeline::new(&test_config(), Arc::new(TwoDocs), Some(chat));

        let report = pipeline.run("Write about AI agents").await.unwrap();

        assert_eq!(report.post.body, "Post: A\n\nB");
        assert_eq!(report.stats.tool_calls, 1);
        assert_eq!(report.stats.iterations, 2);
        assert_eq!(report.stats.research_bytes, 4);
        assert_eq!(*model.tools_seen.lock().unwrap(), vec!["WebResearcher".to_string()]);
    }

    #[tokio::test]
    async fn test_research_respects_configured_limit() {
        let mut config = test_config();
        config.research.limit = 1;
        let pipeline = PostPipeline::new(&config, Arc::new(TwoDocs), None);

        assert_eq!(pipeline.research("AI agents 2025").await.unwrap(), "A");
    }

    #[tokio::test]
    async fn test_run_without_model_is_config_error() {
        let pipeline = PostPipeline::new(&test_config(), Arc::new(TwoDocs), None);
        let err = pipeline.run("task").await.unwrap_err();
        assert!(matches!(err, AgentError::Config(_)));
    }

    #[test]
    fn test_from_config_fails_fast_without_credentials() {
        let config = Config::default_config();
        let err = PostPipeline::from_config(&config).err().unwrap();
        assert!(matches!(
            err,
            AgentError::MissingCredential { ref variable } if variable == "FIRECRAWL_API_KEY"
        ));
    }

    #[test]
    fn test_research_only_needs_firecrawl_key_only() {
        let mut config = Config::default_config();
        config.research.api_key = Some("fc-key".to_string());

        assert!(PostPipeline::research_only(&config).is_ok());
        assert!(PostPipeline::from_config(&config).is_err());
    }
}
