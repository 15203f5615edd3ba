// file: src/research/aggregator.rs
// description: flattens search results for a topic into one text blob
// reference: https://docs.firecrawl.dev/api-reference/endpoint/search

use crate::config::EmptyResultPolicy;
use crate::error::{AgentError, Result};
use crate::models::Document;
use crate::research::provider::SearchProvider;
use crate::utils::{RetryPolicy, Validator, retry_async};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DOCUMENT_SEPARATOR: &str = "\n\n";

#[derive(Clone)]
pub struct ContentAggregator {
    provider: Arc<dyn SearchProvider>,
    retry: RetryPolicy,
    empty_result: EmptyResultPolicy,
}

impl ContentAggregator {
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self {
            provider,
            retry: RetryPolicy::default(),
            empty_result: EmptyResultPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_empty_result(mut self, policy: EmptyResultPolicy) -> Self {
        self.empty_result = policy;
        self
    }

    /// Search for `topic` and join up to `limit` document bodies with a blank
    /// line, in provider order. Content is passed through untouched.
    pub async fn aggregate(&self, topic: &str, limit: usize) -> Result<String> {
        Validator::validate_topic(topic)?;
        Validator::validate_limit(limit)?;

        info!("Researching \"{}\" via {} (limit {})", topic, self.provider.name(), limit);

        let label = format!("{} search", self.provider.name());
        let documents = retry_async(&self.retry, &label, || self.provider.search(topic, limit)).await?;

        if documents.is_empty() {
            warn!("No documents returned for \"{}\"", topic);
            return match self.empty_result {
                EmptyResultPolicy::EmptyString => Ok(String::new()),
                EmptyResultPolicy::Error => Err(AgentError::EmptyResult {
                    topic: topic.to_string(),
                }),
            };
        }

        let text = join_documents(&documents);
        debug!(
            "Aggregated {} documents into {} bytes",
            documents.len(),
            text.len()
        );

        Ok(text)
    }
}

pub fn join_documents(documents: &[Document]) -> String {
    documents
        .iter()
        .map(|doc| doc.content.as_str())
        .collect::<Vec<_>>()
        .join(DOCUMENT_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// Replays a fixed outcome and records every request.
    struct FixedProvider {
        outcome: Mutex<Vec<Result<Vec<Document>>>>,
        fallback: Vec<Document>,
        requests: Mutex<Vec<(String, usize)>>,
    }

    impl FixedProvider {
        fn returning(contents: &[&str]) -> Self {
            Self {
                outcome: Mutex::new(Vec::new()),
                fallback: contents.iter().map(|c| Document::new(*c)).collect(),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn failing_first(mut self, errors: Vec<AgentError>) -> Self {
            self.outcome = Mutex::new(errors.into_iter().map(Err).collect());
            self
        }

        fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl SearchProvider for FixedProvider {
        async fn search(&self, topic: &str, limit: usize) -> Result<Vec<Document>> {
            self.requests.lock().unwrap().push((topic.to_string(), limit));
            let mut queued = self.outcome.lock().unwrap();
            if queued.is_empty() {
                Ok(self.fallback.clone())
            } else {
                queued.remove(0)
            }
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn aggregator(provider: Arc<FixedProvider>) -> ContentAggregator {
        ContentAggregator::new(provider).with_retry(RetryPolicy {
            max_retries: 2,
            ..RetryPolicy::none()
        })
    }

    #[tokio::test]
    async fn test_two_documents_joined_with_blank_line() {
        let provider = Arc::new(FixedProvider::returning(&["A", "B"]));
        let text = aggregator(provider.clone())
            .aggregate("AI agents 2025", 5)
            .await
            .unwrap();

        assert_eq!(text, "A\n\nB");
        assert_eq!(
            provider.requests.lock().unwrap().as_slice(),
            &[("AI agents 2025".to_string(), 5)]
        );
    }

    #[tokio::test]
    async fn test_zero_documents_yield_empty_string() {
        let provider = Arc::new(FixedProvider::returning(&[]));
        let text = aggregator(provider).aggregate("obscure", 5).await.unwrap();
        assert_eq!(text, "");
    }

    #[tokio::test]
    async fn test_zero_documents_error_policy() {
        let provider = Arc::new(FixedProvider::returning(&[]));
        let err = aggregator(provider)
            .with_empty_result(EmptyResultPolicy::Error)
            .aggregate("obscure", 5)
            .await
            .unwrap_err();

        assert!(matches!(err, AgentError::EmptyResult { ref topic } if topic == "obscure"));
    }

    #[tokio::test]
    async fn test_content_not_reordered_deduplicated_or_trimmed() {
        let contents = ["  z first  ", "dup", "dup", "\n", "a last"];
        let provider = Arc::new(FixedProvider::returning(&contents));
        let text = aggregator(provider).aggregate("topic", 5).await.unwrap();

        assert_eq!(text, "  z first  \n\ndup\n\ndup\n\n\n\n\na last");
    }

    #[tokio::test]
    async fn test_single_document_has_no_separator() {
        let provider = Arc::new(FixedProvider::returning(&["only"]));
        let text = aggregator(provider).aggregate("topic", 1).await.unwrap();
        assert_eq!(text, "only");
    }

    #[tokio::test]
    async fn test_repeated_calls_are_identical_and_refetch() {
        let provider = Arc::new(FixedProvider::returning(&["A", "B", "C"]));
        let aggregator = aggregator(provider.clone());

        let first = aggregator.aggregate("topic", 3).await.unwrap();
        let second = aggregator.aggregate("topic", 3).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(provider.request_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_topic_rejected_without_request() {
        let provider = Arc::new(FixedProvider::returning(&["A"]));
        let err = aggregator(provider.clone())
            .aggregate("   ", 5)
            .await
            .unwrap_err();

        assert!(matches!(err, AgentError::Validation(_)));
        assert_eq!(provider.request_count(), 0);
    }

    #[tokio::test]
    async fn test_zero_limit_rejected() {
        let provider = Arc::new(FixedProvider::returning(&["A"]));
        let err = aggregator(provider).aggregate("topic", 0).await.unwrap_err();
        assert!(matches!(err, AgentError::Validation(_)));
    }

    #[tokio::test]
    async fn test_transient_failure_retried() {
        let provider = Arc::new(FixedProvider::returning(&["A"]).failing_first(vec![
            AgentError::ProviderRequest {
                message: "timeout".to_string(),
                retryable: true,
            },
        ]));

        let text = aggregator(provider.clone())
            .aggregate("topic", 5)
            .await
            .unwrap();

        assert_eq!(text, "A");
        assert_eq!(provider.request_count(), 2);
    }

    #[tokio::test]
    async fn test_auth_failure_not_retried() {
        let provider = Arc::new(
            FixedProvider::returning(&["A"])
                .failing_first(vec![AgentError::ProviderAuth("bad key".to_string())]),
        );

        let err = aggregator(provider.clone())
            .aggregate("topic", 5)
            .await
            .unwrap_err();

        assert!(err.is_auth());
        assert_eq!(provider.request_count(), 1);
    }

    #[test]
    fn test_join_documents_empty() {
        assert_eq!(join_documents(&[]), "");
    }
}
