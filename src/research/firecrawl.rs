// file: src/research/firecrawl.rs
// description: Firecrawl search API integration returning scraped markdown
// reference: https://docs.firecrawl.dev/api-reference/endpoint/search

use crate::config::ResearchConfig;
use crate::error::{AgentError, Result};
use crate::models::Document;
use crate::research::provider::SearchProvider;
use crate::utils::retry::{StatusClass, classify_status, is_retryable_transport};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    query: &'a str,
    limit: usize,
    scrape_options: ScrapeOptions,
}

#[derive(Debug, Serialize)]
struct ScrapeOptions {
    formats: Vec<&'static str>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Vec<SearchHit>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    url: Option<String>,
    title: Option<String>,
    description: Option<String>,
    markdown: Option<String>,
}

impl From<SearchHit> for Document {
    fn from(hit: SearchHit) -> Self {
        let content = hit.markdown.or(hit.description).unwrap_or_default();
        Document {
            url: hit.url,
            title: hit.title,
            content,
        }
    }
}

pub struct FirecrawlClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl FirecrawlClient {
    /// Fails with `MissingCredential` before any connection is opened.
    pub fn new(config: &ResearchConfig) -> Result<Self> {
        let api_key = config.api_key()?.to_string();

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AgentError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn search_url(&self) -> String {
        format!("{}/v1/search", self.base_url)
    }
}

#[async_trait]
impl SearchProvider for FirecrawlClient {
    async fn search(&self, topic: &str, limit: usize) -> Result<Vec<Document>> {
        let request = SearchRequest {
            query: topic,
            limit,
            scrape_options: ScrapeOptions {
                formats: vec!["markdown"],
            },
        };

        debug!("Firecrawl search for \"{}\" (limit {})", topic, limit);

        let response = self
            .client
            .post(self.search_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AgentError::ProviderRequest {
                message: format!("Failed to send Firecrawl request: {}", e),
                retryable: is_retryable_transport(&e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = format!("Firecrawl returned status {}: {}", status, error_text);

            return Err(match classify_status(status) {
                StatusClass::Auth => AgentError::ProviderAuth(message),
                StatusClass::Retryable => AgentError::ProviderRequest {
                    message,
                    retryable: true,
                },
                StatusClass::Permanent => AgentError::ProviderRequest {
                    message,
                    retryable: false,
                },
            });
        }

        let body: SearchResponse = response.json().await.map_err(|e| {
            AgentError::ProviderResponse(format!("Failed to parse Firecrawl response: {}", e))
        })?;

        if !body.success {
            return Err(AgentError::ProviderResponse(
                body.error
                    .unwrap_or_else(|| "Firecrawl reported an unsuccessful search".to_string()),
            ));
        }

        debug!("Firecrawl returned {} documents", body.data.len());

        Ok(body.data.into_iter().map(Document::from).collect())
    }

    fn name(&self) -> &str {
        "Firecrawl"
    }
}
