// file: src/research/provider.rs
// description: search provider abstraction used by the content aggregator
// reference: https://docs.rs/async-trait

use crate::error::Result;
use crate::models::Document;
use async_trait::async_trait;

/// A search-and-scrape backend. Implementations issue one request per call
/// and return at most `limit` documents in relevance order.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, topic: &str, limit: usize) -> Result<Vec<Document>>;

    fn name(&self) -> &str;
}
