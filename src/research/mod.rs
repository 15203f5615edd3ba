// file: src/research/mod.rs
// description: web research: search providers and content aggregation
// reference: internal module structure

pub mod aggregator;
pub mod firecrawl;
pub mod provider;

pub use aggregator::{ContentAggregator, DOCUMENT_SEPARATOR, join_documents};
pub use firecrawl::FirecrawlClient;
pub use provider::SearchProvider;
