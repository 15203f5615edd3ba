// file: src/models/document.rs
// description: search/scrape result returned by the research provider
// reference: https://docs.firecrawl.dev/api-reference/endpoint/search

use serde::{Deserialize, Serialize};

/// One search hit. Providers return these ordered by relevance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub url: Option<String>,
    pub title: Option<String>,
    pub content: String,
}

impl Document {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            url: None,
            title: None,
            content: content.into(),
        }
    }

    pub fn with_source(mut self, url: impl Into<String>, title: Option<String>) -> Self {
        self.url = Some(url.into());
        self.title = title;
        self
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_creation() {
        let doc = Document::new("# Agents").with_source(
            "https://example.com/agents",
            Some("Agents".to_string()),
        );

        assert_eq!(doc.url.as_deref(), Some("https://example.com/agents"));
        assert_eq!(doc.title.as_deref(), Some("Agents"));
        assert_eq!(doc.len(), 8);
        assert!(!doc.is_empty());
    }
}
