// file: src/utils/validation.rs
// description: data validation utilities and helpers
// reference: input validation patterns

use crate::error::{AgentError, Result};

/// Firecrawl rejects search limits above this.
pub const MAX_SEARCH_LIMIT: usize = 100;

pub struct Validator;

impl Validator {
    pub fn validate_topic(topic: &str) -> Result<()> {
        if topic.trim().is_empty() {
            return Err(AgentError::Validation("Topic is empty".to_string()));
        }
        Ok(())
    }

    pub fn validate_task(task: &str) -> Result<()> {
        if task.trim().is_empty() {
            return Err(AgentError::Validation("Task is empty".to_string()));
        }
        Ok(())
    }

    pub fn validate_url(url: &str) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(AgentError::Validation(format!(
                "Invalid URL format: {}",
                url
            )));
        }
        Ok(())
    }

    pub fn validate_limit(limit: usize) -> Result<()> {
        if limit == 0 {
            return Err(AgentError::Validation(
                "Limit must be greater than 0".to_string(),
            ));
        }

        if limit > MAX_SEARCH_LIMIT {
            return Err(AgentError::Validation(format!(
                "Limit too large (max {})",
                MAX_SEARCH_LIMIT
            )));
        }

        Ok(())
    }

    pub fn validate_temperature(temperature: f32) -> Result<()> {
        if !(0.0..=2.0).contains(&temperature) {
            return Err(AgentError::Validation(format!(
                "Temperature must be between 0.0 and 2.0, got {}",
                temperature
            )));
        }
        Ok(())
    }

    /// Cut `text` to at most `max_chars` characters, never splitting a code point.
    pub fn truncate_text(text: &str, max_chars: usize) -> String {
        match text.char_indices().nth(max_chars) {
            Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
            None => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_topic() {
        assert!(Validator::validate_topic("AI agents 2025").is_ok());
        assert!(Validator::validate_topic("").is_err());
        assert!(Validator::validate_topic("   ").is_err());
    }

    #[test]
    fn test_validate_task() {
        assert!(Validator::validate_task("write a post").is_ok());
        assert!(Validator::validate_task("\n\t").is_err());
    }

    #[test]
    fn test_validate_url() {
        assert!(Validator::validate_url("https://api.firecrawl.dev").is_ok());
        assert!(Validator::validate_url("http://localhost:8080").is_ok());
        assert!(Validator::validate_url("api.openai.com").is_err());
        assert!(Validator::validate_url("ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_limit() {
        assert!(Validator::validate_limit(5).is_ok());
        assert!(Validator::validate_limit(MAX_SEARCH_LIMIT).is_ok());
        assert!(Validator::validate_limit(0).is_err());
        assert!(Validator::validate_limit(MAX_SEARCH_LIMIT + 1).is_err());
    }

    #[test]
    fn test_validate_temperature() {
        assert!(Validator::validate_temperature(0.0).is_ok());
        assert!(Validator::validate_temperature(0.7).is_ok());
        assert!(Validator::validate_temperature(2.5).is_err());
        assert!(Validator::validate_temperature(-0.1).is_err());
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(Validator::truncate_text("short", 10), "short");
        assert_eq!(
            Validator::truncate_text("this is a very long text", 10),
            "this is a ..."
        );
        assert_eq!(Validator::truncate_text("héllo wörld", 4), "héll...");
    }
}
