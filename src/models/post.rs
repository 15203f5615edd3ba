// file: src/models/post.rs
// description: final text produced by the post generator
// reference: internal data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedPost {
    pub body: String,
    pub model: String,
    pub iterations: usize,
    pub tool_calls: usize,
    pub generated_at: DateTime<Utc>,
}

impl GeneratedPost {
    pub fn new(body: String, model: String, iterations: usize, tool_calls: usize) -> Self {
        Self {
            body,
            model,
            iterations,
            tool_calls,
            generated_at: Utc::now(),
        }
    }

    pub fn word_count(&self) -> usize {
        self.body.split_whitespace().count()
    }
}

/// Only the body; stdout carries the post unwrapped.
impl fmt::Display for GeneratedPost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_body_only() {
        let post = GeneratedPost::new(
            "AI agents are everywhere.\n\n#AI".to_string(),
            "gpt-4o".to_string(),
            2,
            1,
        );

        assert_eq!(post.to_string(), "AI agents are everywhere.\n\n#AI");
        assert_eq!(post.word_count(), 5);
    }
}
