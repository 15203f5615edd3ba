// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AgentError>;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing credential: environment variable {variable} is not set")]
    MissingCredential { variable: String },

    #[error("Search provider rejected the request: {0}")]
    ProviderAuth(String),

    #[error("Search request failed: {message}")]
    ProviderRequest { message: String, retryable: bool },

    #[error("Search provider returned an invalid response: {0}")]
    ProviderResponse(String),

    #[error("No documents found for topic \"{topic}\"")]
    EmptyResult { topic: String },

    #[error("Language model rejected the request: {0}")]
    ModelAuth(String),

    #[error("Language model request failed: {message}")]
    ModelRequest { message: String, retryable: bool },

    #[error("Language model returned an invalid response: {0}")]
    ModelResponse(String),

    #[error("Agent loop error: {0}")]
    AgentLoop(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AgentError {
    /// Network hiccups, timeouts, rate limits and 5xx responses.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AgentError::ProviderRequest {
                retryable: true,
                ..
            } | AgentError::ModelRequest {
                retryable: true,
                ..
            }
        )
    }

    /// Rejected credentials or exhausted quota; nothing downstream can recover.
    pub fn is_auth(&self) -> bool {
        matches!(self, AgentError::ProviderAuth(_) | AgentError::ModelAuth(_))
    }

    /// Which external dependency (or local concern) produced the error.
    pub fn dependency(&self) -> &'static str {
        match self {
            AgentError::Config(_) | AgentError::MissingCredential { .. } => "Configuration",
            AgentError::ProviderAuth(_)
            | AgentError::ProviderRequest { .. }
            | AgentError::ProviderResponse(_)
            | AgentError::EmptyResult { .. } => "Firecrawl",
            AgentError::ModelAuth(_)
            | AgentError::ModelRequest { .. }
            | AgentError::ModelResponse(_) => "Language model",
            AgentError::AgentLoop(_) => "Agent",
            AgentError::Validation(_) => "Input",
            AgentError::Io(_) | AgentError::Serialization(_) => "Runtime",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        let retryable = AgentError::ProviderRequest {
            message: "timeout".to_string(),
            retryable: true,
        };
        let permanent = AgentError::ModelRequest {
            message: "bad request".to_string(),
            retryable: false,
        };

        assert!(retryable.is_transient());
        assert!(!permanent.is_transient());
        assert!(!AgentError::ProviderAuth("401".to_string()).is_transient());
    }

    #[test]
    fn test_dependency_labels() {
        let missing = AgentError::MissingCredential {
            variable: "FIRECRAWL_API_KEY".to_string(),
        };
        assert_eq!(missing.dependency(), "Configuration");
        assert!(missing.to_string().contains("FIRECRAWL_API_KEY"));

        assert_eq!(AgentError::ModelAuth("x".to_string()).dependency(), "Language model");
        assert_eq!(
            AgentError::EmptyResult {
                topic: "t".to_string()
            }
            .dependency(),
            "Firecrawl"
        );
    }
}
