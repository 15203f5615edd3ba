// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{AgentError, Result};
use crate::utils::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

pub const ENV_PREFIX: &str = "POST_AGENT";
pub const FIRECRAWL_API_KEY: &str = "FIRECRAWL_API_KEY";
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub research: ResearchConfig,
    pub model: ModelConfig,
    pub agent: AgentConfig,
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResearchConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub limit: usize,
    pub timeout_secs: u64,
    #[serde(default)]
    pub empty_result: EmptyResultPolicy,
    /// Cap on the text handed back to the model; `None` passes everything through.
    #[serde(default)]
    pub max_chars: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AgentConfig {
    pub system_prompt: String,
    pub task: String,
    pub max_iterations: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyResultPolicy {
    /// Zero documents aggregate to `""`.
    #[default]
    EmptyString,
    /// Zero documents fail with `AgentError::EmptyResult`.
    Error,
}

impl ResearchConfig {
    pub fn api_key(&self) -> Result<&str> {
        require_key(self.api_key.as_deref(), FIRECRAWL_API_KEY)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ModelConfig {
    pub fn api_key(&self) -> Result<&str> {
        require_key(self.api_key.as_deref(), OPENAI_API_KEY)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn require_key<'a>(key: Option<&'a str>, variable: &str) -> Result<&'a str> {
    match key {
        Some(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(AgentError::MissingCredential {
            variable: variable.to_string(),
        }),
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let environment = config::Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true);

        Self::load_from(path, environment)
    }

    fn load_from(path: Option<&Path>, environment: config::Environment) -> Result<Self> {
        let mut builder = config::Config::builder().add_source(config::File::from_str(
            DEFAULT_CONFIG,
            config::FileFormat::Toml,
        ));

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        builder = builder.add_source(environment);

        let settings = builder
            .build()
            .map_err(|e| AgentError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| AgentError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            research: ResearchConfig {
                api_key: None,
                base_url: "https://api.firecrawl.dev".to_string(),
                limit: 5,
                timeout_secs: 60,
                empty_result: EmptyResultPolicy::EmptyString,
                max_chars: None,
            },
            model: ModelConfig {
                api_key: None,
                base_url: "https://api.openai.com/v1".to_string(),
                model: "gpt-4o".to_string(),
                temperature: 0.7,
                timeout_secs: 120,
            },
            agent: AgentConfig {
                system_prompt: crate::agent::prompt::DEFAULT_SYSTEM_PROMPT.to_string(),
                task: crate::agent::prompt::DEFAULT_TASK.to_string(),
                max_iterations: 8,
            },
            retry: RetryConfig {
                max_retries: 2,
                initial_backoff_ms: 500,
                max_backoff_ms: 4000,
            },
        }
    }

    /// Fill API keys missing from the config layers using `lookup` (normally the
    /// process environment). Fails on the first required key that is still absent.
    pub fn resolve_credentials<F>(&mut self, require_model: bool, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if is_blank(&self.research.api_key) {
            self.research.api_key = lookup(FIRECRAWL_API_KEY);
        }
        self.research.api_key()?;

        if is_blank(&self.model.api_key) {
            self.model.api_key = lookup(OPENAI_API_KEY);
        }
        if require_model {
            self.model.api_key()?;
        }

        Ok(())
    }

    pub fn resolve_credentials_from_env(&mut self, require_model: bool) -> Result<()> {
        self.resolve_credentials(require_model, |name| std::env::var(name).ok())
    }

    /// Copy suitable for printing; credentials are masked.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.research.api_key = copy.research.api_key.as_ref().map(|_| "***".to_string());
        copy.model.api_key = copy.model.api_key.as_ref().map(|_| "***".to_string());
        copy
    }

    fn validate(&self) -> Result<()> {
        let invalid = |e: AgentError| AgentError::Config(e.to_string());

        Validator::validate_url(&self.research.base_url).map_err(invalid)?;
        Validator::validate_url(&self.model.base_url).map_err(invalid)?;
        Validator::validate_limit(self.research.limit).map_err(invalid)?;
        Validator::validate_temperature(self.model.temperature).map_err(invalid)?;

        if self.model.model.trim().is_empty() {
            return Err(AgentError::Config("model must not be empty".to_string()));
        }

        if self.research.timeout_secs == 0 || self.model.timeout_secs == 0 {
            return Err(AgentError::Config(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.research.max_chars == Some(0) {
            return Err(AgentError::Config(
                "max_chars must be greater than 0 when set".to_string(),
            ));
        }

        if self.agent.max_iterations == 0 {
            return Err(AgentError::Config(
                "max_iterations must be greater than 0".to_string(),
            ));
        }

        if self.retry.initial_backoff_ms > self.retry.max_backoff_ms {
            return Err(AgentError::Config(
                "initial_backoff_ms must not exceed max_backoff_ms".to_string(),
            ));
        }

        Ok(())
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}
