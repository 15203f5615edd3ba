// file: src/utils/retry.rs
// description: bounded exponential backoff for transient provider failures
// reference: https://docs.rs/tokio/latest/tokio/time/fn.sleep.html

use crate::config::RetryConfig;
use crate::error::Result;
use reqwest::StatusCode;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    /// Delay before retry number `attempt` (1-based), doubling up to `max_backoff`.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig {
            max_retries: 2,
            initial_backoff_ms: 500,
            max_backoff_ms: 4000,
        })
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
            max_backoff: Duration::from_millis(config.max_backoff_ms),
        }
    }
}

/// Run `operation`, retrying only errors that report `is_transient()`.
pub async fn retry_async<T, F, Fut>(policy: &RetryPolicy, label: &str, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < policy.max_retries => {
                attempt += 1;
                let delay = policy.backoff_for(attempt);
                warn!(
                    "{} failed ({}), retry {}/{} in {}ms",
                    label,
                    e,
                    attempt,
                    policy.max_retries,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// How an HTTP error status should be treated by the provider clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Auth,
    Retryable,
    Permanent,
}

pub fn classify_status(status: StatusCode) -> StatusClass {
    match status.as_u16() {
        401..=403 => StatusClass::Auth,
        408 | 429 => StatusClass::Retryable,
        s if s >= 500 => StatusClass::Retryable,
        _ => StatusClass::Permanent,
    }
}

/// Transport failures that are worth another attempt.
pub fn is_retryable_transport(error: &reqwest::Error) -> bool {
    error.is_timeout() || error.is_connect() || error.is_request()
}
