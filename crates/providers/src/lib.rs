//! Provider abstractions for the AI naming collaborator.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod credentials;
pub mod noop;
pub mod openai;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("ai naming disabled")]
    Disabled,
    #[error("invalid api key")]
    InvalidApiKey,
    #[error("quota exceeded")]
    QuotaExceeded,
    #[error("rate limited")]
    RateLimited,
    #[error("request timed out")]
    Timeout,
    #[error("empty response")]
    EmptyResponse,
    #[error("request failed: {0}")]
    RequestFailed(String),
}

impl ProviderError {
    /// Errors after which no further request in the same run can succeed.
    pub fn is_fatal_for_run(&self) -> bool {
        matches!(self, ProviderError::InvalidApiKey)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
    pub model: Option<String>,
}

#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    async fn suggest(&self, prompt: &str) -> Result<Suggestion, ProviderError>;
}
