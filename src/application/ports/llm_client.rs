use async_trait::async_trait;

use crate::domain::ComposedPrompt;

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Sends the prompt and returns the complete answer text.
    async fn complete(&self, prompt: &ComposedPrompt) -> Result<String, LlmClientError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LlmClientError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("rate limited")]
    RateLimited,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
