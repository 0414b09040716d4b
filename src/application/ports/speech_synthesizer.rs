use async_trait::async_trait;

use crate::domain::SynthesizedAudio;

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, SpeechSynthesisError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SpeechSynthesisError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("rate limited")]
    RateLimited,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("nothing to synthesize")]
    EmptyInput,
}
