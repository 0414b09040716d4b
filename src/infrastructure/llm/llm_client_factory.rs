use std::sync::Arc;

use crate::application::ports::LlmClient;

use super::gemini_client::GeminiClient;
use super::openai_client::OpenAiClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    Gemini,
    OpenAi,
}

#[derive(Debug, Clone)]
pub struct LlmClientConfig {
    pub provider: LlmProvider,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: String,
    pub max_output_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

#[derive(Debug, thiserror::Error)]
pub enum LlmClientFactoryError {
    #[error("api_key is required for the {0:?} language model provider")]
    MissingApiKey(LlmProvider),
}

pub struct LlmClientFactory;

impl LlmClientFactory {
    pub fn create(config: LlmClientConfig) -> Result<Arc<dyn LlmClient>, LlmClientFactoryError> {
        let api_key = config
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or(LlmClientFactoryError::MissingApiKey(config.provider))?;

        match config.provider {
            LlmProvider::Gemini => {
                tracing::info!(model = %config.model, "Using Gemini language model");
                Ok(Arc::new(
                    GeminiClient::new(api_key, config.model, config.base_url)
                        .with_generation_config(config.max_output_tokens, config.temperature),
                ))
            }
            LlmProvider::OpenAi => {
                tracing::info!(model = %config.model, "Using OpenAI-compatible language model");
                Ok(Arc::new(
                    OpenAiClient::new(api_key, config.model, config.base_url)
                        .with_generation_config(config.max_output_tokens, config.temperature),
                ))
            }
        }
    }
}
