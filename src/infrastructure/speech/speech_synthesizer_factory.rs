use std::sync::Arc;

use crate::application::ports::SpeechSynthesizer;

use super::google_tts_synthesizer::{GoogleTtsSynthesizer, VoiceSelection};
use super::openai_tts_synthesizer::OpenAiTtsSynthesizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechProvider {
    Google,
    OpenAi,
}

#[derive(Debug, Clone)]
pub struct SpeechSynthesizerConfig {
    pub provider: SpeechProvider,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub google_voice: VoiceSelection,
    pub openai_model: String,
    pub openai_voice: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SpeechSynthesizerFactoryError {
    #[error("api_key is required for the {0:?} speech provider")]
    MissingApiKey(SpeechProvider),
}

pub struct SpeechSynthesizerFactory;

impl SpeechSynthesizerFactory {
    pub fn create(
        config: SpeechSynthesizerConfig,
    ) -> Result<Arc<dyn SpeechSynthesizer>, SpeechSynthesizerFactoryError> {
        let api_key = config
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or(SpeechSynthesizerFactoryError::MissingApiKey(config.provider))?;

        match config.provider {
            SpeechProvider::Google => {
                tracing::info!(
                    language_code = %config.google_voice.language_code,
                    "Using Google Text-to-Speech"
                );
                Ok(Arc::new(GoogleTtsSynthesizer::new(
                    api_key,
                    config.google_voice,
                    config.base_url,
                )))
            }
            SpeechProvider::OpenAi => {
                tracing::info!(model = %config.openai_model, "Using OpenAI speech synthesis");
                Ok(Arc::new(OpenAiTtsSynthesizer::new(
                    api_key,
                    config.openai_model,
                    config.openai_voice,
                    config.base_url,
                )))
            }
        }
    }
}
