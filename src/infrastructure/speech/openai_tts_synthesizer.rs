use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::application::ports::{SpeechSynthesisError, SpeechSynthesizer};
use crate::domain::SynthesizedAudio;

use super::text_segmenter::split_for_synthesis;

pub const OPENAI_TTS_BASE_URL: &str = "https://api.openai.com/v1";

/// Upstream limit on `input`, in characters; used as a byte budget, which is
/// never larger than the character count.
pub const OPENAI_TTS_MAX_INPUT: usize = 4096;

/// OpenAI `audio/speech` synthesizer (MP3 output).
pub struct OpenAiTtsSynthesizer {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    voice: String,
}

#[derive(Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'static str,
}

impl OpenAiTtsSynthesizer {
    pub fn new(api_key: String, model: String, voice: String, base_url: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url
                .unwrap_or_else(|| OPENAI_TTS_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            api_key,
            model,
            voice,
        }
    }

    async fn synthesize_piece(&self, text: &str) -> Result<Vec<u8>, SpeechSynthesisError> {
        let body = SpeechRequest {
            model: &self.model,
            input: text,
            voice: &self.voice,
            response_format: "mp3",
        };

        let response = self
            .client
            .post(format!("{}/audio/speech", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SpeechSynthesisError::ApiRequestFailed(format!("request: {e}")))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SpeechSynthesisError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechSynthesisError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SpeechSynthesisError::InvalidResponse(format!("body: {e}")))?;

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl SpeechSynthesizer for OpenAiTtsSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, SpeechSynthesisError> {
        let pieces = split_for_synthesis(text, OPENAI_TTS_MAX_INPUT);
        if pieces.is_empty() {
            return Err(SpeechSynthesisError::EmptyInput);
        }

        tracing::debug!(model = %self.model, voice = %self.voice, pieces = pieces.len(), "Sending text to OpenAI speech API");

        let mut audio = Vec::new();
        for piece in pieces {
            audio.extend(self.synthesize_piece(piece).await?);
        }

        tracing::info!(bytes = audio.len(), "OpenAI speech synthesis completed");

        Ok(SynthesizedAudio::mp3(audio))
    }
}
