use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{SpeechSynthesisError, SpeechSynthesizer};
use crate::domain::{AudioEncoding, SynthesizedAudio};

use super::text_segmenter::split_for_synthesis;

pub const GOOGLE_TTS_BASE_URL: &str = "https://texttospeech.googleapis.com/v1";

/// Upstream limit on the `input.text` field of one request.
pub const GOOGLE_TTS_MAX_INPUT_BYTES: usize = 5000;

/// Google Cloud Text-to-Speech over its REST API.
///
/// Long answers are split into several requests, sent one after another, and
/// the MP3 frames are concatenated into a single buffer.
pub struct GoogleTtsSynthesizer {
    client: Client,
    base_url: String,
    api_key: String,
    voice: VoiceSelection,
    max_input_bytes: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceSelection {
    pub language_code: String,
    pub ssml_gender: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Default for VoiceSelection {
    fn default() -> Self {
        Self {
            language_code: "en-US".to_string(),
            ssml_gender: "NEUTRAL".to_string(),
            name: None,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest<'a> {
    input: SynthesisInput<'a>,
    voice: &'a VoiceSelection,
    audio_config: AudioConfig,
}

#[derive(Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: &'static str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    #[serde(default)]
    audio_content: String,
}

impl GoogleTtsSynthesizer {
    pub fn new(api_key: String, voice: VoiceSelection, base_url: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url
                .unwrap_or_else(|| GOOGLE_TTS_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            api_key,
            voice,
            max_input_bytes: GOOGLE_TTS_MAX_INPUT_BYTES,
        }
    }

    pub fn with_max_input_bytes(mut self, max_input_bytes: usize) -> Self {
        self.max_input_bytes = max_input_bytes.max(1);
        self
    }

    async fn synthesize_piece(&self, text: &str) -> Result<Vec<u8>, SpeechSynthesisError> {
        let request_body = SynthesizeRequest {
            input: SynthesisInput { text },
            voice: &self.voice,
            audio_config: AudioConfig {
                audio_encoding: AudioEncoding::Mp3.api_name(),
            },
        };

        let response = self
            .client
            .post(format!("{}/text:synthesize", self.base_url))
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| SpeechSynthesisError::ApiRequestFailed(format!("request: {e}")))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SpeechSynthesisError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(SpeechSynthesisError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let synthesized: SynthesizeResponse = response
            .json()
            .await
            .map_err(|e| SpeechSynthesisError::InvalidResponse(format!("parse response: {e}")))?;

        BASE64
            .decode(synthesized.audio_content.as_bytes())
            .map_err(|e| SpeechSynthesisError::InvalidResponse(format!("audio content: {e}")))
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTtsSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, SpeechSynthesisError> {
        let pieces = split_for_synthesis(text, self.max_input_bytes);
        if pieces.is_empty() {
            return Err(SpeechSynthesisError::EmptyInput);
        }

        tracing::debug!(
            language_code = %self.voice.language_code,
            pieces = pieces.len(),
            "Sending text to Google Text-to-Speech"
        );

        let mut audio = Vec::new();
        for piece in pieces {
            audio.extend(self.synthesize_piece(piece).await?);
        }

        if audio.is_empty() {
            return Err(SpeechSynthesisError::InvalidResponse(
                "empty audio content".to_string(),
            ));
        }

        tracing::info!(bytes = audio.len(), "Google Text-to-Speech synthesis completed");

        Ok(SynthesizedAudio::mp3(audio))
    }
}
