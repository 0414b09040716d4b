use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{LlmClient, LlmClientError};
use crate::domain::{ComposedPrompt, PromptRole};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Google Gemini `generateContent` client.
///
/// The persona segment goes into `systemInstruction`; the task segment is the
/// single `user` turn.
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    max_output_tokens: Option<u32>,
    temperature: Option<f32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String, base_url: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url
                .unwrap_or_else(|| GEMINI_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            api_key,
            model,
            max_output_tokens: None,
            temperature: None,
        }
    }

    pub fn with_generation_config(
        mut self,
        max_output_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Self {
        self.max_output_tokens = max_output_tokens;
        self.temperature = temperature;
        self
    }

    fn build_request<'a>(&self, prompt: &'a ComposedPrompt) -> GenerateContentRequest<'a> {
        let mut system_parts = Vec::new();
        let mut user_parts = Vec::new();
        for segment in prompt.segments() {
            let part = Part {
                text: segment.content,
            };
            match segment.role {
                PromptRole::System => system_parts.push(part),
                PromptRole::User => user_parts.push(part),
            }
        }

        let generation_config = (self.max_output_tokens.is_some() || self.temperature.is_some())
            .then_some(GenerationConfig {
                max_output_tokens: self.max_output_tokens,
                temperature: self.temperature,
            });

        GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: system_parts,
            },
            contents: vec![Content {
                role: Some("user"),
                parts: user_parts,
            }],
            generation_config,
        }
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(&self, prompt: &ComposedPrompt) -> Result<String, LlmClientError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let request_body = self.build_request(prompt);

        tracing::debug!(model = %self.model, "Sending prompt to Gemini");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| LlmClientError::ApiRequestFailed(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmClientError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmClientError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let generated: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LlmClientError::InvalidResponse(e.to_string()))?;

        if let Some(reason) = generated
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason)
        {
            return Err(LlmClientError::InvalidResponse(format!(
                "prompt blocked: {reason}"
            )));
        }

        let candidate = generated
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| LlmClientError::InvalidResponse("empty candidates".to_string()))?;

        let text: String = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(LlmClientError::InvalidResponse(format!(
                "no text in candidate (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }

        Ok(text)
    }
}
