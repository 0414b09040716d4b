use crate::application::ports::{LlmClient, LlmClientError};
use crate::domain::ComposedPrompt;

/// Canned client used in scaffold mode.
pub struct MockLlmClient;

#[async_trait::async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, prompt: &ComposedPrompt) -> Result<String, LlmClientError> {
        Ok(format!(
            "Scaffold answer. I received {} characters of study material. Configure a language model provider for real answers.",
            prompt.excerpt().chars().count()
        ))
    }
}
