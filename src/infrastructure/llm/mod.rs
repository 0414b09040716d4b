mod gemini_client;
mod llm_client_factory;
mod mock_llm_client;
mod openai_client;

pub use gemini_client::{GEMINI_BASE_URL, GeminiClient};
pub use llm_client_factory::{LlmClientConfig, LlmClientFactory, LlmClientFactoryError, LlmProvider};
pub use mock_llm_client::MockLlmClient;
pub use openai_client::{OPENAI_BASE_URL, OpenAiClient};
