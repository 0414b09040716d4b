mod file_loader;
mod llm_client;
mod speech_synthesizer;
mod staging_store;

pub use file_loader::{FileLoader, FileLoaderError};
pub use llm_client::{LlmClient, LlmClientError};
pub use speech_synthesizer::{SpeechSynthesisError, SpeechSynthesizer};
pub use staging_store::{StagingStore, StagingStoreError};
