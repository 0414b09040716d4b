#![allow(dead_code)]

pub mod mock_upstream;

use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt};

use elemnote::application::ports::{
    LlmClient, LlmClientError, SpeechSynthesisError, SpeechSynthesizer, StagingStore,
    StagingStoreError,
};
use elemnote::application::services::{
    DEFAULT_MAX_DOCUMENT_CHARS, PromptComposer, StudyPipeline, SynthesisFailurePolicy,
};
use elemnote::domain::{ComposedPrompt, STUDY_TUTOR_PERSONA, StoragePath, SynthesizedAudio};
use elemnote::infrastructure::storage::LocalStagingStore;
use elemnote::infrastructure::text_processing::CompositeFileLoader;

pub const STUB_ANSWER: &str = "Plants use light to make energy.";
pub const STUB_AUDIO: &[u8] = b"ID3-stub-audio";

/// Language model double that records every prompt it receives.
#[derive(Default)]
pub struct RecordingLlmClient {
    prompts: Mutex<Vec<ComposedPrompt>>,
}

impl RecordingLlmClient {
    pub fn prompts(&self) -> Vec<ComposedPrompt> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl LlmClient for RecordingLlmClient {
    async fn complete(&self, prompt: &ComposedPrompt) -> Result<String, LlmClientError> {
        self.prompts.lock().unwrap().push(prompt.clone());
        Ok(STUB_ANSWER.to_string())
    }
}

pub struct FailingLlmClient;

#[async_trait::async_trait]
impl LlmClient for FailingLlmClient {
    async fn complete(&self, _prompt: &ComposedPrompt) -> Result<String, LlmClientError> {
        Err(LlmClientError::ApiRequestFailed(
            "HTTP 503: model overloaded".to_string(),
        ))
    }
}

pub struct StubSpeechSynthesizer;

#[async_trait::async_trait]
impl SpeechSynthesizer for StubSpeechSynthesizer {
    async fn synthesize(&self, _text: &str) -> Result<SynthesizedAudio, SpeechSynthesisError> {
        Ok(SynthesizedAudio::mp3(STUB_AUDIO.to_vec()))
    }
}

pub struct FailingSpeechSynthesizer;

#[async_trait::async_trait]
impl SpeechSynthesizer for FailingSpeechSynthesizer {
    async fn synthesize(&self, _text: &str) -> Result<SynthesizedAudio, SpeechSynthesisError> {
        Err(SpeechSynthesisError::RateLimited)
    }
}

/// Wraps the local store and counts removals.
pub struct CountingStagingStore {
    inner: LocalStagingStore,
    removals: AtomicUsize,
}

impl CountingStagingStore {
    pub fn new(inner: LocalStagingStore) -> Self {
        Self {
            inner,
            removals: AtomicUsize::new(0),
        }
    }

    pub fn removal_count(&self) -> usize {
        self.removals.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl StagingStore for CountingStagingStore {
    async fn stage(
        &self,
        path: &StoragePath,
        stream: BoxStream<'_, Result<Bytes, io::Error>>,
    ) -> Result<u64, StagingStoreError> {
        self.inner.stage(path, stream).await
    }

    async fn read(&self, path: &StoragePath) -> Result<Vec<u8>, StagingStoreError> {
        self.inner.read(path).await
    }

    async fn remove(&self, path: &StoragePath) -> Result<(), StagingStoreError> {
        self.removals.fetch_add(1, Ordering::SeqCst);
        self.inner.remove(path).await
    }
}

/// A pipeline wired with in-process doubles and a staging directory that
/// lives as long as the fixture.
pub struct PipelineFixture {
    pub dir: tempfile::TempDir,
    pub store: Arc<CountingStagingStore>,
    pub llm: Arc<RecordingLlmClient>,
    pub pipeline: Arc<StudyPipeline>,
}

impl PipelineFixture {
    pub fn new() -> Self {
        Self::with(
            Arc::new(StubSpeechSynthesizer),
            SynthesisFailurePolicy::DropAudio,
        )
    }

    pub fn with(
        speech_synthesizer: Arc<dyn SpeechSynthesizer>,
        on_synthesis_failure: SynthesisFailurePolicy,
    ) -> Self {
        let llm = Arc::new(RecordingLlmClient::default());
        Self::build(llm.clone(), llm, speech_synthesizer, on_synthesis_failure)
    }

    pub fn with_llm(llm_client: Arc<dyn LlmClient>) -> Self {
        Self::build(
            Arc::new(RecordingLlmClient::default()),
            llm_client,
            Arc::new(StubSpeechSynthesizer),
            SynthesisFailurePolicy::DropAudio,
        )
    }

    fn build(
        llm: Arc<RecordingLlmClient>,
        llm_client: Arc<dyn LlmClient>,
        speech_synthesizer: Arc<dyn SpeechSynthesizer>,
        on_synthesis_failure: SynthesisFailurePolicy,
    ) -> Self {
        let dir = tempfile::TempDir::new().unwrap();
        let store = Arc::new(CountingStagingStore::new(
            LocalStagingStore::new(dir.path().to_path_buf()).unwrap(),
        ));

        let pipeline = Arc::new(StudyPipeline::new(
            Arc::new(CompositeFileLoader::default()),
            llm_client,
            speech_synthesizer,
            store.clone(),
            PromptComposer::new(STUDY_TUTOR_PERSONA, DEFAULT_MAX_DOCUMENT_CHARS),
            on_synthesis_failure,
        ));

        Self {
            dir,
            store,
            llm,
            pipeline,
        }
    }

    pub fn staged_file_count(&self) -> usize {
        staged_file_count(self.dir.path())
    }
}

pub fn staged_file_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}

pub fn byte_stream(data: &[u8]) -> BoxStream<'static, Result<Bytes, io::Error>> {
    stream::iter(vec![Ok(Bytes::copy_from_slice(data))]).boxed()
}

pub const BOUNDARY: &str = "elemnote-test-boundary";

pub enum FormPart<'a> {
    File {
        name: &'a str,
        filename: &'a str,
        content_type: &'a str,
        data: &'a [u8],
    },
    Text {
        name: &'a str,
        value: &'a str,
    },
}

pub fn study_material<'a>(filename: &'a str, content_type: &'a str, data: &'a [u8]) -> FormPart<'a> {
    FormPart::File {
        name: "studyMaterial",
        filename,
        content_type,
        data,
    }
}

pub fn user_query(value: &str) -> FormPart<'_> {
    FormPart::Text {
        name: "userQuery",
        value,
    }
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}

pub fn multipart_body(parts: &[FormPart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            FormPart::File {
                name,
                filename,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
            FormPart::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}")
                        .as_bytes(),
                );
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}
