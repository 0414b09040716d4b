use std::io;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use futures::stream::BoxStream;

use crate::application::ports::{
    FileLoader, FileLoaderError, LlmClient, LlmClientError, SpeechSynthesisError,
    SpeechSynthesizer, StagingStore, StagingStoreError,
};
use crate::domain::{
    DocumentId, MediaType, PipelineStage, StoragePath, SynthesizedAudio, UploadedDocument,
};

use super::prompt_composer::PromptComposer;

/// What to do when the answer was generated but could not be spoken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SynthesisFailurePolicy {
    /// Return the text answer without audio.
    #[default]
    DropAudio,
    /// Fail the whole request.
    FailRequest,
}

/// Everything the HTTP layer collected for one request.
///
/// `intake_error` carries a failure that happened while reading the form, so
/// that it is reported through the same path (and the same cleanup) as every
/// other pipeline failure.
#[derive(Debug, Default)]
pub struct StudyRequest {
    /// Correlation id of the HTTP request, recorded on the pipeline span.
    pub request_id: Option<String>,
    pub document: Option<UploadedDocument>,
    pub query: Option<String>,
    pub intake_error: Option<PipelineError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponsePayload {
    pub ai_response: String,
    /// Base64 of the synthesized audio.
    pub audio: Option<String>,
}

pub struct StudyPipeline {
    file_loader: Arc<dyn FileLoader>,
    llm_client: Arc<dyn LlmClient>,
    speech_synthesizer: Arc<dyn SpeechSynthesizer>,
    staging_store: Arc<dyn StagingStore>,
    prompt_composer: PromptComposer,
    on_synthesis_failure: SynthesisFailurePolicy,
}

impl StudyPipeline {
    pub fn new(
        file_loader: Arc<dyn FileLoader>,
        llm_client: Arc<dyn LlmClient>,
        speech_synthesizer: Arc<dyn SpeechSynthesizer>,
        staging_store: Arc<dyn StagingStore>,
        prompt_composer: PromptComposer,
        on_synthesis_failure: SynthesisFailurePolicy,
    ) -> Self {
        Self {
            file_loader,
            llm_client,
            speech_synthesizer,
            staging_store,
            prompt_composer,
            on_synthesis_failure,
        }
    }

    /// Writes an incoming upload to the staging store under a fresh, unique key.
    pub async fn stage_upload(
        &self,
        filename: String,
        media_type: MediaType,
        stream: BoxStream<'_, Result<Bytes, io::Error>>,
    ) -> Result<UploadedDocument, StagingStoreError> {
        let id = DocumentId::new();
        let path = StoragePath::new(&id);

        let size_bytes = self.staging_store.stage(&path, stream).await?;

        tracing::debug!(
            document_id = %id.as_uuid(),
            media_type = %media_type,
            size_bytes,
            "Upload staged"
        );

        Ok(UploadedDocument::new(id, filename, media_type, size_bytes))
    }

    /// Runs one request through the pipeline.
    ///
    /// The staged upload, if any, is deleted exactly once after the pipeline
    /// finishes, whatever the outcome.
    #[tracing::instrument(
        skip_all,
        fields(
            request_id = request.request_id.as_deref().unwrap_or_default(),
            document_id = ?request.document.as_ref().map(|d| d.id.as_uuid()),
            filename = ?request.document.as_ref().map(|d| d.filename.as_str()),
        )
    )]
    pub async fn handle(&self, request: StudyRequest) -> Result<ResponsePayload, PipelineError> {
        let StudyRequest {
            request_id: _,
            document,
            query,
            intake_error,
        } = request;

        let mut stage = PipelineStage::Received;
        let result = match intake_error {
            Some(e) => Err(e),
            None => {
                self.run(document.as_ref(), query.as_deref(), &mut stage)
                    .await
            }
        };

        if let Err(e) = &result {
            tracing::error!(error = %e, failed_after = %stage, "Study request failed");
        }

        if let Some(document) = &document {
            self.cleanup(document).await;
        }
        tracing::debug!(stage = %PipelineStage::CleanedUp, "Pipeline stage transition");

        result
    }

    async fn run(
        &self,
        document: Option<&UploadedDocument>,
        query: Option<&str>,
        stage: &mut PipelineStage,
    ) -> Result<ResponsePayload, PipelineError> {
        let (document, query) = validate(document, query)?;
        advance(stage, PipelineStage::Validated);

        let text = self.extract(document).await?;
        advance(stage, PipelineStage::Extracted);

        let prompt = self.prompt_composer.compose(&text, query);
        if prompt.was_truncated() {
            tracing::info!(
                extracted_chars = text.chars().count(),
                max_chars = self.prompt_composer.max_document_chars(),
                "Document excerpt truncated"
            );
        }
        advance(stage, PipelineStage::Composed);

        let answer = self
            .llm_client
            .complete(&prompt)
            .await
            .map_err(UpstreamError::Generation)?;
        tracing::info!(chars = answer.chars().count(), "Answer generated");
        advance(stage, PipelineStage::AiGenerated);

        let audio = self.synthesize(&answer).await?;
        advance(stage, PipelineStage::Synthesized);

        let payload = ResponsePayload {
            ai_response: answer,
            audio: audio.map(|a| BASE64.encode(a.data)),
        };
        advance(stage, PipelineStage::Packaged);

        Ok(payload)
    }

    async fn extract(&self, document: &UploadedDocument) -> Result<String, PipelineError> {
        if !document.media_type.is_supported() {
            return Err(PipelineError::UnsupportedType(document.media_type.clone()));
        }

        let data = self
            .staging_store
            .read(&document.storage_path)
            .await
            .map_err(|e| PipelineError::Read(e.to_string()))?;

        let text = self
            .file_loader
            .extract_text(&data, document)
            .await
            .map_err(|e| match e {
                FileLoaderError::UnsupportedContentType(_) => {
                    PipelineError::UnsupportedType(document.media_type.clone())
                }
                FileLoaderError::NoTextFound(_) => PipelineError::EmptyDocument,
                FileLoaderError::ExtractionFailed(msg) => PipelineError::Read(msg),
            })?;

        if text.trim().is_empty() {
            return Err(PipelineError::EmptyDocument);
        }

        tracing::debug!(chars = text.chars().count(), "Text extracted");
        Ok(text)
    }

    async fn synthesize(&self, answer: &str) -> Result<Option<SynthesizedAudio>, PipelineError> {
        match self.speech_synthesizer.synthesize(answer).await {
            Ok(audio) => {
                tracing::debug!(bytes = audio.data.len(), "Speech synthesized");
                Ok(Some(audio))
            }
            Err(e) => match self.on_synthesis_failure {
                SynthesisFailurePolicy::DropAudio => {
                    tracing::warn!(error = %e, "Speech synthesis failed, returning text only");
                    Ok(None)
                }
                SynthesisFailurePolicy::FailRequest => Err(UpstreamError::Synthesis(e).into()),
            },
        }
    }

    /// Deletes an upload that was staged but never reached [`StudyPipeline::handle`].
    pub(crate) async fn discard(&self, document: &UploadedDocument) {
        self.cleanup(document).await;
        tracing::debug!(stage = %PipelineStage::CleanedUp, "Pipeline stage transition");
    }

    async fn cleanup(&self, document: &UploadedDocument) {
        if let Err(e) = self.staging_store.remove(&document.storage_path).await {
            tracing::warn!(
                error = %e,
                path = %document.storage_path,
                "Failed to delete staged upload"
            );
        }
    }
}

fn validate<'a>(
    document: Option<&'a UploadedDocument>,
    query: Option<&'a str>,
) -> Result<(&'a UploadedDocument, &'a str), ValidationError> {
    // A browser form submitted without choosing a file sends an empty, unnamed part.
    let document = document
        .filter(|d| !(d.filename.is_empty() && d.size_bytes == 0))
        .ok_or(ValidationError::MissingDocument)?;
    let query = query
        .filter(|q| !q.trim().is_empty())
        .ok_or(ValidationError::MissingQuery)?;
    Ok((document, query))
}

fn advance(stage: &mut PipelineStage, next: PipelineStage) {
    tracing::debug!(stage = %next, "Pipeline stage transition");
    *stage = next;
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{}", unsupported_type_message(.0))]
    UnsupportedType(MediaType),
    #[error("Could not extract text from the document. It might be scanned or empty.")]
    EmptyDocument,
    #[error("failed to read study material: {0}")]
    Read(String),
    #[error("failed to store upload: {0}")]
    Storage(StagingStoreError),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl PipelineError {
    /// Whether the caller caused the failure (reported as 400 rather than 500).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::UnsupportedType(_) | Self::EmptyDocument
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("No study material uploaded.")]
    MissingDocument,
    #[error("No user query provided.")]
    MissingQuery,
    #[error("Only one study material file can be uploaded.")]
    DuplicateDocument,
    #[error("Failed to read form data: {0}")]
    MalformedForm(String),
}

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("language model: {0}")]
    Generation(LlmClientError),
    #[error("speech synthesis: {0}")]
    Synthesis(SpeechSynthesisError),
}

fn unsupported_type_message(media_type: &MediaType) -> String {
    match media_type {
        MediaType::WordDocument => {
            "Word documents (.docx) are not yet supported. Please upload PDF or plain text."
                .to_string()
        }
        other => format!("Unsupported file type: {other}. Please upload PDF or plain text."),
    }
}
