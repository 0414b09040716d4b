use std::io;
use std::sync::Arc;

use bytes::Bytes;
use futures::stream::BoxStream;
use tracing::Instrument;

use crate::application::ports::StagingStoreError;
use crate::domain::MediaType;

use super::study_pipeline::{PipelineError, StudyPipeline, StudyRequest};

/// A request whose form is still being read.
///
/// Owns whatever has been staged so far. If it is dropped before
/// [`StudyIntake::into_request`] hands the request to the pipeline (the client
/// went away mid-form, or the handler future was cancelled), the staged upload
/// is deleted on a background task.
pub struct StudyIntake {
    pipeline: Arc<StudyPipeline>,
    request: StudyRequest,
}

impl StudyIntake {
    pub fn new(pipeline: Arc<StudyPipeline>, request_id: Option<String>) -> Self {
        Self {
            pipeline,
            request: StudyRequest {
                request_id,
                ..StudyRequest::default()
            },
        }
    }

    pub fn has_document(&self) -> bool {
        self.request.document.is_some()
    }

    /// Streams the study material into staging and keeps the resulting document.
    pub async fn stage_upload(
        &mut self,
        filename: String,
        media_type: MediaType,
        stream: BoxStream<'_, Result<Bytes, io::Error>>,
    ) -> Result<(), StagingStoreError> {
        let document = self
            .pipeline
            .stage_upload(filename, media_type, stream)
            .await?;
        self.request.document = Some(document);
        Ok(())
    }

    pub fn set_query(&mut self, query: String) {
        self.request.query = Some(query);
    }

    pub fn query(&self) -> Option<&str> {
        self.request.query.as_deref()
    }

    /// Records an intake failure. The first one wins.
    pub fn fail(&mut self, error: impl Into<PipelineError>) {
        if self.request.intake_error.is_none() {
            self.request.intake_error = Some(error.into());
        }
    }

    pub fn into_request(mut self) -> StudyRequest {
        std::mem::take(&mut self.request)
    }
}

impl Drop for StudyIntake {
    fn drop(&mut self) {
        let Some(document) = self.request.document.take() else {
            return;
        };

        tracing::warn!(
            request_id = self.request.request_id.as_deref().unwrap_or_default(),
            document_id = %document.id.as_uuid(),
            "Request abandoned while reading the form"
        );

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let pipeline = Arc::clone(&self.pipeline);
                drop(runtime.spawn(
                    async move { pipeline.discard(&document).await }.in_current_span(),
                ));
            }
            Err(_) => tracing::error!(
                path = %document.storage_path,
                "No runtime available to delete abandoned upload"
            ),
        }
    }
}
