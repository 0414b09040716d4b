use std::io;
use std::sync::Arc;

use axum::{Extension, Json};
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use futures::StreamExt;
use serde::Serialize;
use tracing::Instrument;

use crate::application::ports::StagingStoreError;
use crate::application::services::{PipelineError, ResponsePayload, StudyIntake, ValidationError};
use crate::domain::MediaType;
use crate::infrastructure::observability::{RequestId, sanitize_prompt};
use crate::presentation::state::AppState;

use super::api_error::ApiError;

pub const STUDY_MATERIAL_FIELD: &str = "studyMaterial";
pub const USER_QUERY_FIELD: &str = "userQuery";

const UNKNOWN_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResponse {
    pub ai_response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
}

impl From<ResponsePayload> for ProcessResponse {
    fn from(payload: ResponsePayload) -> Self {
        Self {
            ai_response: payload.ai_response,
            audio: payload.audio,
        }
    }
}

#[tracing::instrument(skip_all)]
pub async fn process_handler(
    State(state): State<AppState>,
    request_id: Option<Extension<RequestId>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let request_id = request_id.map(|Extension(id)| id.to_string());
    let mut intake = StudyIntake::new(Arc::clone(&state.pipeline), request_id);
    match multipart {
        Ok(multipart) => read_study_request(&mut intake, multipart).await,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Request is not a multipart form");
            intake.fail(ValidationError::MalformedForm(rejection.body_text()));
        }
    }

    if let Some(query) = intake.query() {
        tracing::debug!(query = %sanitize_prompt(query), "Study request received");
    }

    // Detached so the staged upload is still cleaned up if the client disconnects.
    let request = intake.into_request();
    let pipeline = Arc::clone(&state.pipeline);
    let outcome = tokio::spawn(async move { pipeline.handle(request).await }.in_current_span())
        .await;

    match outcome {
        Ok(Ok(payload)) => {
            tracing::info!(has_audio = payload.audio.is_some(), "Study request completed");
            (StatusCode::OK, Json(ProcessResponse::from(payload))).into_response()
        }
        Ok(Err(e)) => ApiError::from(e).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Study pipeline task failed");
            ApiError::internal(e.to_string()).into_response()
        }
    }
}

/// Reads the form, staging the study material as it streams in.
///
/// Problems are recorded on the intake rather than returned, so the pipeline
/// reports them and still removes anything already staged.
async fn read_study_request(intake: &mut StudyIntake, mut multipart: Multipart) {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                intake.fail(ValidationError::MalformedForm(e.body_text()));
                break;
            }
        };

        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(STUDY_MATERIAL_FIELD) => {
                if intake.has_document() {
                    intake.fail(ValidationError::DuplicateDocument);
                    break;
                }

                let filename = field.file_name().unwrap_or_default().to_string();
                let media_type =
                    MediaType::from_mime(field.content_type().unwrap_or(UNKNOWN_CONTENT_TYPE));
                let stream = field.map(|chunk| chunk.map_err(io::Error::other)).boxed();

                match intake.stage_upload(filename, media_type, stream).await {
                    Ok(()) => {}
                    Err(StagingStoreError::Io(e)) => {
                        intake.fail(ValidationError::MalformedForm(e.to_string()));
                        break;
                    }
                    Err(e) => {
                        intake.fail(PipelineError::Storage(e));
                        break;
                    }
                }
            }
            Some(USER_QUERY_FIELD) => match field.text().await {
                Ok(text) => intake.set_query(text),
                Err(e) => {
                    intake.fail(ValidationError::MalformedForm(e.body_text()));
                    break;
                }
            },
            other => {
                tracing::debug!(field = ?other, "Ignoring unexpected form field");
            }
        }
    }
}
