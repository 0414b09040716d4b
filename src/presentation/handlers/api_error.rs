use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::services::PipelineError;

pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to process study material or generate response.";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// A pipeline failure shaped for the HTTP boundary: `400` with the message for
/// client-caused failures, `500` with a generic message plus details otherwise.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ApiError {
    pub fn internal(details: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ErrorResponse {
                error: GENERIC_FAILURE_MESSAGE.to_string(),
                details: Some(details.into()),
            },
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(error: PipelineError) -> Self {
        if error.is_client_error() {
            Self {
                status: StatusCode::BAD_REQUEST,
                body: ErrorResponse {
                    error: error.to_string(),
                    details: None,
                },
            }
        } else {
            Self::internal(error.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
