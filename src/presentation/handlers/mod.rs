mod api_error;
mod health;
mod process;

pub use api_error::{ApiError, ErrorResponse, GENERIC_FAILURE_MESSAGE};
pub use health::health_handler;
pub use process::{ProcessResponse, STUDY_MATERIAL_FIELD, USER_QUERY_FIELD, process_handler};
