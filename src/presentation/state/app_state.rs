use std::sync::Arc;

use crate::application::services::StudyPipeline;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<StudyPipeline>,
    pub max_upload_bytes: usize,
}
