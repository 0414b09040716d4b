mod audio;
mod document;
mod document_id;
mod persona;
mod pipeline_stage;
mod prompt;
mod storage_path;

pub use audio::{AudioEncoding, SynthesizedAudio};
pub use document::{MediaType, UploadedDocument};
pub use document_id::DocumentId;
pub use persona::STUDY_TUTOR_PERSONA;
pub use pipeline_stage::PipelineStage;
pub use prompt::{ComposedPrompt, PromptRole, PromptSegment};
pub use storage_path::StoragePath;
