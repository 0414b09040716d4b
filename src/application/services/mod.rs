mod prompt_composer;
mod study_intake;
mod study_pipeline;

pub use prompt_composer::{DEFAULT_MAX_DOCUMENT_CHARS, PromptComposer, truncate_chars};
pub use study_intake::StudyIntake;
pub use study_pipeline::{
    PipelineError, ResponsePayload, StudyPipeline, StudyRequest, SynthesisFailurePolicy,
    UpstreamError, ValidationError,
};
