use std::fmt;

/// Stages of a single study request. The pipeline moves through them in
/// order and always ends in `CleanedUp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    Received,
    Validated,
    Extracted,
    Composed,
    AiGenerated,
    Synthesized,
    Packaged,
    CleanedUp,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Received => "RECEIVED",
            PipelineStage::Validated => "VALIDATED",
            PipelineStage::Extracted => "EXTRACTED",
            PipelineStage::Composed => "COMPOSED",
            PipelineStage::AiGenerated => "AI_GENERATED",
            PipelineStage::Synthesized => "SYNTHESIZED",
            PipelineStage::Packaged => "PACKAGED",
            PipelineStage::CleanedUp => "CLEANED_UP",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
