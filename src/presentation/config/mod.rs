mod environment;
mod scaffold_config;
mod settings;

pub use environment::{ENVIRONMENT_VAR, Environment, UnknownEnvironment};
pub use scaffold_config::ScaffoldConfig;
pub use settings::{
    LlmProviderSetting, LlmSettings, LoggingSettings, PipelineSettings, ServerSettings, Settings,
    SpeechProviderSetting, SpeechSettings, StorageSettings, SynthesisFailureSetting,
};
