use std::path::Path;

use config::{Config, ConfigError, File, Map};
use serde::Deserialize;

use crate::application::services::{DEFAULT_MAX_DOCUMENT_CHARS, SynthesisFailurePolicy};
use crate::infrastructure::llm::{LlmClientConfig, LlmProvider};
use crate::infrastructure::speech::{SpeechProvider, SpeechSynthesizerConfig, VoiceSelection};

use super::Environment;

const ENV_PREFIX: &str = "APP";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub llm: LlmSettings,
    pub speech: SpeechSettings,
    pub storage: StorageSettings,
    pub pipeline: PipelineSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Loads defaults, then `appsettings.{environment}.toml` if present, then
    /// `APP_*` environment variables (`__` separates nested keys, e.g.
    /// `APP_LLM__API_KEY`).
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Self::load_from(Path::new("."), environment, None)
    }

    /// Same layering as [`Settings::load`], reading the settings file from
    /// `config_dir`. `env_vars`, when given, stands in for the process
    /// environment.
    pub fn load_from(
        config_dir: &Path,
        environment: Environment,
        env_vars: Option<Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let settings_file = config_dir.join(format!("appsettings.{}", environment.name()));

        Config::builder()
            .add_source(File::with_name(&settings_file.to_string_lossy()).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator(ENV_SEPARATOR)
                    .source(env_vars),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub max_upload_mb: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            max_upload_mb: 16,
        }
    }
}

impl ServerSettings {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderSetting {
    #[default]
    Gemini,
    #[serde(rename = "openai")]
    OpenAi,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub provider: LlmProviderSetting,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub chat_model: String,
    pub max_output_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: LlmProviderSetting::Gemini,
            api_key: None,
            base_url: None,
            chat_model: "gemini-2.5-flash".to_string(),
            max_output_tokens: None,
            temperature: None,
        }
    }
}

impl LlmSettings {
    /// Client configuration; a missing key falls back to the provider's
    /// conventional variable (`GEMINI_API_KEY` or `OPENAI_API_KEY`).
    pub fn client_config(&self) -> LlmClientConfig {
        let (provider, fallback_var) = match self.provider {
            LlmProviderSetting::Gemini => (LlmProvider::Gemini, "GEMINI_API_KEY"),
            LlmProviderSetting::OpenAi => (LlmProvider::OpenAi, "OPENAI_API_KEY"),
        };

        LlmClientConfig {
            provider,
            api_key: self
                .api_key
                .clone()
                .or_else(|| std::env::var(fallback_var).ok()),
            base_url: self.base_url.clone(),
            model: self.chat_model.clone(),
            max_output_tokens: self.max_output_tokens,
            temperature: self.temperature,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechProviderSetting {
    #[default]
    Google,
    #[serde(rename = "openai")]
    OpenAi,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    pub provider: SpeechProviderSetting,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub language_code: String,
    pub ssml_gender: String,
    pub voice_name: Option<String>,
    pub openai_model: String,
    pub openai_voice: String,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            provider: SpeechProviderSetting::Google,
            api_key: None,
            base_url: None,
            language_code: "en-US".to_string(),
            ssml_gender: "NEUTRAL".to_string(),
            voice_name: None,
            openai_model: "tts-1".to_string(),
            openai_voice: "alloy".to_string(),
        }
    }
}

impl SpeechSettings {
    /// Synthesizer configuration; a missing key falls back to
    /// `GOOGLE_API_KEY` or `OPENAI_API_KEY`.
    pub fn synthesizer_config(&self) -> SpeechSynthesizerConfig {
        let (provider, fallback_var) = match self.provider {
            SpeechProviderSetting::Google => (SpeechProvider::Google, "GOOGLE_API_KEY"),
            SpeechProviderSetting::OpenAi => (SpeechProvider::OpenAi, "OPENAI_API_KEY"),
        };

        SpeechSynthesizerConfig {
            provider,
            api_key: self
                .api_key
                .clone()
                .or_else(|| std::env::var(fallback_var).ok()),
            base_url: self.base_url.clone(),
            google_voice: VoiceSelection {
                language_code: self.language_code.clone(),
                ssml_gender: self.ssml_gender.clone(),
                name: self.voice_name.clone(),
            },
            openai_model: self.openai_model.clone(),
            openai_voice: self.openai_voice.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub local_path: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            local_path: "uploads".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SynthesisFailureSetting {
    #[default]
    DropAudio,
    FailRequest,
}

impl From<SynthesisFailureSetting> for SynthesisFailurePolicy {
    fn from(setting: SynthesisFailureSetting) -> Self {
        match setting {
            SynthesisFailureSetting::DropAudio => SynthesisFailurePolicy::DropAudio,
            SynthesisFailureSetting::FailRequest => SynthesisFailurePolicy::FailRequest,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    pub max_document_chars: usize,
    pub on_synthesis_failure: SynthesisFailureSetting,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_document_chars: DEFAULT_MAX_DOCUMENT_CHARS,
            on_synthesis_failure: SynthesisFailureSetting::DropAudio,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info,elemnote=debug,tower_http=debug".to_string(),
            json: false,
        }
    }
}
