use elemnote::infrastructure::speech::{
    SpeechProvider, SpeechSynthesizerConfig, SpeechSynthesizerFactory,
    SpeechSynthesizerFactoryError, VoiceSelection,
};

fn config(provider: SpeechProvider, api_key: Option<&str>) -> SpeechSynthesizerConfig {
    SpeechSynthesizerConfig {
        provider,
        api_key: api_key.map(str::to_string),
        base_url: None,
        google_voice: VoiceSelection::default(),
        openai_model: "tts-1".to_string(),
        openai_voice: "alloy".to_string(),
    }
}

#[test]
fn given_google_config_with_key_when_creating_then_succeeds() {
    let result = SpeechSynthesizerFactory::create(config(SpeechProvider::Google, Some("key")));
    assert!(result.is_ok());
}

#[test]
fn given_openai_config_with_key_when_creating_then_succeeds() {
    let result = SpeechSynthesizerFactory::create(config(SpeechProvider::OpenAi, Some("sk-key")));
    assert!(result.is_ok());
}

#[test]
fn given_missing_api_key_when_creating_then_returns_missing_api_key() {
    let result = SpeechSynthesizerFactory::create(config(SpeechProvider::Google, None));
    assert!(matches!(
        result,
        Err(SpeechSynthesizerFactoryError::MissingApiKey(SpeechProvider::Google))
    ));
}
