mod google_tts_synthesizer;
mod mock_speech_synthesizer;
mod openai_tts_synthesizer;
mod speech_synthesizer_factory;
mod text_segmenter;

pub use google_tts_synthesizer::{
    GOOGLE_TTS_BASE_URL, GOOGLE_TTS_MAX_INPUT_BYTES, GoogleTtsSynthesizer, VoiceSelection,
};
pub use mock_speech_synthesizer::MockSpeechSynthesizer;
pub use openai_tts_synthesizer::{OPENAI_TTS_BASE_URL, OpenAiTtsSynthesizer};
pub use speech_synthesizer_factory::{
    SpeechProvider, SpeechSynthesizerConfig, SpeechSynthesizerFactory,
    SpeechSynthesizerFactoryError,
};
pub use text_segmenter::split_for_synthesis;
