use crate::application::ports::{SpeechSynthesisError, SpeechSynthesizer};
use crate::domain::SynthesizedAudio;

/// MPEG-1 Layer III frame header followed by padding: enough for players to
/// recognise the payload as MP3.
const SILENT_FRAME: [u8; 16] = [
    0xFF, 0xFB, 0x90, 0x64, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
];

/// Canned synthesizer used in scaffold mode.
pub struct MockSpeechSynthesizer;

#[async_trait::async_trait]
impl SpeechSynthesizer for MockSpeechSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, SpeechSynthesisError> {
        if text.trim().is_empty() {
            return Err(SpeechSynthesisError::EmptyInput);
        }
        Ok(SynthesizedAudio::mp3(SILENT_FRAME.to_vec()))
    }
}
