use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioEncoding {
    Mp3,
}

impl AudioEncoding {
    /// Name used by speech APIs in their request payloads.
    pub fn api_name(&self) -> &'static str {
        match self {
            AudioEncoding::Mp3 => "MP3",
        }
    }
}

impl fmt::Display for AudioEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedAudio {
    pub data: Vec<u8>,
    pub encoding: AudioEncoding,
}

impl SynthesizedAudio {
    pub fn mp3(data: Vec<u8>) -> Self {
        Self {
            data,
            encoding: AudioEncoding::Mp3,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
