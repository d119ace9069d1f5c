//! Speech configuration

use std::time::Duration;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TRANSCRIPTION_URL: &str =
    "https://api-inference.huggingface.co/models/jonatasgrosman/wav2vec2-large-xlsr-53-english";
pub const DEFAULT_TTS_BASE_URL: &str = "https://translate.google.com";

/// HuggingFace speech-to-text settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TranscriptionConfig {
    /// Usually supplied through HUGGING_FACE_API_KEY
    pub api_key: Option<String>,
    pub model_url: String,
    pub timeout_secs: u64,
    /// Accepted upload extensions, lowercase and without the dot
    pub allowed_extensions: Vec<String>,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model_url: DEFAULT_TRANSCRIPTION_URL.to_string(),
            timeout_secs: 60,
            allowed_extensions: vec!["webm".to_string()],
        }
    }
}

impl TranscriptionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Text-to-speech settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SpeechConfig {
    pub enabled: bool,
    pub lang: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            lang: "en".to_string(),
            base_url: DEFAULT_TTS_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl SpeechConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
