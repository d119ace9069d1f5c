//! Speech services - HuggingFace transcription and Google Translate TTS

pub mod config;
pub mod google_tts;
pub mod huggingface;

pub use config::{SpeechConfig, TranscriptionConfig};
pub use google_tts::GoogleTts;
pub use huggingface::HuggingFaceTranscriber;
