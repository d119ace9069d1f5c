use async_trait::async_trait;
use crate::application::errors::SpeechError;

/// Speech-to-text backend
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Backend name, used in logs
    fn name(&self) -> &str;

    /// Turn a recorded clip into text
    async fn transcribe(&self, audio: &[u8]) -> Result<String, SpeechError>;
}

/// Text-to-speech backend producing MP3 bytes
#[async_trait]
pub trait Synthesizer: Send + Sync {
    fn name(&self) -> &str;

    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError>;
}
