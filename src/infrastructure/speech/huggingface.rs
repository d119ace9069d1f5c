//! HuggingFace inference API transcriber

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::application::errors::SpeechError;
use crate::domain::traits::Transcriber;
use super::config::{TranscriptionConfig, DEFAULT_TRANSCRIPTION_URL};

/// Posts raw audio bytes to a hosted speech recognition model
pub struct HuggingFaceTranscriber {
    api_key: Option<String>,
    client: Client,
    model_url: String,
    timeout: Duration,
}

impl HuggingFaceTranscriber {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.is_empty()),
            client: Client::new(),
            model_url: DEFAULT_TRANSCRIPTION_URL.to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn from_config(config: &TranscriptionConfig) -> Self {
        Self::new(config.api_key.clone())
            .with_model_url(&config.model_url)
            .with_timeout(config.timeout())
    }

    pub fn with_model_url(mut self, url: impl Into<String>) -> Self {
        self.model_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Pull the transcript out of an inference response
fn extract_text(body: &serde_json::Value) -> Option<String> {
    body.as_object()?
        .get("text")?
        .as_str()
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl Transcriber for HuggingFaceTranscriber {
    fn name(&self) -> &str {
        "huggingface"
    }

    async fn transcribe(&self, audio: &[u8]) -> Result<String, SpeechError> {
        let api_key = self.api_key.as_deref().ok_or(SpeechError::MissingApiKey)?;

        let response = self.client
            .post(&self.model_url)
            .bearer_auth(api_key)
            .timeout(self.timeout)
            .body(audio.to_vec())
            .send()
            .await
            .map_err(|e| SpeechError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::Api { status: status.as_u16(), body });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SpeechError::Decode(e.to_string()))?;

        extract_text(&body).ok_or_else(|| SpeechError::UnexpectedResponse(body.to_string()))
    }
}
