//! Google Translate text-to-speech

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::application::errors::SpeechError;
use crate::domain::traits::Synthesizer;
use super::config::{SpeechConfig, DEFAULT_TTS_BASE_URL};

/// Longest text the endpoint accepts per request
pub const MAX_CHUNK_CHARS: usize = 100;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36";

/// Speaks text through the public translate_tts endpoint
pub struct GoogleTts {
    client: Client,
    base_url: String,
    lang: String,
    timeout: Duration,
}

impl GoogleTts {
    pub fn new(lang: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_TTS_BASE_URL.to_string(),
            lang: lang.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn from_config(config: &SpeechConfig) -> Self {
        Self::new(&config.lang)
            .with_base_url(&config.base_url)
            .with_timeout(config.timeout())
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn fetch_chunk(&self, chunk: &str, idx: usize, total: usize) -> Result<Vec<u8>, SpeechError> {
        let total = total.to_string();
        let idx = idx.to_string();
        let textlen = chunk.chars().count().to_string();

        let response = self.client
            .get(format!("{}/translate_tts", self.base_url))
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .timeout(self.timeout)
            .query(&[
                ("ie", "UTF-8"),
                ("q", chunk),
                ("tl", self.lang.as_str()),
                ("total", total.as_str()),
                ("idx", idx.as_str()),
                ("textlen", textlen.as_str()),
                ("client", "tw-ob"),
            ])
            .send()
            .await
            .map_err(|e| SpeechError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::Api { status: status.as_u16(), body });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SpeechError::Network(e.to_string()))?;

        Ok(bytes.to_vec())
    }
}

/// Split text into pieces of at most `max` characters, preferring word
/// boundaries. Words longer than `max` are cut.
pub fn split_text(text: &str, max: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > max {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        let needed = if current.is_empty() { word_len } else { current_len + 1 + word_len };
        if needed > max {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[async_trait]
impl Synthesizer for GoogleTts {
    fn name(&self) -> &str {
        "google-tts"
    }

    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        let chunks = split_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(SpeechError::EmptyText);
        }

        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            audio.extend(self.fetch_chunk(chunk, idx, chunks.len()).await?);
        }

        tracing::debug!("Synthesized {} chunks ({} bytes)", chunks.len(), audio.len());
        Ok(audio)
    }
}
