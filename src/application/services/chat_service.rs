use std::sync::Arc;

use crate::application::errors::{AssistantError, SpeechError};
use crate::domain::entities::{Content, Message, Reply};
use crate::domain::traits::{Synthesizer, Transcriber};
use crate::infrastructure::llm::{LLMError, LLMMessage, LLM};
use crate::infrastructure::storage::AudioStore;

pub const MISSING_KEY_REPLY: &str =
    "OpenAI API key missing on server. Set OPENAI_API_KEY and restart the app.";
pub const AUTH_FAILED_REPLY: &str =
    "OpenAI authentication failed. Check OPENAI_API_KEY on the server.";
pub const API_ERROR_REPLY: &str = "OpenAI API error. See server logs.";
pub const UNEXPECTED_REPLY: &str = "Unexpected server error while contacting OpenAI.";

pub const TRANSCRIPTION_UNCONFIGURED_REPLY: &str = "Transcription service not configured.";
pub const TRANSCRIPTION_UNREADABLE_REPLY: &str = "Could not transcribe audio.";
pub const TRANSCRIPTION_FAILED_REPLY: &str = "Audio transcription failed.";

/// Prompt and generation settings for answers
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub system_prompt: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// URL path the audio directory is served under, e.g. `/static/audio`
    pub voice_url_base: String,
}

/// Service for answering text and voice queries
pub struct ChatService {
    llm: Arc<dyn LLM>,
    transcriber: Arc<dyn Transcriber>,
    synthesizer: Option<Arc<dyn Synthesizer>>,
    audio: AudioStore,
    settings: ChatSettings,
}

/// Farmer-facing text for a failed completion
pub fn friendly_llm_error(err: &LLMError) -> &'static str {
    match err {
        LLMError::MissingApiKey => MISSING_KEY_REPLY,
        LLMError::Unauthorized(_) => AUTH_FAILED_REPLY,
        LLMError::ParseError(_) => UNEXPECTED_REPLY,
        LLMError::ApiError(_)
        | LLMError::NetworkError(_)
        | LLMError::Timeout
        | LLMError::RateLimited => API_ERROR_REPLY,
    }
}

/// Farmer-facing text for a failed transcription
pub fn friendly_speech_error(err: &SpeechError) -> &'static str {
    match err {
        SpeechError::MissingApiKey => TRANSCRIPTION_UNCONFIGURED_REPLY,
        SpeechError::UnexpectedResponse(_) => TRANSCRIPTION_UNREADABLE_REPLY,
        _ => TRANSCRIPTION_FAILED_REPLY,
    }
}

impl ChatService {
    pub fn new(
        llm: Arc<dyn LLM>,
        transcriber: Arc<dyn Transcriber>,
        audio: AudioStore,
        settings: ChatSettings,
    ) -> Self {
        Self {
            llm,
            transcriber,
            synthesizer: None,
            audio,
            settings,
        }
    }

    pub fn with_synthesizer(mut self, synthesizer: Arc<dyn Synthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    /// Process an incoming message and return the reply for the client
    pub async fn process(&self, message: Message) -> Result<Reply, AssistantError> {
        tracing::info!(
            id = %message.id,
            client = %message.client,
            kind = message.content.kind(),
            "Processing message"
        );

        match message.content {
            Content::Text(text) => Ok(self.process_text(&text).await),
            Content::Audio { filename, data } => {
                self.audio.save_upload(&filename, &data).await?;
                Ok(Reply::text(self.transcribe(&data).await))
            }
        }
    }

    /// Answer a question and attach a spoken version when possible
    pub async fn process_text(&self, text: &str) -> Reply {
        let answer = self.answer(text).await;
        let voice = self.speak(&answer).await.unwrap_or_default();
        Reply::text(answer).with_voice(voice)
    }

    /// Ask the model; failures become a readable message instead of an error
    pub async fn answer(&self, question: &str) -> String {
        let messages = vec![
            LLMMessage::system(&self.settings.system_prompt),
            LLMMessage::user(question),
        ];

        match self.llm
            .chat(messages, None, self.settings.temperature, self.settings.max_tokens)
            .await
        {
            Ok(response) => {
                if let Some(usage) = &response.usage {
                    tracing::debug!("{} used {:?} tokens", response.model, usage.total_tokens);
                }
                response.content.trim().to_string()
            }
            Err(e) => {
                tracing::error!("{} request failed: {}", self.llm.name(), e);
                friendly_llm_error(&e).to_string()
            }
        }
    }

    /// Transcribe a clip; failures become a readable message
    pub async fn transcribe(&self, audio: &[u8]) -> String {
        match self.transcriber.transcribe(audio).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("{} transcription failed: {}", self.transcriber.name(), e);
                friendly_speech_error(&e).to_string()
            }
        }
    }

    /// Synthesize `text` and return the URL it is served under
    pub async fn speak(&self, text: &str) -> Option<String> {
        let synthesizer = self.synthesizer.as_ref()?;

        let result = match synthesizer.synthesize(text).await {
            Ok(bytes) => self.audio.save_voice(&bytes).await.map_err(AssistantError::from),
            Err(e) => Err(e.into()),
        };

        match result {
            Ok(id) => Some(format!("{}/{}.mp3", self.settings.voice_url_base.trim_end_matches('/'), id)),
            Err(e) => {
                tracing::error!("{} synthesis failed: {}", synthesizer.name(), e);
                None
            }
        }
    }
}
