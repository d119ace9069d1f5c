//! Wiring concrete providers into the application services

use std::sync::Arc;

use crate::application::errors::AssistantError;
use crate::application::services::{AdminService, ChatService, ChatSettings};
use crate::infrastructure::config::Config;
use crate::infrastructure::llm::OpenAIProvider;
use crate::infrastructure::speech::{GoogleTts, HuggingFaceTranscriber};
use crate::infrastructure::storage::{AudioStore, EnvFile, KeyStore};

/// Everything the adapters need
pub struct Services {
    pub chat: ChatService,
    pub admin: AdminService,
}

pub async fn build_services(config: &Config) -> Result<Services, AssistantError> {
    let keys = KeyStore::new(config.llm.api_key.clone());

    let audio = AudioStore::new(&config.storage.upload_dir, config.storage.audio_dir());
    audio.init().await?;

    let llm = Arc::new(OpenAIProvider::from_config(keys.clone(), &config.llm));
    let transcriber = Arc::new(HuggingFaceTranscriber::from_config(&config.transcription));

    let settings = ChatSettings {
        system_prompt: config.llm.system_prompt.clone(),
        temperature: config.llm.temperature,
        max_tokens: config.llm.max_tokens,
        voice_url_base: config.storage.voice_url_base(),
    };

    let mut chat = ChatService::new(llm, transcriber, audio, settings);
    if config.speech.enabled {
        chat = chat.with_synthesizer(Arc::new(GoogleTts::from_config(&config.speech)));
    } else {
        tracing::info!("Speech synthesis disabled");
    }

    let admin = AdminService::new(
        keys,
        config.security.admin_token.clone(),
        EnvFile::new(&config.storage.env_file),
    );

    Ok(Services { chat, admin })
}
