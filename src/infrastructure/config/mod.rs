//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::application::errors::ConfigError;
use crate::infrastructure::llm::LLMConfig;
use crate::infrastructure::speech::{SpeechConfig, TranscriptionConfig};

/// Assistant configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub llm: LLMConfig,
    pub transcription: TranscriptionConfig,
    pub speech: SpeechConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
    /// Served under /static
    pub static_dir: PathBuf,
    /// Relative to `static_dir`
    pub audio_subdir: String,
    pub env_file: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SecurityConfig {
    /// Guards the admin endpoints when set
    pub admin_token: Option<String>,
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub max_requests: u32,
    pub window_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            static_dir: PathBuf::from("static"),
            audio_subdir: "audio".to_string(),
            env_file: PathBuf::from(".env"),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: 20,
            window_seconds: 60,
        }
    }
}

impl StorageConfig {
    pub fn audio_dir(&self) -> PathBuf {
        self.static_dir.join(&self.audio_subdir)
    }

    /// URL path the audio directory is served under
    pub fn voice_url_base(&self) -> String {
        format!("/static/{}", self.audio_subdir.trim_matches('/'))
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))
    }

    /// Overlay secrets and overrides from the environment
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        self.llm.apply_env(&lookup);

        if let Some(key) = lookup("HUGGING_FACE_API_KEY").filter(|k| !k.trim().is_empty()) {
            self.transcription.api_key = Some(key.trim().to_string());
        }

        if let Some(token) = lookup("ADMIN_TOKEN").filter(|t| !t.is_empty()) {
            self.security.admin_token = Some(token);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.rate_limit.enabled && self.security.rate_limit.max_requests == 0 {
            return Err(ConfigError::InvalidValue(
                "security.rate-limit.max-requests must be positive".to_string(),
            ));
        }
        if self.transcription.allowed_extensions.is_empty() {
            return Err(ConfigError::MissingField("transcription.allowed-extensions".to_string()));
        }
        if self.storage.audio_subdir.is_empty() {
            return Err(ConfigError::MissingField("storage.audio-subdir".to_string()));
        }
        Ok(())
    }

    /// Log what is missing for a fully working assistant
    pub fn warn_missing_keys(&self) {
        if self.llm.api_key.is_none() {
            tracing::warn!("OPENAI_API_KEY not set. OpenAI requests will fail until it's provided.");
        }
        if self.transcription.api_key.is_none() {
            tracing::warn!("HUGGING_FACE_API_KEY not set. Audio transcription may fail.");
        }
    }
}
