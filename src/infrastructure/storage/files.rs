//! On-disk storage for uploaded clips and synthesized answers

use std::path::{Path, PathBuf};
use rand::Rng;
use crate::application::errors::StorageError;

const VOICE_ID_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const VOICE_ID_LEN: usize = 8;

/// Upload and audio directories
#[derive(Debug, Clone)]
pub struct AudioStore {
    upload_dir: PathBuf,
    audio_dir: PathBuf,
}

impl AudioStore {
    pub fn new(upload_dir: impl Into<PathBuf>, audio_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            audio_dir: audio_dir.into(),
        }
    }

    pub async fn init(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.upload_dir).await?;
        tokio::fs::create_dir_all(&self.audio_dir).await?;
        Ok(())
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn audio_dir(&self) -> &Path {
        &self.audio_dir
    }

    /// Save an uploaded clip under its (already sanitized) file name
    pub async fn save_upload(&self, filename: &str, data: &[u8]) -> Result<PathBuf, StorageError> {
        if filename.is_empty() || filename.contains(['/', '\\']) || filename == ".." {
            return Err(StorageError::InvalidPath(filename.to_string()));
        }

        let path = self.upload_dir.join(filename);
        tokio::fs::write(&path, data).await?;
        tracing::debug!("Saved upload to {}", path.display());
        Ok(path)
    }

    /// Save synthesized speech and return its generated id
    pub async fn save_voice(&self, data: &[u8]) -> Result<String, StorageError> {
        let id = voice_id();
        let path = self.audio_dir.join(format!("{}.mp3", id));
        tokio::fs::write(&path, data).await?;
        tracing::debug!("Saved voice to {}", path.display());
        Ok(id)
    }
}

/// Random 8-character id from `[A-Z0-9]`
pub fn voice_id() -> String {
    let mut rng = rand::rng();
    (0..VOICE_ID_LEN)
        .map(|_| VOICE_ID_CHARSET[rng.random_range(0..VOICE_ID_CHARSET.len())] as char)
        .collect()
}
