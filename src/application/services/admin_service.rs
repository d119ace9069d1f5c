use crate::application::errors::AdminError;
use crate::infrastructure::storage::{EnvFile, KeyStore};

const OPENAI_KEY_VAR: &str = "OPENAI_API_KEY";

/// Result of a successful key update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetKeyOutcome {
    /// Whether the key also reached the `.env` file
    pub persisted: bool,
}

/// Runtime management of the OpenAI key
pub struct AdminService {
    keys: KeyStore,
    admin_token: Option<String>,
    env_file: EnvFile,
}

impl AdminService {
    pub fn new(keys: KeyStore, admin_token: Option<String>, env_file: EnvFile) -> Self {
        Self {
            keys,
            admin_token: admin_token.filter(|t| !t.is_empty()),
            env_file,
        }
    }

    /// Without a configured token every caller is allowed
    pub fn authorize(&self, presented: Option<&str>) -> Result<(), AdminError> {
        match &self.admin_token {
            None => Ok(()),
            Some(expected) if presented == Some(expected.as_str()) => Ok(()),
            Some(_) => Err(AdminError::Unauthorized),
        }
    }

    pub async fn set_openai_key(&self, candidate: Option<&str>) -> Result<SetKeyOutcome, AdminError> {
        let key = candidate.map(str::trim).unwrap_or_default();
        if key.is_empty() {
            return Err(AdminError::NoKeyProvided);
        }

        self.keys.set(key).await;

        let persisted = match self.env_file.upsert(OPENAI_KEY_VAR, key).await {
            Ok(()) => {
                tracing::info!("{} set via admin endpoint and saved to {}", OPENAI_KEY_VAR, self.env_file.path().display());
                true
            }
            Err(e) => {
                tracing::error!("Failed to write {}: {}", self.env_file.path().display(), e);
                false
            }
        };

        Ok(SetKeyOutcome { persisted })
    }

    pub async fn clear_openai_key(&self) {
        self.keys.clear().await;
        tracing::info!("{} cleared from runtime state", OPENAI_KEY_VAR);
    }
}
