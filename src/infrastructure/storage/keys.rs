//! Runtime-swappable API key

use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared OpenAI key, read by the provider on every request so the admin
/// endpoints can rotate it without a restart.
#[derive(Debug, Clone, Default)]
pub struct KeyStore {
    inner: Arc<RwLock<Option<String>>>,
}

impl KeyStore {
    pub fn new(initial: Option<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(
                initial
                    .map(|k| k.trim().to_string())
                    .filter(|k| !k.is_empty()),
            )),
        }
    }

    pub async fn get(&self) -> Option<String> {
        self.inner.read().await.clone()
    }

    pub async fn set(&self, key: impl Into<String>) {
        *self.inner.write().await = Some(key.into());
    }

    pub async fn clear(&self) {
        *self.inner.write().await = None;
    }

    pub async fn is_set(&self) -> bool {
        self.inner.read().await.is_some()
    }
}
