//! HTTP adapter - web UI, chat API and admin endpoints

pub mod error;
pub mod extract;
pub mod handlers;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::application::errors::AssistantError;
use crate::application::messaging::{MessageParser, RateLimiter};
use crate::application::services::{AdminService, ChatService};
use crate::infrastructure::config::Config;

pub use error::ApiError;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatService>,
    pub admin: Arc<AdminService>,
    pub parser: Arc<MessageParser>,
    pub limiter: Option<Arc<RateLimiter>>,
}

impl AppState {
    pub fn new(chat: ChatService, admin: AdminService, config: &Config) -> Self {
        let rate_limit = &config.security.rate_limit;
        let limiter = rate_limit
            .enabled
            .then(|| Arc::new(RateLimiter::new(rate_limit.max_requests, rate_limit.window_seconds)));

        Self {
            chat: Arc::new(chat),
            admin: Arc::new(admin),
            parser: Arc::new(MessageParser::new(config.transcription.allowed_extensions.clone())),
            limiter,
        }
    }
}

/// Router settings that are not part of the handler state
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub static_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl From<&Config> for HttpSettings {
    fn from(config: &Config) -> Self {
        Self {
            static_dir: config.storage.static_dir.clone(),
            max_upload_bytes: config.server.max_upload_bytes,
        }
    }
}

pub fn router(state: AppState, settings: &HttpSettings) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/chat", post(handlers::chat))
        .route("/admin/set_openai_key", post(handlers::set_openai_key))
        .route("/admin/clear_openai_key", post(handlers::clear_openai_key))
        .nest_service("/static", ServeDir::new(&settings.static_dir))
        .layer(DefaultBodyLimit::max(settings.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until Ctrl-C
pub async fn serve(state: AppState, config: &Config) -> Result<(), AssistantError> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AssistantError::Server(format!("Failed to bind {}: {}", addr, e)))?;

    if let Some(limiter) = state.limiter.clone() {
        let every = Duration::from_secs(config.security.rate_limit.window_seconds.max(1));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                limiter.prune();
            }
        });
    }

    let app = router(state, &HttpSettings::from(config));
    tracing::info!("Agri AI Assistant listening on http://{}", addr);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AssistantError::Server(e.to_string()))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutting down");
}
