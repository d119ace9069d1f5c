//! Route handlers

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use axum::response::Html;
use axum::Json;
use serde_json::{json, Value};

use crate::domain::entities::Reply;
use super::error::ApiError;
use super::extract::{admin_token, RequestPayload};
use super::AppState;

const INDEX_HTML: &str = include_str!("index.html");

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn chat(
    State(state): State<AppState>,
    connect: Option<ConnectInfo<SocketAddr>>,
    RequestPayload(payload): RequestPayload,
) -> Result<Json<Reply>, ApiError> {
    let client = connect
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    if let Some(limiter) = &state.limiter {
        limiter.check(&client)?;
    }

    let message = state.parser.parse(client, payload).ok_or(ApiError::InvalidRequest)?;
    let reply = state.chat.process(message).await?;
    Ok(Json(reply))
}

pub async fn set_openai_key(
    State(state): State<AppState>,
    headers: HeaderMap,
    RequestPayload(payload): RequestPayload,
) -> Result<Json<Value>, ApiError> {
    state.admin.authorize(admin_token(&headers, &payload).as_deref())?;

    let candidate = payload
        .field("key")
        .filter(|k| !k.is_empty())
        .or_else(|| payload.field("OPENAI_API_KEY"));

    let outcome = state.admin.set_openai_key(candidate).await?;
    if outcome.persisted {
        Ok(Json(json!({"status": "ok"})))
    } else {
        Ok(Json(json!({"status": "ok", "warning": "runtime key set but .env write failed"})))
    }
}

pub async fn clear_openai_key(
    State(state): State<AppState>,
    headers: HeaderMap,
    RequestPayload(payload): RequestPayload,
) -> Result<Json<Value>, ApiError> {
    state.admin.authorize(admin_token(&headers, &payload).as_deref())?;
    state.admin.clear_openai_key().await;
    Ok(Json(json!({"status": "cleared"})))
}
