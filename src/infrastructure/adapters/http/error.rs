//! HTTP error responses

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::application::errors::{AdminError, AssistantError};
use crate::application::messaging::RateLimited;

/// Errors surfaced by the HTTP handlers
#[derive(Debug)]
pub enum ApiError {
    InvalidRequest,
    PayloadTooLarge,
    RateLimited(RateLimited),
    Admin(AdminError),
    Internal(AssistantError),
}

impl From<RateLimited> for ApiError {
    fn from(e: RateLimited) -> Self {
        ApiError::RateLimited(e)
    }
}

impl From<AdminError> for ApiError {
    fn from(e: AdminError) -> Self {
        ApiError::Admin(e)
    }
}

impl From<AssistantError> for ApiError {
    fn from(e: AssistantError) -> Self {
        ApiError::Internal(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidRequest => {
                (StatusCode::BAD_REQUEST, Json(json!({"text": "Invalid request"}))).into_response()
            }
            ApiError::PayloadTooLarge => {
                (StatusCode::PAYLOAD_TOO_LARGE, Json(json!({"text": "Request too large"}))).into_response()
            }
            ApiError::RateLimited(e) => {
                let retry_after = e.retry_after.as_secs().max(1).to_string();
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    [(header::RETRY_AFTER, retry_after)],
                    Json(json!({"text": "Rate limited. Please try again later."})),
                )
                    .into_response()
            }
            ApiError::Admin(e) => {
                let status = match e {
                    AdminError::Unauthorized => StatusCode::FORBIDDEN,
                    AdminError::NoKeyProvided => StatusCode::BAD_REQUEST,
                };
                (status, Json(json!({"error": e.to_string()}))).into_response()
            }
            ApiError::Internal(e) => {
                tracing::error!("Unhandled /chat error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"text": "Internal server error"}))).into_response()
            }
        }
    }
}
