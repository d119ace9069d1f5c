//! Request body extraction shared by the chat and admin endpoints

use std::collections::HashMap;

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::{header, HeaderMap, StatusCode};
use axum::Form;

use super::error::ApiError;
use crate::application::messaging::{Payload, Upload};

pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Multipart, urlencoded or JSON body flattened into a [`Payload`].
///
/// A body that does not parse (bad JSON, form or multipart framing) is
/// treated as an empty payload. Only an oversized body is rejected.
pub struct RequestPayload(pub Payload);

#[async_trait]
impl<S> FromRequest<S> for RequestPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = match Multipart::from_request(req, state).await {
                Ok(multipart) => multipart,
                Err(e) => {
                    tracing::debug!("Ignoring malformed multipart request: {}", e);
                    return Ok(Self(Payload::default()));
                }
            };
            return match read_multipart(multipart).await {
                Ok(payload) => Ok(Self(payload)),
                Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => Err(ApiError::PayloadTooLarge),
                Err(e) => {
                    tracing::debug!("Ignoring malformed multipart body: {}", e);
                    Ok(Self(Payload::default()))
                }
            };
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let fields = match Form::<HashMap<String, String>>::from_request(req, state).await {
                Ok(Form(fields)) => fields,
                Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => return Err(ApiError::PayloadTooLarge),
                Err(e) => {
                    tracing::debug!("Ignoring malformed form body: {}", e);
                    HashMap::new()
                }
            };
            return Ok(Self(Payload { fields, files: Vec::new() }));
        }

        let body = match Bytes::from_request(req, state).await {
            Ok(body) => body,
            Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => return Err(ApiError::PayloadTooLarge),
            Err(e) => {
                tracing::debug!("Ignoring unreadable body: {}", e);
                Bytes::new()
            }
        };

        Ok(Self(Payload {
            fields: json_fields(&body),
            files: Vec::new(),
        }))
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<Payload, MultipartError> {
    let mut payload = Payload::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        match field.file_name().map(str::to_string) {
            Some(filename) => {
                let data = field.bytes().await?;
                payload.files.push(Upload {
                    field: name,
                    filename,
                    data: data.to_vec(),
                });
            }
            None => {
                let value = field.text().await?;
                payload.fields.insert(name, value);
            }
        }
    }

    Ok(payload)
}

/// String members of a top-level JSON object
fn json_fields(body: &[u8]) -> HashMap<String, String> {
    let Ok(serde_json::Value::Object(map)) = serde_json::from_slice(body) else {
        return HashMap::new();
    };

    map.into_iter()
        .filter_map(|(k, v)| match v {
            serde_json::Value::String(s) => Some((k, s)),
            _ => None,
        })
        .collect()
}

/// Admin token from the header, falling back to a `token` body field
pub fn admin_token(headers: &HeaderMap, payload: &Payload) -> Option<String> {
    headers
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .or_else(|| payload.field("token").filter(|v| !v.is_empty()))
        .map(str::to_string)
}
