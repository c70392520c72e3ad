//! HTTP request handlers.
//!
//! Handlers are generic over the service capabilities in `crate::state` and
//! validate their input before any service call.

pub mod chat;
pub mod health;
pub mod message;

use axum::body::Bytes;
use axum::extract::Path;
use axum::extract::rejection::{BytesRejection, PathRejection};
use axum::http::StatusCode;
use chatd_types::chat::ChatId;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::http::error::AppError;

/// Messages attached to a fetched chat when `limit` is absent.
pub const DEFAULT_MESSAGE_LIMIT: u32 = 20;

/// Buffer the raw body, turning extractor failures into JSON errors.
pub(crate) fn read_body(body: Result<Bytes, BytesRejection>) -> Result<Bytes, AppError> {
    body.map_err(|rejection| {
        warn!(error = %rejection, "failed to read request body");
        let status = rejection.status();
        let message = if status == StatusCode::PAYLOAD_TOO_LARGE {
            "request body too large"
        } else {
            "invalid request body"
        };
        AppError::Rejected {
            status,
            message: message.to_string(),
        }
    })
}

/// Decode a JSON request body. Content type is not required.
pub(crate) fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, "failed to decode request body");
        AppError::Validation("invalid request body".to_string())
    })
}

pub(crate) fn parse_chat_id(raw: &str) -> Result<ChatId, AppError> {
    raw.parse()
        .map_err(|_| AppError::Validation("invalid chat id".to_string()))
}

/// The `{id}` path segment as a chat id. Undecodable segments are rejected
/// the same way as non-numeric ones.
pub(crate) fn path_chat_id(path: Result<Path<String>, PathRejection>) -> Result<ChatId, AppError> {
    let Path(raw) = path.map_err(|rejection| {
        warn!(error = %rejection, "failed to decode path");
        AppError::Validation("invalid chat id".to_string())
    })?;
    parse_chat_id(&raw)
}

/// `limit` query value; absent or empty means the default.
///
/// Any non-negative 64-bit value is accepted. Values past `u32::MAX` are
/// clamped, which is more rows than a chat can hold.
pub(crate) fn parse_limit(raw: Option<&str>) -> Result<u32, AppError> {
    let invalid = || AppError::Validation("invalid limit parameter".to_string());
    match raw.map(str::trim) {
        None | Some("") => Ok(DEFAULT_MESSAGE_LIMIT),
        Some(s) => {
            let limit: i64 = s.parse().map_err(|_| invalid())?;
            if limit < 0 {
                return Err(invalid());
            }
            Ok(u32::try_from(limit).unwrap_or(u32::MAX))
        }
    }
}
