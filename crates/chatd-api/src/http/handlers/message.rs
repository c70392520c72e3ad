//! Message handler.

use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, PathRejection};
use axum::extract::{Path, State};
use serde::Deserialize;
use tracing::error;

use chatd_types::error::ChatError;
use chatd_types::message::{Message, NewMessage};

use super::{parse_body, path_chat_id, read_body};
use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::{ApiState, ChatApi, HealthCheck, MessageApi};

/// Request body for posting a message; the chat comes from the path.
#[derive(Debug, Deserialize)]
pub struct CreateMessageRequest {
    pub text: String,
}

/// POST /v1/chats/{id}/messages/ - Append a message to an existing chat.
pub async fn create_message<C: ChatApi, M: MessageApi, H: HealthCheck>(
    State(state): State<ApiState<C, M, H>>,
    id: Result<Path<String>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<ApiResponse<Message>, AppError> {
    let request: CreateMessageRequest = parse_body(&read_body(body)?)?;
    let chat_id = path_chat_id(id)?;

    let message = state
        .messages
        .create_message(NewMessage {
            chat_id,
            text: request.text,
        })
        .await
        .map_err(|e| {
            error!(chat_id = %chat_id, error = %e, "failed to create message");
            match e {
                ChatError::NotFound(_) => AppError::from(e),
                ChatError::Repository(_) => AppError::Internal("failed to create message".to_string()),
            }
        })?;

    Ok(ApiResponse::success(message))
}
