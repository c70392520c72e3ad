//! Chat handlers: create, fetch with transcript, delete.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::extract::rejection::{BytesRejection, PathRejection, QueryRejection};
use serde::Deserialize;
use tracing::error;

use chatd_types::chat::{Chat, NewChat};

use super::{parse_body, parse_limit, path_chat_id, read_body};
use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::{ApiState, ChatApi, HealthCheck, MessageApi};

/// Request body for creating a chat.
#[derive(Debug, Deserialize)]
pub struct CreateChatRequest {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatQuery {
    pub limit: Option<String>,
}

/// POST /v1/chats/ - Create a chat.
pub async fn create_chat<C: ChatApi, M: MessageApi, H: HealthCheck>(
    State(state): State<ApiState<C, M, H>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<ApiResponse<Chat>, AppError> {
    let request: CreateChatRequest = parse_body(&read_body(body)?)?;

    let chat = state
        .chats
        .create_chat(NewChat {
            title: request.title,
        })
        .await
        .map_err(|e| {
            error!(error = %e, "failed to create chat");
            AppError::Internal(e.to_string())
        })?;

    Ok(ApiResponse::success(chat))
}

/// GET /v1/chats/{id}?limit=N - Fetch a chat with up to N messages.
pub async fn get_chat<C: ChatApi, M: MessageApi, H: HealthCheck>(
    State(state): State<ApiState<C, M, H>>,
    id: Result<Path<String>, PathRejection>,
    query: Result<Query<ChatQuery>, QueryRejection>,
) -> Result<ApiResponse<Chat>, AppError> {
    let id = path_chat_id(id)?;
    let Query(query) =
        query.map_err(|_| AppError::Validation("invalid limit parameter".to_string()))?;
    let limit = parse_limit(query.limit.as_deref())?;

    let chat = state.chats.get_chat(id, limit).await.map_err(|e| {
        error!(chat_id = %id, error = %e, "failed to get chat");
        AppError::Internal(e.to_string())
    })?;

    Ok(ApiResponse::success(chat))
}

/// DELETE /v1/chats/{id} - Delete a chat and its messages.
pub async fn delete_chat<C: ChatApi, M: MessageApi, H: HealthCheck>(
    State(state): State<ApiState<C, M, H>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<ApiResponse<&'static str>, AppError> {
    let id = path_chat_id(id)?;

    state.chats.delete_chat(id).await.map_err(|e| {
        error!(chat_id = %id, error = %e, "failed to delete chat");
        AppError::Internal(e.to_string())
    })?;

    Ok(ApiResponse::success("deleted"))
}
