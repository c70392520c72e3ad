//! Liveness endpoint.

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};
use tracing::error;

use crate::http::error::AppError;
use crate::state::{ApiState, ChatApi, HealthCheck, MessageApi};

/// GET /health - Ping the database.
pub async fn health<C: ChatApi, M: MessageApi, H: HealthCheck>(
    State(state): State<ApiState<C, M, H>>,
) -> Result<Json<Value>, AppError> {
    state.health.ping().await.map_err(|e| {
        error!(error = %e, "health check failed");
        AppError::Internal(e.to_string())
    })?;

    Ok(Json(json!({ "status": "ok" })))
}
