//! Application error type mapping to HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use chatd_types::error::ChatError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug, PartialEq, Eq)]
pub enum AppError {
    /// Malformed request; nothing was called.
    Validation(String),
    /// The addressed resource does not exist.
    NotFound(String),
    /// Any other failure, with the text returned to the client.
    Internal(String),
    /// The extractor refused the request before a handler could decode it.
    Rejected { status: StatusCode, message: String },
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Rejected { status, .. } => *status,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::Validation(msg)
            | AppError::NotFound(msg)
            | AppError::Internal(msg)
            | AppError::Rejected { message: msg, .. } => msg,
        }
    }
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::NotFound(_) => AppError::NotFound("chat not found".to_string()),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = json!({ "error": self.message() });

        (
            self.status(),
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatd_types::chat::ChatId;
    use chatd_types::error::RepositoryError;

    #[test]
    fn test_chat_not_found_maps_to_404() {
        let err = AppError::from(ChatError::NotFound(ChatId(3)));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "chat not found");
    }

    #[test]
    fn test_store_errors_map_to_500_with_their_text() {
        let err = AppError::from(ChatError::from(RepositoryError::Query("test fail".into())));
        assert_eq!(err, AppError::Internal("query error: test fail".to_string()));

        let err = AppError::from(ChatError::from(RepositoryError::NotFound));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "entity not found");
    }

    #[test]
    fn test_rejection_keeps_its_status() {
        let err = AppError::Rejected {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: "request body too large".to_string(),
        };
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(err.message(), "request body too large");
    }
}
