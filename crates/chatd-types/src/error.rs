use thiserror::Error;

use crate::chat::ChatId;

/// Errors from store operations (used by the trait definitions in chatd-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// A resource id that is not a plain run of decimal digits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid id: {0:?}")]
pub struct InvalidId(pub String);

/// Parse an id exactly: no sign, no surrounding whitespace.
pub(crate) fn parse_id(s: &str) -> Result<i64, InvalidId> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InvalidId(s.to_string()));
    }
    s.parse().map_err(|_| InvalidId(s.to_string()))
}

/// Errors surfaced by the chat and message services.
///
/// `NotFound` is the only domain-specific kind and is produced solely by the
/// existence gate. Store failures pass through untouched.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("chat not found")]
    NotFound(ChatId),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ChatError {
    /// True for the existence-gate miss.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ChatError::NotFound(_))
    }
}
