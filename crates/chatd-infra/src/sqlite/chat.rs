//! SQLite chat store implementation.
//!
//! Implements `ChatStore` from `chatd-core` using sqlx with split read/write
//! pools: raw queries, a private Row struct, reader for SELECTs and writer for
//! everything else.

use chatd_core::chat::repository::ChatStore;
use chatd_types::chat::{Chat, ChatId, NewChat};
use chatd_types::error::RepositoryError;
use sqlx::Row;
use tracing::debug;

use super::parse_datetime;
use super::pool::DatabasePool;

/// SQLite-backed implementation of `ChatStore`.
#[derive(Clone)]
pub struct SqliteChatStore {
    pool: DatabasePool,
}

impl SqliteChatStore {
    /// Create a new store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain Chat.
struct ChatRow {
    id: i64,
    title: Option<String>,
    created_at: String,
}

impl ChatRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_chat(self) -> Result<Chat, RepositoryError> {
        Ok(Chat {
            id: ChatId(self.id),
            title: self.title,
            created_at: parse_datetime(&self.created_at)?,
            messages: None,
        })
    }
}

impl ChatStore for SqliteChatStore {
    async fn insert_chat(&self, chat: &NewChat) -> Result<Chat, RepositoryError> {
        let row = sqlx::query("INSERT INTO chats (title) VALUES (?) RETURNING id, title, created_at")
            .bind(&chat.title)
            .fetch_one(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        ChatRow::from_row(&row)
            .map_err(|e| RepositoryError::Query(e.to_string()))?
            .into_chat()
    }

    async fn get_chat(&self, id: ChatId) -> Result<Chat, RepositoryError> {
        let row = sqlx::query("SELECT id, title, created_at FROM chats WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?
            .ok_or(RepositoryError::NotFound)?;

        ChatRow::from_row(&row)
            .map_err(|e| RepositoryError::Query(e.to_string()))?
            .into_chat()
    }

    async fn delete_chat(&self, id: ChatId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM chats WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        debug!(chat_id = %id, rows = result.rows_affected(), "chat deleted");
        Ok(())
    }

    async fn chat_exists(&self, id: ChatId) -> Result<bool, RepositoryError> {
        let exists: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM chats WHERE id = ?)")
            .bind(id.0)
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(exists != 0)
    }
}
