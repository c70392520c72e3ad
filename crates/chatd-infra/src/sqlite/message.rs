//! SQLite message store implementation.
//!
//! Messages reference their chat through a foreign key with
//! `ON DELETE CASCADE`, so deleting a chat removes its transcript and an
//! insert for a chat that no longer exists is rejected by the database.

use chatd_core::message::repository::MessageStore;
use chatd_types::chat::ChatId;
use chatd_types::error::RepositoryError;
use chatd_types::message::{Message, MessageId, NewMessage};
use sqlx::Row;

use super::parse_datetime;
use super::pool::DatabasePool;

/// SQLite-backed implementation of `MessageStore`.
#[derive(Clone)]
pub struct SqliteMessageStore {
    pool: DatabasePool,
}

impl SqliteMessageStore {
    /// Create a new store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct MessageRow {
    id: i64,
    chat_id: i64,
    text: String,
    created_at: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            chat_id: row.try_get("chat_id")?,
            text: row.try_get("text")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<Message, RepositoryError> {
        Ok(Message {
            id: MessageId(self.id),
            text: self.text,
            created_at: parse_datetime(&self.created_at)?,
            chat_id: ChatId(self.chat_id),
        })
    }
}

fn insert_error(chat_id: ChatId, err: sqlx::Error) -> RepositoryError {
    match &err {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            RepositoryError::Conflict(format!("chat {chat_id} does not exist"))
        }
        _ => RepositoryError::Query(err.to_string()),
    }
}

impl MessageStore for SqliteMessageStore {
    async fn insert_message(&self, message: &NewMessage) -> Result<Message, RepositoryError> {
        let row = sqlx::query(
            "INSERT INTO messages (chat_id, text) VALUES (?, ?) RETURNING id, chat_id, text, created_at",
        )
        .bind(message.chat_id.0)
        .bind(&message.text)
        .fetch_one(&self.pool.writer)
        .await
        .map_err(|e| insert_error(message.chat_id, e))?;

        MessageRow::from_row(&row)
            .map_err(|e| RepositoryError::Query(e.to_string()))?
            .into_message()
    }

    async fn get_messages_by_chat(
        &self,
        chat_id: ChatId,
        limit: u32,
    ) -> Result<Vec<Message>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, chat_id, text, created_at FROM messages WHERE chat_id = ? ORDER BY id ASC LIMIT ?",
        )
        .bind(chat_id.0)
        .bind(i64::from(limit))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                MessageRow::from_row(row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?
                    .into_message()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::chat::SqliteChatStore;
    use crate::sqlite::test_support::test_pool;
    use chatd_core::chat::repository::ChatStore;
    use chatd_types::chat::NewChat;

    async fn stores() -> (SqliteChatStore, SqliteMessageStore) {
        let pool = test_pool().await;
        (
            SqliteChatStore::new(pool.clone()),
            SqliteMessageStore::new(pool),
        )
    }

    fn text(chat_id: ChatId, text: &str) -> NewMessage {
        NewMessage {
            chat_id,
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_message_assigns_id_and_timestamp() {
        let (chats, messages) = stores().await;
        let chat = chats.insert_chat(&NewChat::default()).await.unwrap();

        let created = messages
            .insert_message(&text(chat.id, "testMessage"))
            .await
            .unwrap();

        assert!(created.id.0 > 0);
        assert_eq!(created.chat_id, chat.id);
        assert_eq!(created.text, "testMessage");
    }

    #[tokio::test]
    async fn test_messages_are_oldest_first_and_limited() {
        let (chats, messages) = stores().await;
        let chat = chats.insert_chat(&NewChat::default()).await.unwrap();
        let other = chats.insert_chat(&NewChat::default()).await.unwrap();

        for i in 0..5 {
            messages
                .insert_message(&text(chat.id, &format!("message {i}")))
                .await
                .unwrap();
        }
        messages
            .insert_message(&text(other.id, "elsewhere"))
            .await
            .unwrap();

        let all = messages.get_messages_by_chat(chat.id, 20).await.unwrap();
        let texts: Vec<&str> = all.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["message 0", "message 1", "message 2", "message 3", "message 4"]
        );

        let limited = messages.get_messages_by_chat(chat.id, 2).await.unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].text, "message 0");

        assert!(messages.get_messages_by_chat(chat.id, 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_messages_for_unknown_chat_is_empty() {
        let (_, messages) = stores().await;

        let found = messages.get_messages_by_chat(ChatId(77), 20).await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_insert_for_missing_chat_is_rejected() {
        let (_, messages) = stores().await;

        let err = messages
            .insert_message(&text(ChatId(12), "orphan"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_delete_chat_cascades_messages() {
        let (chats, messages) = stores().await;
        let chat = chats.insert_chat(&NewChat::default()).await.unwrap();
        messages
            .insert_message(&text(chat.id, "first"))
            .await
            .unwrap();

        chats.delete_chat(chat.id).await.unwrap();

        assert!(messages.get_messages_by_chat(chat.id, 20).await.unwrap().is_empty());
        let err = messages
            .insert_message(&text(chat.id, "too late"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }
}
