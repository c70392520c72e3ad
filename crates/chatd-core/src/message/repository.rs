//! Message store trait definition.

use chatd_types::chat::ChatId;
use chatd_types::error::RepositoryError;
use chatd_types::message::{Message, NewMessage};

use crate::chat::repository::MessageProvider;

/// Persistence for messages.
///
/// Implementations live in chatd-infra (e.g., `SqliteMessageStore`).
pub trait MessageStore: Send + Sync {
    /// Insert a message; the store assigns `id` and `created_at`.
    fn insert_message(
        &self,
        message: &NewMessage,
    ) -> impl std::future::Future<Output = Result<Message, RepositoryError>> + Send;

    /// Up to `limit` messages of a chat, ordered by id ASC.
    ///
    /// An unknown chat yields an empty list, not an error.
    fn get_messages_by_chat(
        &self,
        chat_id: ChatId,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, RepositoryError>> + Send;
}

// Any message store can serve transcripts to ChatService.
impl<T: MessageStore> MessageProvider for T {
    async fn get_messages_by_chat(
        &self,
        chat_id: ChatId,
        limit: u32,
    ) -> Result<Vec<Message>, RepositoryError> {
        MessageStore::get_messages_by_chat(self, chat_id, limit).await
    }
}
