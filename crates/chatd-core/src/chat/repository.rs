//! Store capabilities consumed by `ChatService`.
//!
//! Follows the same RPITIT pattern as the message store: native async fn in
//! traits, implementations live in chatd-infra.

use chatd_types::chat::{Chat, ChatId, NewChat};
use chatd_types::error::RepositoryError;
use chatd_types::message::Message;

/// Persistence for chat records.
pub trait ChatStore: Send + Sync {
    /// Insert a chat; the store assigns `id` and `created_at`.
    fn insert_chat(
        &self,
        chat: &NewChat,
    ) -> impl std::future::Future<Output = Result<Chat, RepositoryError>> + Send;

    /// Fetch a chat by id. Returns `RepositoryError::NotFound` when absent.
    fn get_chat(
        &self,
        id: ChatId,
    ) -> impl std::future::Future<Output = Result<Chat, RepositoryError>> + Send;

    /// Delete a chat (messages cascade in the store).
    fn delete_chat(
        &self,
        id: ChatId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Existence predicate for a chat id.
    fn chat_exists(
        &self,
        id: ChatId,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;
}

/// Read-only access to a chat's transcript.
pub trait MessageProvider: Send + Sync {
    /// Up to `limit` messages of a chat, oldest first.
    fn get_messages_by_chat(
        &self,
        chat_id: ChatId,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, RepositoryError>> + Send;
}
