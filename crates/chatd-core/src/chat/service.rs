//! Chat service: chat lifecycle and the existence gate.
//!
//! ChatService delegates persistence to a `ChatStore` and loads transcripts
//! through a `MessageProvider`. It holds no mutable state, so a single
//! instance is shared across all in-flight requests.

use std::sync::Arc;

use chatd_types::chat::{Chat, ChatId, NewChat};
use chatd_types::error::ChatError;
use tracing::error;

use crate::chat::repository::{ChatStore, MessageProvider};
use crate::message::service::ChatExistence;

/// Orchestrates chat creation, retrieval and deletion.
///
/// Generic over `ChatStore` and `MessageProvider` to maintain clean
/// architecture (chatd-core never depends on chatd-infra).
pub struct ChatService<S: ChatStore, M: MessageProvider> {
    store: S,
    messages: M,
}

impl<S: ChatStore, M: MessageProvider> ChatService<S, M> {
    /// Create a new chat service with the given store and transcript source.
    pub fn new(store: S, messages: M) -> Self {
        Self { store, messages }
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    /// Persist a new chat. Store errors are returned unchanged.
    pub async fn create_chat(&self, chat: NewChat) -> Result<Chat, ChatError> {
        Ok(self.store.insert_chat(&chat).await?)
    }

    /// Fetch a chat with up to `message_limit` of its messages attached.
    ///
    /// An absent chat surfaces as the store's not-found error. If the chat
    /// exists but its messages cannot be loaded the whole call fails.
    pub async fn get_chat(&self, id: ChatId, message_limit: u32) -> Result<Chat, ChatError> {
        let chat = self.store.get_chat(id).await?;
        let messages = self.messages.get_messages_by_chat(id, message_limit).await?;

        Ok(chat.with_messages(messages))
    }

    /// Delete a chat. The outcome for unknown ids is whatever the store reports.
    pub async fn delete_chat(&self, id: ChatId) -> Result<(), ChatError> {
        Ok(self.store.delete_chat(id).await?)
    }

    /// Existence gate: `Ok(())` if the chat exists, `ChatError::NotFound` if not.
    pub async fn chat_exist(&self, id: ChatId) -> Result<(), ChatError> {
        if self.store.chat_exists(id).await? {
            Ok(())
        } else {
            error!(chat_id = %id, "chat not found");
            Err(ChatError::NotFound(id))
        }
    }
}

impl<S: ChatStore, M: MessageProvider> ChatExistence for ChatService<S, M> {
    async fn chat_exist(&self, id: ChatId) -> Result<(), ChatError> {
        ChatService::chat_exist(self, id).await
    }
}

impl<T: ChatExistence + ?Sized> ChatExistence for Arc<T> {
    async fn chat_exist(&self, id: ChatId) -> Result<(), ChatError> {
        (**self).chat_exist(id).await
    }
}
