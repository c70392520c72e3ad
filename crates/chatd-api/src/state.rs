//! Shared handler state and the service capabilities the HTTP layer calls.
//!
//! Handlers are generic over `ChatApi`, `MessageApi` and `HealthCheck`.
//! Production pins them to the core services over the SQLite stores; tests
//! substitute in-memory doubles.

use std::future::Future;
use std::sync::Arc;

use chatd_core::chat::repository::{ChatStore, MessageProvider};
use chatd_core::chat::service::ChatService;
use chatd_core::message::repository::MessageStore;
use chatd_core::message::service::{ChatExistence, MessageService};
use chatd_infra::sqlite::chat::SqliteChatStore;
use chatd_infra::sqlite::message::SqliteMessageStore;
use chatd_infra::sqlite::pool::DatabasePool;
use chatd_types::chat::{Chat, ChatId, NewChat};
use chatd_types::error::ChatError;
use chatd_types::message::{Message, NewMessage};

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteChatService = ChatService<SqliteChatStore, SqliteMessageStore>;

pub type ConcreteMessageService = MessageService<SqliteMessageStore, Arc<ConcreteChatService>>;

pub type ConcreteState = ApiState<ConcreteChatService, ConcreteMessageService, DatabasePool>;

/// Chat operations reachable over HTTP.
pub trait ChatApi: Send + Sync + 'static {
    fn create_chat(&self, chat: NewChat) -> impl Future<Output = Result<Chat, ChatError>> + Send;

    fn get_chat(
        &self,
        id: ChatId,
        message_limit: u32,
    ) -> impl Future<Output = Result<Chat, ChatError>> + Send;

    fn delete_chat(&self, id: ChatId) -> impl Future<Output = Result<(), ChatError>> + Send;
}

/// Message operations reachable over HTTP.
pub trait MessageApi: Send + Sync + 'static {
    fn create_message(
        &self,
        message: NewMessage,
    ) -> impl Future<Output = Result<Message, ChatError>> + Send;
}

/// Liveness check of the backing database.
pub trait HealthCheck: Send + Sync + 'static {
    fn ping(&self) -> impl Future<Output = anyhow::Result<()>> + Send;
}

impl<S, M> ChatApi for ChatService<S, M>
where
    S: ChatStore + 'static,
    M: MessageProvider + 'static,
{
    async fn create_chat(&self, chat: NewChat) -> Result<Chat, ChatError> {
        ChatService::create_chat(self, chat).await
    }

    async fn get_chat(&self, id: ChatId, message_limit: u32) -> Result<Chat, ChatError> {
        ChatService::get_chat(self, id, message_limit).await
    }

    async fn delete_chat(&self, id: ChatId) -> Result<(), ChatError> {
        ChatService::delete_chat(self, id).await
    }
}

impl<S, C> MessageApi for MessageService<S, C>
where
    S: MessageStore + 'static,
    C: ChatExistence + 'static,
{
    async fn create_message(&self, message: NewMessage) -> Result<Message, ChatError> {
        MessageService::create_message(self, message).await
    }
}

impl HealthCheck for DatabasePool {
    async fn ping(&self) -> anyhow::Result<()> {
        DatabasePool::ping(self).await?;
        Ok(())
    }
}

/// State shared by every handler.
pub struct ApiState<C, M, H> {
    pub chats: Arc<C>,
    pub messages: Arc<M>,
    pub health: Arc<H>,
}

// Manual impl: derive would require `C: Clone`, `M: Clone`, `H: Clone`.
impl<C, M, H> Clone for ApiState<C, M, H> {
    fn clone(&self) -> Self {
        Self {
            chats: Arc::clone(&self.chats),
            messages: Arc::clone(&self.messages),
            health: Arc::clone(&self.health),
        }
    }
}

impl<C, M, H> ApiState<C, M, H> {
    pub fn new(chats: Arc<C>, messages: Arc<M>, health: Arc<H>) -> Self {
        Self {
            chats,
            messages,
            health,
        }
    }
}

impl ConcreteState {
    /// Wire the services over a connected, migrated pool.
    ///
    /// The message service gates inserts through the same chat service
    /// instance the handlers use.
    pub fn from_pool(pool: DatabasePool) -> Self {
        let chat_service = Arc::new(ChatService::new(
            SqliteChatStore::new(pool.clone()),
            SqliteMessageStore::new(pool.clone()),
        ));
        let message_service = Arc::new(MessageService::new(
            SqliteMessageStore::new(pool.clone()),
            Arc::clone(&chat_service),
        ));

        Self::new(chat_service, message_service, Arc::new(pool))
    }
}
