//! Message service: creation behind the chat existence gate.

use chatd_types::chat::ChatId;
use chatd_types::error::ChatError;
use chatd_types::message::{Message, NewMessage};

use crate::message::repository::MessageStore;

/// Capability to confirm a chat exists before writing into it.
///
/// Implemented by `ChatService`; `Err(ChatError::NotFound)` means absent.
pub trait ChatExistence: Send + Sync {
    fn chat_exist(
        &self,
        id: ChatId,
    ) -> impl std::future::Future<Output = Result<(), ChatError>> + Send;
}

/// Creates and lists messages.
///
/// The existence check and the insert are two separate store operations; a
/// chat deleted in between is caught by the store's foreign key, not here.
pub struct MessageService<S: MessageStore, C: ChatExistence> {
    store: S,
    chats: C,
}

impl<S: MessageStore, C: ChatExistence> MessageService<S, C> {
    pub fn new(store: S, chats: C) -> Self {
        Self { store, chats }
    }

    /// Persist a message after confirming its chat exists.
    ///
    /// Any existence-gate failure (including `ChatError::NotFound`) is
    /// returned as-is and no insert is attempted.
    pub async fn create_message(&self, message: NewMessage) -> Result<Message, ChatError> {
        self.chats.chat_exist(message.chat_id).await?;
        Ok(self.store.insert_message(&message).await?)
    }

    /// Up to `limit` messages of a chat; no existence check.
    pub async fn get_messages_by_chat(
        &self,
        chat_id: ChatId,
        limit: u32,
    ) -> Result<Vec<Message>, ChatError> {
        Ok(self.store.get_messages_by_chat(chat_id, limit).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatd_types::error::RepositoryError;
    use chatd_types::message::MessageId;
    use chrono::{TimeZone, Utc};
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct MockMessageStore {
        messages: Mutex<Vec<Message>>,
        inserts: AtomicUsize,
        fail_insert: bool,
    }

    impl MessageStore for MockMessageStore {
        async fn insert_message(&self, message: &NewMessage) -> Result<Message, RepositoryError> {
            self.inserts.fetch_add(1, Ordering::SeqCst);
            if self.fail_insert {
                return Err(RepositoryError::Query("test fail".to_string()));
            }
            let mut messages = self.messages.lock().unwrap();
            let created = Message {
                id: MessageId(messages.len() as i64 + 1),
                text: message.text.clone(),
                created_at: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
                chat_id: message.chat_id,
            };
            messages.push(created.clone());
            Ok(created)
        }

        async fn get_messages_by_chat(
            &self,
            chat_id: ChatId,
            limit: u32,
        ) -> Result<Vec<Message>, RepositoryError> {
            Ok(self
                .messages
                .lock()
                .unwrap()
                .iter()
                .filter(|m| m.chat_id == chat_id)
                .take(limit as usize)
                .cloned()
                .collect())
        }
    }

    /// Existence gate backed by a fixed set of chat ids.
    struct KnownChats {
        ids: HashSet<i64>,
        broken: bool,
    }

    impl KnownChats {
        fn of(ids: &[i64]) -> Self {
            Self {
                ids: ids.iter().copied().collect(),
                broken: false,
            }
        }
    }

    impl ChatExistence for KnownChats {
        async fn chat_exist(&self, id: ChatId) -> Result<(), ChatError> {
            if self.broken {
                return Err(RepositoryError::Connection.into());
            }
            if self.ids.contains(&id.0) {
                Ok(())
            } else {
                Err(ChatError::NotFound(id))
            }
        }
    }

    fn new_message(chat_id: i64) -> NewMessage {
        NewMessage {
            chat_id: ChatId(chat_id),
            text: "testMessage".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_message_in_existing_chat() {
        let service = MessageService::new(MockMessageStore::default(), KnownChats::of(&[1]));

        let created = service.create_message(new_message(1)).await.unwrap();
        assert_eq!(created.chat_id, ChatId(1));
        assert_eq!(created.text, "testMessage");
        assert_eq!(service.store.inserts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_create_message_for_absent_chat_never_inserts() {
        let service = MessageService::new(MockMessageStore::default(), KnownChats::of(&[1]));

        for absent in [0, 2, 3, 1000, -5] {
            let err = service.create_message(new_message(absent)).await.unwrap_err();
            assert!(matches!(err, ChatError::NotFound(id) if id == ChatId(absent)));
        }
        assert_eq!(service.store.inserts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_create_message_existence_failure_passes_through() {
        let gate = KnownChats {
            ids: HashSet::new(),
            broken: true,
        };
        let service = MessageService::new(MockMessageStore::default(), gate);

        let err = service.create_message(new_message(1)).await.unwrap_err();
        assert!(matches!(err, ChatError::Repository(RepositoryError::Connection)));
        assert_eq!(service.store.inserts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_create_message_propagates_insert_error() {
        let store = MockMessageStore {
            fail_insert: true,
            ..Default::default()
        };
        let service = MessageService::new(store, KnownChats::of(&[1]));

        let err = service.create_message(new_message(1)).await.unwrap_err();
        assert_eq!(err.to_string(), "query error: test fail");
    }

    #[tokio::test]
    async fn test_get_messages_by_chat_respects_limit_and_tolerates_absent_chat() {
        let service = MessageService::new(MockMessageStore::default(), KnownChats::of(&[1]));
        for _ in 0..5 {
            service.create_message(new_message(1)).await.unwrap();
        }

        assert_eq!(service.get_messages_by_chat(ChatId(1), 3).await.unwrap().len(), 3);
        assert!(service.get_messages_by_chat(ChatId(2), 3).await.unwrap().is_empty());
    }
}
