//! In-Memory Session Store Adapter
//!
//! Keeps snapshots in a map. Used for tests and when no storage path is
//! configured; nothing survives a restart.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::ConversationId;
use crate::domain::journal::JournalSession;
use crate::ports::{SessionStore, SessionStoreError};

#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<ConversationId, JournalSession>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored snapshots.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn save(
        &self,
        conversation_id: &ConversationId,
        session: &JournalSession,
    ) -> Result<(), SessionStoreError> {
        self.sessions
            .write()
            .await
            .insert(conversation_id.clone(), session.clone());
        Ok(())
    }

    async fn load(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Option<JournalSession>, SessionStoreError> {
        Ok(self.sessions.read().await.get(conversation_id).cloned())
    }

    async fn delete(&self, conversation_id: &ConversationId) -> Result<(), SessionStoreError> {
        self.sessions.write().await.remove(conversation_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::DayKey;

    #[tokio::test]
    async fn save_load_delete() {
        let store = InMemorySessionStore::new();
        let id = ConversationId::new("chat").unwrap();
        let session = JournalSession::new("2024-06-01".parse::<DayKey>().unwrap());

        assert!(store.is_empty().await);
        store.save(&id, &session).await.unwrap();
        assert_eq!(store.load(&id).await.unwrap(), Some(session));
        assert_eq!(store.len().await, 1);

        store.delete(&id).await.unwrap();
        assert_eq!(store.load(&id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = InMemorySessionStore::new();
        let handle = store.clone();
        let id = ConversationId::new("chat").unwrap();

        store
            .save(&id, &JournalSession::new(DayKey::today()))
            .await
            .unwrap();
        assert_eq!(handle.len().await, 1);
    }
}
