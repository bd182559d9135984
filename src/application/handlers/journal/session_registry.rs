//! Per-conversation session registry.
//!
//! Each conversation gets one `Arc<Mutex<JournalSession>>`. Handlers lock it
//! for the whole read-modify-write of a turn, so two messages in the same
//! chat are applied one after the other while different chats never wait on
//! each other. The map itself is only write-locked to insert or evict.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::domain::foundation::{ConversationId, DayKey};
use crate::domain::journal::JournalSession;
use crate::ports::SessionStore;

use super::JournalError;

pub type SessionHandle = Arc<Mutex<JournalSession>>;

pub struct SessionRegistry {
    sessions: RwLock<HashMap<ConversationId, SessionHandle>>,
    store: Arc<dyn SessionStore>,
}

impl SessionRegistry {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            store,
        }
    }

    /// Returns the session handle for a conversation, creating it if needed.
    ///
    /// A missing entry is seeded from the store, falling back to a fresh
    /// session for `today` when there is no usable snapshot. The caller is
    /// expected to [`JournalSession::roll_over`] after locking.
    pub async fn session(&self, conversation_id: &ConversationId, today: DayKey) -> SessionHandle {
        if let Some(handle) = self.sessions.read().await.get(conversation_id) {
            return Arc::clone(handle);
        }

        let seed = match self.store.load(conversation_id).await {
            Ok(Some(session)) => session,
            Ok(None) => JournalSession::new(today),
            Err(e) => {
                tracing::warn!(
                    conversation_id = %conversation_id,
                    error = %e,
                    "failed to load session snapshot, starting fresh"
                );
                JournalSession::new(today)
            }
        };

        // Another task may have inserted while we were loading; keep theirs.
        let mut sessions = self.sessions.write().await;
        Arc::clone(
            sessions
                .entry(conversation_id.clone())
                .or_insert_with(|| Arc::new(Mutex::new(seed))),
        )
    }

    /// Writes a snapshot. Call while still holding the session lock so
    /// snapshots land in the same order as the turns that produced them.
    pub async fn persist(
        &self,
        conversation_id: &ConversationId,
        session: &JournalSession,
    ) -> Result<(), JournalError> {
        self.store.save(conversation_id, session).await?;
        Ok(())
    }

    /// Like [`persist`](Self::persist), but a failure is only logged: the
    /// in-memory session stays authoritative.
    pub async fn persist_or_warn(&self, conversation_id: &ConversationId, session: &JournalSession) {
        if let Err(e) = self.persist(conversation_id, session).await {
            tracing::warn!(
                conversation_id = %conversation_id,
                error = %e,
                "failed to persist session snapshot"
            );
        }
    }

    /// Drops sessions that belong to a day before `today`.
    ///
    /// A session is only dropped when the registry holds the sole handle.
    /// A turn keeps its clone while extraction runs with the lock released,
    /// and evicting then would leave that turn writing to an orphan. Kept
    /// sessions roll over on their own when the turn finishes.
    pub async fn evict_stale(&self, today: DayKey) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, handle| {
            if Arc::strong_count(handle) > 1 {
                return true;
            }
            match handle.try_lock() {
                Ok(session) => session.day_key() >= today,
                Err(_) => true,
            }
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!(evicted, day_key = %today, "evicted stale sessions");
        }
        evicted
    }

    /// Number of sessions held in memory.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
