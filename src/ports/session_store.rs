//! Session Store Port - snapshots of the active session per conversation.
//!
//! Only the current day's session is kept; saving overwrites. The store lets
//! a restarted process pick a dialogue up where it left off.

use async_trait::async_trait;

use crate::domain::foundation::ConversationId;
use crate::domain::journal::JournalSession;

/// Errors that can occur during session storage operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("Failed to serialize session: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize session: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Port for persisting and loading sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Saves the session, replacing any previous snapshot.
    async fn save(
        &self,
        conversation_id: &ConversationId,
        session: &JournalSession,
    ) -> Result<(), SessionStoreError>;

    /// Loads the last snapshot, if any.
    async fn load(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Option<JournalSession>, SessionStoreError>;

    /// Removes the snapshot. Missing snapshots are not an error.
    async fn delete(&self, conversation_id: &ConversationId) -> Result<(), SessionStoreError>;
}
