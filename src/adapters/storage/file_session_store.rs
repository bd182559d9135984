//! File-based Session Store Adapter
//!
//! One YAML file per conversation, rewritten on every save. Writes go to a
//! temporary file first and are renamed into place, so a crash mid-write
//! leaves the previous snapshot intact.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::foundation::ConversationId;
use crate::domain::journal::JournalSession;
use crate::ports::{SessionStore, SessionStoreError};

/// File-based storage for journal sessions.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    base_path: PathBuf,
}

impl FileSessionStore {
    /// ```ignore
    /// let store = FileSessionStore::new("./data/sessions");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn session_path(&self, conversation_id: &ConversationId) -> PathBuf {
        self.base_path
            .join(format!("{}.yaml", file_stem(conversation_id.as_str())))
    }
}

/// Conversation ids come from the transport; anything outside a safe
/// filename alphabet is hex-escaped.
fn file_stem(id: &str) -> String {
    let mut stem = String::with_capacity(id.len());
    for byte in id.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' => stem.push(byte as char),
            other => stem.push_str(&format!("%{:02X}", other)),
        }
    }
    stem
}

fn io_error(err: std::io::Error) -> SessionStoreError {
    SessionStoreError::IoError(err.to_string())
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn save(
        &self,
        conversation_id: &ConversationId,
        session: &JournalSession,
    ) -> Result<(), SessionStoreError> {
        fs::create_dir_all(&self.base_path).await.map_err(io_error)?;

        let yaml = serde_yaml::to_string(session)
            .map_err(|e| SessionStoreError::SerializationFailed(e.to_string()))?;

        let path = self.session_path(conversation_id);
        let tmp = path.with_extension("yaml.tmp");
        fs::write(&tmp, yaml).await.map_err(io_error)?;
        fs::rename(&tmp, &path).await.map_err(io_error)?;

        Ok(())
    }

    async fn load(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Option<JournalSession>, SessionStoreError> {
        let yaml = match fs::read_to_string(self.session_path(conversation_id)).await {
            Ok(yaml) => yaml,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(e)),
        };

        serde_yaml::from_str(&yaml)
            .map(Some)
            .map_err(|e| SessionStoreError::DeserializationFailed(e.to_string()))
    }

    async fn delete(&self, conversation_id: &ConversationId) -> Result<(), SessionStoreError> {
        match fs::remove_file(self.session_path(conversation_id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(e)),
        }
    }
}
