//! Transcriber Port - speech to text.

use async_trait::async_trait;

/// A recorded voice message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    /// Raw encoded audio.
    pub bytes: Vec<u8>,
    /// File name sent to the provider; the extension hints the codec.
    pub file_name: String,
    /// MIME type, e.g. `audio/ogg`.
    pub mime_type: String,
}

impl AudioClip {
    pub fn new(bytes: Vec<u8>, file_name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            file_name: file_name.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Telegram-style voice note.
    pub fn ogg(bytes: Vec<u8>) -> Self {
        Self::new(bytes, "voice.ogg", "audio/ogg")
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Transcription failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranscriptionError {
    #[error("audio clip is empty")]
    EmptyAudio,

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("rate limited")]
    RateLimited,

    #[error("transcription service error {status}: {message}")]
    Service { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),
}

impl TranscriptionError {
    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            TranscriptionError::RateLimited | TranscriptionError::Network(_) => true,
            TranscriptionError::Service { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Turns audio into text in the configured locale.
///
/// An empty string is a valid result meaning no speech was recognised.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, clip: AudioClip) -> Result<String, TranscriptionError>;
}
