//! Record Extractor Port - free narration into a record candidate.

use async_trait::async_trait;

use crate::domain::foundation::ConversationId;
use crate::domain::journal::StructuredRecord;

use super::AIError;

/// Errors raised while turning narration into a record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    /// The model call itself failed.
    #[error("provider error: {0}")]
    Provider(#[from] AIError),

    /// The model answered, but not with a usable record.
    #[error("invalid extraction response: {0}")]
    InvalidResponse(String),
}

impl ExtractionError {
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }

    /// True when trying the same narration again may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ExtractionError::Provider(err) => err.is_retryable(),
            ExtractionError::InvalidResponse(_) => true,
        }
    }
}

/// Produces a record candidate from free text.
///
/// Fields the text says nothing about come back empty. The candidate is
/// merged by the caller; implementations never see the existing record.
#[async_trait]
pub trait RecordExtractor: Send + Sync {
    async fn extract(
        &self,
        conversation_id: &ConversationId,
        text: &str,
    ) -> Result<StructuredRecord, ExtractionError>;
}
