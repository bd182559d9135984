//! Errors surfaced by the journal handlers.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{AIError, ExtractionError, SessionStoreError, TranscriptionError};

/// Everything a journal command can fail with.
///
/// None of these are fatal: the session is left as it was and the user can
/// simply try again.
#[derive(Debug, Error)]
pub enum JournalError {
    #[error("message is empty")]
    EmptyInput,

    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("transcription failed: {0}")]
    Transcription(#[from] TranscriptionError),

    #[error("no speech recognised")]
    EmptyTranscription,

    #[error("session storage failed: {0}")]
    Storage(#[from] SessionStoreError),

    #[error("task interpretation failed: {0}")]
    TaskInterpretation(#[from] AIError),

    #[error("no journal data for the current day")]
    NoData,

    #[error("session was reset while the message was being processed")]
    SessionReset,
}

impl JournalError {
    pub fn code(&self) -> ErrorCode {
        match self {
            JournalError::EmptyInput => ErrorCode::EmptyInput,
            JournalError::Extraction(_) => ErrorCode::ExtractionFailed,
            JournalError::Transcription(_) | JournalError::EmptyTranscription => {
                ErrorCode::TranscriptionFailed
            }
            JournalError::Storage(_) => ErrorCode::StorageError,
            JournalError::TaskInterpretation(_) => ErrorCode::AIProviderError,
            JournalError::NoData => ErrorCode::NoData,
            JournalError::SessionReset => ErrorCode::Conflict,
        }
    }

    /// True when resending the same input may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            JournalError::Extraction(err) => err.is_retryable(),
            JournalError::Transcription(err) => err.is_retryable(),
            JournalError::TaskInterpretation(err) => err.is_retryable(),
            JournalError::Storage(_) | JournalError::SessionReset => true,
            JournalError::EmptyInput | JournalError::EmptyTranscription | JournalError::NoData => {
                false
            }
        }
    }

    /// Short message suitable for showing to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            JournalError::EmptyInput => "Пришли текст или голосовое сообщение.",
            JournalError::Extraction(_) => "Ошибка при формировании дневника. Попробуй ещё раз.",
            JournalError::Transcription(_) => "Не удалось распознать аудио. Попробуй ещё раз.",
            JournalError::EmptyTranscription => "Не распознал речь. Попробуй ещё раз.",
            JournalError::Storage(_) => "Не удалось сохранить данные. Попробуй ещё раз.",
            JournalError::TaskInterpretation(_) => "Ошибка при разборе задачи. Попробуй ещё раз.",
            JournalError::NoData => "Пока нет данных.",
            JournalError::SessionReset => {
                "День начат заново, пока я разбирал сообщение. Отправь его ещё раз."
            }
        }
    }
}

impl From<&JournalError> for DomainError {
    fn from(err: &JournalError) -> Self {
        DomainError::new(err.code(), err.user_message())
            .with_detail("cause", err.to_string())
            .with_detail("retryable", err.is_retryable().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_the_failing_collaborator() {
        assert_eq!(JournalError::EmptyInput.code(), ErrorCode::EmptyInput);
        assert_eq!(
            JournalError::from(ExtractionError::invalid_response("x")).code(),
            ErrorCode::ExtractionFailed
        );
        assert_eq!(
            JournalError::EmptyTranscription.code(),
            ErrorCode::TranscriptionFailed
        );
        assert_eq!(JournalError::NoData.code(), ErrorCode::NoData);
        assert_eq!(JournalError::SessionReset.code(), ErrorCode::Conflict);
        assert!(JournalError::SessionReset.is_retryable());
    }

    #[test]
    fn retryability_is_delegated() {
        assert!(JournalError::from(ExtractionError::Provider(AIError::network("x"))).is_retryable());
        assert!(!JournalError::from(ExtractionError::Provider(AIError::AuthenticationFailed))
            .is_retryable());
        assert!(!JournalError::EmptyInput.is_retryable());
    }

    #[test]
    fn converts_to_domain_error_with_details() {
        let err = JournalError::NoData;
        let domain: DomainError = (&err).into();
        assert_eq!(domain.code, ErrorCode::NoData);
        assert_eq!(domain.message, "Пока нет данных.");
        assert_eq!(domain.details.get("retryable"), Some(&"false".to_string()));
    }
}
