//! HTTP DTOs for journal endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::journal::{
    HandleVoiceResult, JournalError, MessageOutcome, SummaryResult,
};
use crate::domain::foundation::DayKey;
use crate::domain::journal::{
    AnsweredField, DialogueMode, FieldId, PendingQuestion, StructuredRecord,
};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// A text message from the user.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageRequest {
    pub text: String,
    /// Journal day; the server's local date when omitted.
    #[serde(default)]
    pub day_key: Option<DayKey>,
}

/// Query parameters shared by endpoints that only need a day.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DayQuery {
    #[serde(default)]
    pub day_key: Option<DayKey>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetModeRequest {
    pub mode: DialogueMode,
    #[serde(default)]
    pub day_key: Option<DayKey>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    Clarify,
    Complete,
    TaskCard,
}

/// Reply to a text or voice message.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub kind: ReplyKind,
    /// Ready-to-send reply text.
    pub reply: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answered: Option<AnsweredField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub awaiting: Option<FieldId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub questions: Vec<PendingQuestion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<StructuredRecord>,
}

impl From<MessageOutcome> for MessageResponse {
    fn from(outcome: MessageOutcome) -> Self {
        let reply = outcome.reply_text();
        match outcome {
            MessageOutcome::Clarify {
                answered,
                awaiting,
                questions,
            } => Self {
                kind: ReplyKind::Clarify,
                reply,
                answered,
                awaiting: Some(awaiting),
                questions,
                record: None,
            },
            MessageOutcome::Complete {
                answered, record, ..
            } => Self {
                kind: ReplyKind::Complete,
                reply,
                answered,
                awaiting: None,
                questions: Vec::new(),
                record: Some(record),
            },
            MessageOutcome::TaskCard(_) => Self {
                kind: ReplyKind::TaskCard,
                reply,
                answered: None,
                awaiting: None,
                questions: Vec::new(),
                record: None,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VoiceResponse {
    pub transcript: String,
    #[serde(flatten)]
    pub message: MessageResponse,
}

impl From<HandleVoiceResult> for VoiceResponse {
    fn from(result: HandleVoiceResult) -> Self {
        Self {
            transcript: result.transcript,
            message: result.outcome.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewDayResponse {
    pub day_key: DayKey,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryResponse {
    pub day_key: DayKey,
    pub record: StructuredRecord,
    pub rendered: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pending: Vec<PendingQuestion>,
}

impl From<SummaryResult> for SummaryResponse {
    fn from(result: SummaryResult) -> Self {
        Self {
            day_key: result.day_key,
            record: result.record,
            rendered: result.rendered,
            pending: result.pending,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModeResponse {
    pub mode: DialogueMode,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            retryable: false,
            details: None,
        }
    }
}

impl From<&JournalError> for ErrorResponse {
    fn from(error: &JournalError) -> Self {
        Self {
            code: error.code().to_string(),
            message: error.user_message().to_string(),
            retryable: error.is_retryable(),
            details: None,
        }
    }
}
