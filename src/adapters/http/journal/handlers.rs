//! HTTP handlers for journal endpoints.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::application::handlers::journal::{
    GetSummaryHandler, GetSummaryQuery, HandleMessageCommand, HandleMessageHandler,
    HandleVoiceCommand, HandleVoiceHandler, JournalError, SetModeCommand, SetModeHandler,
    StartNewDayCommand, StartNewDayHandler,
};
use crate::domain::foundation::{ConversationId, DayKey};
use crate::ports::AudioClip;

use super::dto::{
    DayQuery, ErrorResponse, HealthResponse, MessageRequest, MessageResponse, ModeResponse,
    NewDayResponse, SetModeRequest, SummaryResponse, VoiceResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct JournalHandlers {
    message_handler: Arc<HandleMessageHandler>,
    voice_handler: Arc<HandleVoiceHandler>,
    new_day_handler: Arc<StartNewDayHandler>,
    summary_handler: Arc<GetSummaryHandler>,
    mode_handler: Arc<SetModeHandler>,
}

impl JournalHandlers {
    pub fn new(
        message_handler: Arc<HandleMessageHandler>,
        voice_handler: Arc<HandleVoiceHandler>,
        new_day_handler: Arc<StartNewDayHandler>,
        summary_handler: Arc<GetSummaryHandler>,
        mode_handler: Arc<SetModeHandler>,
    ) -> Self {
        Self {
            message_handler,
            voice_handler,
            new_day_handler,
            summary_handler,
            mode_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/journal/:id/messages - Send a text message
pub async fn post_message(
    State(handlers): State<JournalHandlers>,
    Path(conversation_id): Path<String>,
    Json(req): Json<MessageRequest>,
) -> Response {
    let conversation_id = match parse_conversation_id(&conversation_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = HandleMessageCommand {
        conversation_id,
        text: req.text,
        day_key: req.day_key.unwrap_or_else(DayKey::today),
    };

    match handlers.message_handler.handle(cmd).await {
        Ok(outcome) => (StatusCode::OK, Json(MessageResponse::from(outcome))).into_response(),
        Err(e) => handle_journal_error(e),
    }
}

/// POST /api/journal/:id/voice - Send a voice message as the raw request body
pub async fn post_voice(
    State(handlers): State<JournalHandlers>,
    Path(conversation_id): Path<String>,
    Query(query): Query<DayQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let conversation_id = match parse_conversation_id(&conversation_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let mime_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("audio/ogg");

    let cmd = HandleVoiceCommand {
        conversation_id,
        clip: AudioClip::new(body.to_vec(), voice_file_name(mime_type), mime_type),
        day_key: query.day_key.unwrap_or_else(DayKey::today),
    };

    match handlers.voice_handler.handle(cmd).await {
        Ok(result) => (StatusCode::OK, Json(VoiceResponse::from(result))).into_response(),
        Err(e) => handle_journal_error(e),
    }
}

/// POST /api/journal/:id/new-day - Discard the current day and start over
pub async fn post_new_day(
    State(handlers): State<JournalHandlers>,
    Path(conversation_id): Path<String>,
    Query(query): Query<DayQuery>,
) -> Response {
    let conversation_id = match parse_conversation_id(&conversation_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = StartNewDayCommand {
        conversation_id,
        day_key: query.day_key.unwrap_or_else(DayKey::today),
    };

    match handlers.new_day_handler.handle(cmd).await {
        Ok(day_key) => {
            let response = NewDayResponse {
                day_key,
                message: "Начинаем новый день. Расскажи, как он прошёл.".to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_journal_error(e),
    }
}

/// GET /api/journal/:id/summary - Current record, rendered
pub async fn get_summary(
    State(handlers): State<JournalHandlers>,
    Path(conversation_id): Path<String>,
    Query(query): Query<DayQuery>,
) -> Response {
    let conversation_id = match parse_conversation_id(&conversation_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let query = GetSummaryQuery {
        conversation_id,
        day_key: query.day_key.unwrap_or_else(DayKey::today),
    };

    match handlers.summary_handler.handle(query).await {
        Ok(result) => (StatusCode::OK, Json(SummaryResponse::from(result))).into_response(),
        Err(e) => handle_journal_error(e),
    }
}

/// PUT /api/journal/:id/mode - Switch between journal and task mode
pub async fn put_mode(
    State(handlers): State<JournalHandlers>,
    Path(conversation_id): Path<String>,
    Json(req): Json<SetModeRequest>,
) -> Response {
    let conversation_id = match parse_conversation_id(&conversation_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = SetModeCommand {
        conversation_id,
        mode: req.mode,
        day_key: req.day_key.unwrap_or_else(DayKey::today),
    };

    match handlers.mode_handler.handle(cmd).await {
        Ok(mode) => (StatusCode::OK, Json(ModeResponse { mode })).into_response(),
        Err(e) => handle_journal_error(e),
    }
}

/// GET /health - Liveness probe
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ════════════════════════════════════════════════════════════════════════════
// Helpers
// ════════════════════════════════════════════════════════════════════════════

fn parse_conversation_id(raw: &str) -> Result<ConversationId, Response> {
    ConversationId::new(raw).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid conversation ID")),
        )
            .into_response()
    })
}

fn voice_file_name(mime_type: &str) -> &'static str {
    match mime_type.split(';').next().map(str::trim) {
        Some("audio/mpeg") | Some("audio/mp3") => "voice.mp3",
        Some("audio/wav") | Some("audio/x-wav") => "voice.wav",
        Some("audio/mp4") | Some("audio/m4a") | Some("audio/x-m4a") => "voice.m4a",
        Some("audio/webm") => "voice.webm",
        _ => "voice.ogg",
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn status_for(error: &JournalError) -> StatusCode {
    match error {
        JournalError::EmptyInput => StatusCode::BAD_REQUEST,
        JournalError::EmptyTranscription => StatusCode::UNPROCESSABLE_ENTITY,
        JournalError::NoData => StatusCode::NOT_FOUND,
        JournalError::SessionReset => StatusCode::CONFLICT,
        JournalError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        JournalError::Extraction(_)
        | JournalError::Transcription(_)
        | JournalError::TaskInterpretation(_) => {
            if error.is_retryable() {
                StatusCode::SERVICE_UNAVAILABLE
            } else {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

fn handle_journal_error(error: JournalError) -> Response {
    let status = status_for(&error);
    if status.is_server_error() {
        tracing::error!(error = %error, status = status.as_u16(), "journal request failed");
    }
    (status, Json(ErrorResponse::from(&error))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{AIError, ExtractionError, SessionStoreError, TranscriptionError};

    #[test]
    fn empty_input_maps_to_400() {
        let response = handle_journal_error(JournalError::EmptyInput);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn no_data_maps_to_404() {
        let response = handle_journal_error(JournalError::NoData);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn session_reset_maps_to_409() {
        let response = handle_journal_error(JournalError::SessionReset);
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn empty_transcription_maps_to_422() {
        let response = handle_journal_error(JournalError::EmptyTranscription);
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn retryable_upstream_failure_maps_to_503() {
        let error = JournalError::Extraction(ExtractionError::Provider(AIError::RateLimited {
            retry_after_secs: 5,
        }));
        assert_eq!(status_for(&error), StatusCode::SERVICE_UNAVAILABLE);

        let error = JournalError::Transcription(TranscriptionError::RateLimited);
        assert_eq!(status_for(&error), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn permanent_upstream_failure_maps_to_502() {
        let error = JournalError::Extraction(ExtractionError::Provider(
            AIError::content_filtered("policy"),
        ));
        assert_eq!(status_for(&error), StatusCode::BAD_GATEWAY);

        let error = JournalError::TaskInterpretation(AIError::AuthenticationFailed);
        assert_eq!(status_for(&error), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn storage_failure_maps_to_500() {
        let error = JournalError::Storage(SessionStoreError::IoError("disk full".into()));
        assert_eq!(status_for(&error), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn voice_file_name_follows_content_type() {
        assert_eq!(voice_file_name("audio/mpeg"), "voice.mp3");
        assert_eq!(voice_file_name("audio/webm; codecs=opus"), "voice.webm");
        assert_eq!(voice_file_name("application/octet-stream"), "voice.ogg");
    }

    #[test]
    fn blank_conversation_id_is_rejected() {
        let response = parse_conversation_id("  ").unwrap_err();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
