//! HTTP routes for journal endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{
    get_summary, post_message, post_new_day, post_voice, put_mode, JournalHandlers,
};

/// Creates the journal router with all endpoints.
///
/// Mount under `/api/journal`.
pub fn journal_routes(handlers: JournalHandlers) -> Router {
    Router::new()
        .route("/:id/messages", post(post_message))
        .route("/:id/voice", post(post_voice))
        .route("/:id/new-day", post(post_new_day))
        .route("/:id/summary", get(get_summary))
        .route("/:id/mode", put(put_mode))
        .with_state(handlers)
}
