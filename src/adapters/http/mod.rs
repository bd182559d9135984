//! HTTP adapters - REST API implementations.

pub mod journal;

pub use journal::{journal_routes, JournalHandlers};

use std::time::Duration;

use axum::{routing::get, Router};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Voice notes are sent as raw bodies; 20 MiB covers several minutes of opus.
const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

/// Assembles the full application router.
pub fn app_router(handlers: JournalHandlers, request_timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(journal::health))
        .nest("/api/journal", journal_routes(handlers))
        .layer(axum::extract::DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
}
