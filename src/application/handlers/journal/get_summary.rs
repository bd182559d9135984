//! GetSummary - read-only view of the current record.

use std::sync::Arc;

use crate::domain::foundation::{ConversationId, DayKey};
use crate::domain::journal::{truncate_chars, JournalRenderer, PendingQuestion, StructuredRecord};

use super::{JournalError, SessionRegistry};

#[derive(Debug, Clone)]
pub struct GetSummaryQuery {
    pub conversation_id: ConversationId,
    pub day_key: DayKey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryResult {
    pub day_key: DayKey,
    pub record: StructuredRecord,
    pub rendered: String,
    /// Questions still open, if the dialogue is mid-clarification.
    pub pending: Vec<PendingQuestion>,
}

pub struct GetSummaryHandler {
    registry: Arc<SessionRegistry>,
    renderer: Arc<dyn JournalRenderer>,
    render_max_chars: usize,
}

impl GetSummaryHandler {
    pub fn new(
        registry: Arc<SessionRegistry>,
        renderer: Arc<dyn JournalRenderer>,
        render_max_chars: usize,
    ) -> Self {
        Self {
            registry,
            renderer,
            render_max_chars,
        }
    }

    pub async fn handle(&self, query: GetSummaryQuery) -> Result<SummaryResult, JournalError> {
        let handle = self.registry.session(&query.conversation_id, query.day_key).await;
        let session = handle.lock().await;

        // A snapshot from an earlier day is not today's summary.
        if session.day_key() != query.day_key {
            return Err(JournalError::NoData);
        }

        let record = session.summary().cloned().ok_or(JournalError::NoData)?;
        let rendered = self.renderer.render(&record);

        Ok(SummaryResult {
            day_key: session.day_key(),
            rendered: truncate_chars(&rendered, self.render_max_chars).to_string(),
            pending: session.pending_questions(),
            record,
        })
    }
}
