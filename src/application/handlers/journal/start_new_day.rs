//! StartNewDay - explicit reset of the conversation's journal.

use std::sync::Arc;

use crate::domain::foundation::{ConversationId, DayKey};

use super::{JournalError, SessionRegistry};

#[derive(Debug, Clone)]
pub struct StartNewDayCommand {
    pub conversation_id: ConversationId,
    pub day_key: DayKey,
}

pub struct StartNewDayHandler {
    registry: Arc<SessionRegistry>,
}

impl StartNewDayHandler {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    /// Drops the record, every declined/deferred/pending field and the task
    /// mode. Unlike turns, a failed snapshot write is reported.
    pub async fn handle(&self, cmd: StartNewDayCommand) -> Result<DayKey, JournalError> {
        let handle = self.registry.session(&cmd.conversation_id, cmd.day_key).await;
        let mut session = handle.lock().await;
        session.start_new_day(cmd.day_key);

        tracing::info!(
            conversation_id = %cmd.conversation_id,
            day_key = %cmd.day_key,
            "journal day started"
        );
        self.registry.persist(&cmd.conversation_id, &session).await?;
        Ok(session.day_key())
    }
}
