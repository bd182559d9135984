//! SetMode - switch a conversation between journal and task mode.

use std::sync::Arc;

use crate::domain::foundation::{ConversationId, DayKey};
use crate::domain::journal::DialogueMode;

use super::{JournalError, SessionRegistry};

#[derive(Debug, Clone)]
pub struct SetModeCommand {
    pub conversation_id: ConversationId,
    pub mode: DialogueMode,
    pub day_key: DayKey,
}

pub struct SetModeHandler {
    registry: Arc<SessionRegistry>,
}

impl SetModeHandler {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    /// Switching keeps the journal record for the day.
    pub async fn handle(&self, cmd: SetModeCommand) -> Result<DialogueMode, JournalError> {
        let handle = self.registry.session(&cmd.conversation_id, cmd.day_key).await;
        let mut session = handle.lock().await;
        session.roll_over(cmd.day_key);
        session.set_mode(cmd.mode);

        tracing::info!(conversation_id = %cmd.conversation_id, mode = ?cmd.mode, "mode changed");
        self.registry.persist_or_warn(&cmd.conversation_id, &session).await;
        Ok(session.mode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemorySessionStore;
    use crate::domain::journal::{CompletenessEvaluator, StructuredRecord};

    #[tokio::test]
    async fn switching_mode_keeps_the_record() {
        let registry = Arc::new(SessionRegistry::new(Arc::new(InMemorySessionStore::new())));
        let id = ConversationId::new("chat").unwrap();
        let day: DayKey = "2024-06-01".parse().unwrap();
        {
            let handle = registry.session(&id, day).await;
            handle.lock().await.apply_extraction(
                StructuredRecord::new().with_feelings("ok"),
                &CompletenessEvaluator::default(),
            );
        }

        let handler = SetModeHandler::new(registry.clone());
        let mode = handler
            .handle(SetModeCommand {
                conversation_id: id.clone(),
                mode: DialogueMode::Task,
                day_key: day,
            })
            .await
            .unwrap();

        assert_eq!(mode, DialogueMode::Task);
        let handle = registry.session(&id, day).await;
        let session = handle.lock().await;
        assert_eq!(session.record().unwrap().feelings(), "ok");
    }
}
