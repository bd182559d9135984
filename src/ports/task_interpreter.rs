//! Task Interpreter Port - turns a task description into a task card.

use async_trait::async_trait;

use crate::domain::foundation::ConversationId;

use super::AIError;

/// Formats a free-form task description into a structured card.
///
/// Missing facts are left blank by implementations, never invented.
#[async_trait]
pub trait TaskInterpreter: Send + Sync {
    async fn interpret(
        &self,
        conversation_id: &ConversationId,
        text: &str,
    ) -> Result<String, AIError>;
}
