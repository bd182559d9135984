//! HandleMessage - one text message through the dialogue.
//!
//! Journal mode: an awaited answer is parsed and applied under the session
//! lock; anything else is sent to extraction with the lock released, and the
//! candidate is merged into whatever the session looks like once extraction
//! returns. Task mode hands the text to the task interpreter and leaves the
//! journal untouched.

use std::sync::Arc;

use crate::domain::foundation::{ConversationId, DayKey};
use crate::domain::journal::{
    truncate_chars, AnswerKind, AnsweredField, DialogueMode, DialogueStep, FieldId,
    JournalRenderer, JournalSession, PendingQuestion, StructuredRecord, Turn,
};
use crate::ports::{RecordExtractor, TaskInterpreter};

use super::{JournalError, JournalSettings, SessionRegistry};

/// Command to process one incoming text message.
#[derive(Debug, Clone)]
pub struct HandleMessageCommand {
    pub conversation_id: ConversationId,
    pub text: String,
    /// Journal day the message belongs to.
    pub day_key: DayKey,
}

/// What the user should be told after a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageOutcome {
    /// Fields are still missing.
    Clarify {
        answered: Option<AnsweredField>,
        awaiting: FieldId,
        questions: Vec<PendingQuestion>,
    },
    /// The record is complete.
    Complete {
        answered: Option<AnsweredField>,
        record: StructuredRecord,
        rendered: String,
    },
    /// Task mode reply.
    TaskCard(String),
}

impl MessageOutcome {
    /// The text to send back over the transport.
    pub fn reply_text(&self) -> String {
        match self {
            MessageOutcome::Clarify {
                answered,
                questions,
                ..
            } => {
                let mut text = String::new();
                if matches!(answered, Some(a) if a.kind == AnswerKind::Unparsed) {
                    text.push_str("Не понял ответ, вернусь к этому позже.\n\n");
                }
                text.push_str("Уточню пару моментов:\n");
                for (i, q) in questions.iter().enumerate() {
                    text.push_str(&format!("{}. {}\n", i + 1, q.question));
                }
                text.push_str("\nОтветь на первый вопрос или напиши «нет», чтобы пропустить.");
                text
            }
            MessageOutcome::Complete { rendered, .. } => rendered.clone(),
            MessageOutcome::TaskCard(card) => card.clone(),
        }
    }
}

/// Handler for incoming text messages.
pub struct HandleMessageHandler {
    registry: Arc<SessionRegistry>,
    extractor: Arc<dyn RecordExtractor>,
    task_interpreter: Arc<dyn TaskInterpreter>,
    renderer: Arc<dyn JournalRenderer>,
    settings: JournalSettings,
}

impl HandleMessageHandler {
    pub fn new(
        registry: Arc<SessionRegistry>,
        extractor: Arc<dyn RecordExtractor>,
        task_interpreter: Arc<dyn TaskInterpreter>,
        renderer: Arc<dyn JournalRenderer>,
        settings: JournalSettings,
    ) -> Self {
        Self {
            registry,
            extractor,
            task_interpreter,
            renderer,
            settings,
        }
    }

    pub async fn handle(&self, cmd: HandleMessageCommand) -> Result<MessageOutcome, JournalError> {
        let text = cmd.text.trim();
        if text.is_empty() {
            return Err(JournalError::EmptyInput);
        }

        let handle = self.registry.session(&cmd.conversation_id, cmd.day_key).await;

        let epoch = {
            let mut session = handle.lock().await;
            if session.roll_over(cmd.day_key) {
                tracing::info!(
                    conversation_id = %cmd.conversation_id,
                    day_key = %cmd.day_key,
                    "new journal day"
                );
            }

            if session.mode() == DialogueMode::Task {
                drop(session);
                return self.interpret_task(&cmd.conversation_id, text).await;
            }

            if let Some(turn) = session.answer(text, &self.settings.parser, &self.settings.evaluator)
            {
                if let Some(answered) = turn.answered {
                    tracing::info!(
                        conversation_id = %cmd.conversation_id,
                        field = %answered.field,
                        kind = ?answered.kind,
                        "answer applied"
                    );
                }
                self.registry
                    .persist_or_warn(&cmd.conversation_id, &session)
                    .await;
                return Ok(self.outcome(turn));
            }

            session.epoch()
        };

        // Extraction runs without the lock; on failure nothing was touched.
        let candidate = self
            .extractor
            .extract(&cmd.conversation_id, text)
            .await
            .map_err(|e| {
                tracing::warn!(
                    conversation_id = %cmd.conversation_id,
                    error = %e,
                    "extraction failed"
                );
                JournalError::from(e)
            })?;

        let mut session = handle.lock().await;
        session.roll_over(cmd.day_key);
        if session.epoch() != epoch {
            // The narration belonged to a session that no longer exists.
            tracing::info!(
                conversation_id = %cmd.conversation_id,
                day_key = %cmd.day_key,
                "session reset during extraction, candidate dropped"
            );
            return Err(JournalError::SessionReset);
        }
        let turn = session.apply_extraction(candidate, &self.settings.evaluator);
        log_turn(&cmd.conversation_id, &session, &turn);
        self.registry
            .persist_or_warn(&cmd.conversation_id, &session)
            .await;

        Ok(self.outcome(turn))
    }

    async fn interpret_task(
        &self,
        conversation_id: &ConversationId,
        text: &str,
    ) -> Result<MessageOutcome, JournalError> {
        let card = self.task_interpreter.interpret(conversation_id, text).await?;
        tracing::info!(conversation_id = %conversation_id, "task card produced");
        Ok(MessageOutcome::TaskCard(
            truncate_chars(&card, self.settings.render_max_chars).to_string(),
        ))
    }

    fn outcome(&self, turn: Turn) -> MessageOutcome {
        match turn.step {
            DialogueStep::Clarify {
                awaiting,
                questions,
            } => MessageOutcome::Clarify {
                answered: turn.answered,
                awaiting,
                questions,
            },
            DialogueStep::Complete(record) => {
                let rendered = self.renderer.render(&record);
                MessageOutcome::Complete {
                    answered: turn.answered,
                    rendered: truncate_chars(&rendered, self.settings.render_max_chars)
                        .to_string(),
                    record,
                }
            }
        }
    }
}

fn log_turn(conversation_id: &ConversationId, session: &JournalSession, turn: &Turn) {
    match &turn.step {
        DialogueStep::Clarify { awaiting, questions } => tracing::info!(
            conversation_id = %conversation_id,
            day_key = %session.day_key(),
            field = %awaiting,
            pending = questions.len(),
            "record merged, clarification needed"
        ),
        DialogueStep::Complete(_) => tracing::info!(
            conversation_id = %conversation_id,
            day_key = %session.day_key(),
            "record merged, complete"
        ),
    }
}
