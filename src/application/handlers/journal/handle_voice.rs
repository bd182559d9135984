//! HandleVoice - transcribe, then treat as a text message.

use std::sync::Arc;

use crate::domain::foundation::{ConversationId, DayKey};
use crate::ports::{AudioClip, Transcriber};

use super::{HandleMessageCommand, HandleMessageHandler, JournalError, MessageOutcome};

#[derive(Debug, Clone)]
pub struct HandleVoiceCommand {
    pub conversation_id: ConversationId,
    pub clip: AudioClip,
    pub day_key: DayKey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleVoiceResult {
    /// What was heard.
    pub transcript: String,
    pub outcome: MessageOutcome,
}

pub struct HandleVoiceHandler {
    transcriber: Arc<dyn Transcriber>,
    messages: Arc<HandleMessageHandler>,
}

impl HandleVoiceHandler {
    pub fn new(transcriber: Arc<dyn Transcriber>, messages: Arc<HandleMessageHandler>) -> Self {
        Self {
            transcriber,
            messages,
        }
    }

    pub async fn handle(&self, cmd: HandleVoiceCommand) -> Result<HandleVoiceResult, JournalError> {
        // Transcription happens before the session is touched at all.
        let transcript = self.transcriber.transcribe(cmd.clip).await.map_err(|e| {
            tracing::warn!(
                conversation_id = %cmd.conversation_id,
                error = %e,
                "transcription failed"
            );
            JournalError::from(e)
        })?;

        if transcript.trim().is_empty() {
            return Err(JournalError::EmptyTranscription);
        }

        let outcome = self
            .messages
            .handle(HandleMessageCommand {
                conversation_id: cmd.conversation_id,
                text: transcript.clone(),
                day_key: cmd.day_key,
            })
            .await?;

        Ok(HandleVoiceResult {
            transcript,
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{LlmRecordExtractor, LlmTaskInterpreter, MockAIProvider};
    use crate::adapters::storage::InMemorySessionStore;
    use crate::application::handlers::journal::{JournalSettings, SessionRegistry};
    use crate::domain::journal::NotionRenderer;
    use crate::ports::TranscriptionError;
    use async_trait::async_trait;

    struct FixedTranscriber(Result<String, TranscriptionError>);

    #[async_trait]
    impl Transcriber for FixedTranscriber {
        async fn transcribe(&self, _clip: AudioClip) -> Result<String, TranscriptionError> {
            self.0.clone()
        }
    }

    fn handler(
        transcript: Result<String, TranscriptionError>,
        provider: MockAIProvider,
    ) -> HandleVoiceHandler {
        let provider = Arc::new(provider);
        let messages = HandleMessageHandler::new(
            Arc::new(SessionRegistry::new(Arc::new(InMemorySessionStore::new()))),
            Arc::new(LlmRecordExtractor::new(provider.clone())),
            Arc::new(LlmTaskInterpreter::new(provider, 0.2)),
            Arc::new(NotionRenderer),
            JournalSettings::default(),
        );
        HandleVoiceHandler::new(Arc::new(FixedTranscriber(transcript)), Arc::new(messages))
    }

    fn cmd() -> HandleVoiceCommand {
        HandleVoiceCommand {
            conversation_id: ConversationId::new("chat").unwrap(),
            clip: AudioClip::ogg(vec![1, 2, 3]),
            day_key: "2024-06-01".parse().unwrap(),
        }
    }

    #[tokio::test]
    async fn transcript_flows_into_the_dialogue() {
        let provider = MockAIProvider::new().with_response(r#"{"feelings": "бодро"}"#);
        let result = handler(Ok("Сегодня бодро".to_string()), provider.clone())
            .handle(cmd())
            .await
            .unwrap();

        assert_eq!(result.transcript, "Сегодня бодро");
        assert!(matches!(result.outcome, MessageOutcome::Clarify { .. }));
        assert_eq!(provider.get_calls()[0].messages[0].content, "Сегодня бодро");
    }

    #[tokio::test]
    async fn silence_is_an_empty_transcription() {
        let provider = MockAIProvider::new();
        let err = handler(Ok("  ".to_string()), provider.clone())
            .handle(cmd())
            .await
            .unwrap_err();

        assert!(matches!(err, JournalError::EmptyTranscription));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn transcription_errors_propagate() {
        let err = handler(Err(TranscriptionError::RateLimited), MockAIProvider::new())
            .handle(cmd())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            JournalError::Transcription(TranscriptionError::RateLimited)
        ));
        assert!(err.is_retryable());
    }
}
