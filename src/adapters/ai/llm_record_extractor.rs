//! LLM-backed record extraction.
//!
//! Sends the narration to the provider with a prompt describing the record
//! shape, then reads the JSON object out of the reply. Every field is
//! optional on the wire; anything the model leaves out comes back empty.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::sync::Arc;

use crate::domain::foundation::ConversationId;
use crate::domain::journal::{StructuredRecord, MAX_ADHD_SCORE, MAX_THREE_WINS};
use crate::ports::{
    AIProvider, CompletionRequest, ExtractionError, MessageRole, RequestMetadata, RecordExtractor,
};

use super::json_response::JsonResponseParser;

/// Markers that introduce a story in the narration.
const STORY_TRIGGERS: [&str; 2] = ["История:", "Story:"];

static EXTRACTION_PROMPT: Lazy<String> = Lazy::new(|| {
    format!(
        r#"Ты структурируешь дневник за день. Верни ТОЛЬКО JSON-объект без пояснений:
{{
  "dayLog": [строки, хронология дня, по одному событию],
  "feelings": строка, эмоции и состояние,
  "threeWins": [не больше {wins} строк, победы дня],
  "storyWorthy": строка, история или наблюдение дня,
  "adhdScore": целое от 0 до {max_score}, 0 если не упоминалось,
  "actionPoints": {{"bookRead": bool, "notesDone": bool, "rpg": bool, "finance": bool}}
}}
Правила:
- Не выдумывай. Если о поле ничего не сказано, оставь пустую строку, пустой список, 0 или false.
- Текст после «История:» или «Story:» целиком относится к storyWorthy.
- Сохраняй язык пользователя."#,
        wins = MAX_THREE_WINS,
        max_score = MAX_ADHD_SCORE,
    )
});

/// Extraction settings.
#[derive(Debug, Clone)]
pub struct LlmExtractorConfig {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for LlmExtractorConfig {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            max_tokens: 1_500,
        }
    }
}

/// [`RecordExtractor`] over any [`AIProvider`].
pub struct LlmRecordExtractor {
    provider: Arc<dyn AIProvider>,
    config: LlmExtractorConfig,
    parser: JsonResponseParser,
}

impl LlmRecordExtractor {
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        Self::with_config(provider, LlmExtractorConfig::default())
    }

    pub fn with_config(provider: Arc<dyn AIProvider>, config: LlmExtractorConfig) -> Self {
        Self {
            provider,
            config,
            parser: JsonResponseParser::new(),
        }
    }

    fn build_request(&self, conversation_id: &ConversationId, text: &str) -> CompletionRequest {
        CompletionRequest::new(RequestMetadata::new(conversation_id.clone()))
            .with_system_prompt(EXTRACTION_PROMPT.as_str())
            .with_message(MessageRole::User, text)
            .with_temperature(self.config.temperature)
            .with_max_tokens(self.config.max_tokens)
            .with_json_response()
    }

    fn parse_record(&self, content: &str) -> Result<StructuredRecord, ExtractionError> {
        let value = self
            .parser
            .parse(content)
            .map_err(|e| ExtractionError::invalid_response(e.to_string()))?;
        serde_json::from_value(value).map_err(|e| ExtractionError::invalid_response(e.to_string()))
    }
}

/// Text following the first story trigger, if the narration has one.
fn story_from_trigger(text: &str) -> Option<&str> {
    STORY_TRIGGERS
        .iter()
        .filter_map(|trigger| text.find(trigger).map(|idx| idx + trigger.len()))
        .min()
        .map(|start| text[start..].trim())
        .filter(|story| !story.is_empty())
}

#[async_trait]
impl RecordExtractor for LlmRecordExtractor {
    async fn extract(
        &self,
        conversation_id: &ConversationId,
        text: &str,
    ) -> Result<StructuredRecord, ExtractionError> {
        let request = self.build_request(conversation_id, text);
        tracing::debug!(
            conversation_id = %conversation_id,
            request_id = %request.metadata.request_id,
            estimated_tokens = self.provider.estimate_tokens(text),
            "extracting record"
        );

        let response = self.provider.complete(request).await?;
        let mut record = self.parse_record(&response.content)?;

        // The model sometimes drops the story when the trigger sits mid-text.
        if record.story_worthy().is_empty() {
            if let Some(story) = story_from_trigger(text) {
                record.set_story_worthy(story);
            }
        }

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::ports::AIError;

    fn conversation() -> ConversationId {
        ConversationId::new("chat-42").unwrap()
    }

    mod extraction {
        use super::*;

        #[tokio::test]
        async fn parses_full_record() {
            let provider = MockAIProvider::new().with_response(
                r#"```json
{"dayLog": ["подъём", "работа"], "feelings": "бодро", "threeWins": ["зал"],
 "storyWorthy": "", "adhdScore": "55", "actionPoints": {"bookRead": true}}
```"#,
            );
            let extractor = LlmRecordExtractor::new(Arc::new(provider));

            let record = extractor.extract(&conversation(), "день").await.unwrap();
            assert_eq!(record.day_log(), ["подъём", "работа"]);
            assert_eq!(record.feelings(), "бодро");
            assert_eq!(record.adhd_score(), 55);
            assert!(record.action_points().book_read);
            assert!(!record.action_points().finance);
        }

        #[tokio::test]
        async fn nulls_and_missing_fields_default() {
            let provider =
                MockAIProvider::new().with_response(r#"{"feelings": null, "threeWins": null}"#);
            let extractor = LlmRecordExtractor::new(Arc::new(provider));

            let record = extractor.extract(&conversation(), "ничего").await.unwrap();
            assert!(record.is_empty());
        }

        #[tokio::test]
        async fn sends_prompt_and_settings() {
            let provider = MockAIProvider::new();
            let extractor = LlmRecordExtractor::new(Arc::new(provider.clone()));

            extractor.extract(&conversation(), "мой день").await.unwrap();

            let calls = provider.get_calls();
            assert_eq!(calls.len(), 1);
            let request = &calls[0];
            assert!(request.system_prompt.as_deref().unwrap().contains("threeWins"));
            assert_eq!(request.messages[0].content, "мой день");
            assert_eq!(request.temperature, Some(0.2));
            assert!(request.json_response);
            assert_eq!(request.metadata.conversation_id.as_str(), "chat-42");
        }

        #[tokio::test]
        async fn story_trigger_fills_missing_story() {
            let provider = MockAIProvider::new().with_response(r#"{"feelings": "ok"}"#);
            let extractor = LlmRecordExtractor::new(Arc::new(provider));

            let record = extractor
                .extract(&conversation(), "Работал. История: сосед запускал дрон")
                .await
                .unwrap();
            assert_eq!(record.story_worthy(), "сосед запускал дрон");
        }

        #[tokio::test]
        async fn model_story_wins_over_trigger() {
            let provider = MockAIProvider::new().with_response(r#"{"storyWorthy": "дрон"}"#);
            let extractor = LlmRecordExtractor::new(Arc::new(provider));

            let record = extractor
                .extract(&conversation(), "Story: neighbour flew a drone")
                .await
                .unwrap();
            assert_eq!(record.story_worthy(), "дрон");
        }
    }

    mod failures {
        use super::*;

        #[tokio::test]
        async fn provider_error_propagates() {
            let provider = MockAIProvider::new().with_error(AIError::network("reset"));
            let extractor = LlmRecordExtractor::new(Arc::new(provider));

            let err = extractor.extract(&conversation(), "день").await.unwrap_err();
            assert_eq!(err, ExtractionError::Provider(AIError::network("reset")));
            assert!(err.is_retryable());
        }

        #[tokio::test]
        async fn prose_reply_is_invalid_response() {
            let provider = MockAIProvider::new().with_response("Извините, не понял.");
            let extractor = LlmRecordExtractor::new(Arc::new(provider));

            let err = extractor.extract(&conversation(), "день").await.unwrap_err();
            assert!(matches!(err, ExtractionError::InvalidResponse(_)));
        }
    }

    mod triggers {
        use super::*;

        #[test]
        fn finds_earliest_trigger() {
            assert_eq!(story_from_trigger("a Story: b История: c"), Some("b История: c"));
            assert_eq!(story_from_trigger("История:   "), None);
            assert_eq!(story_from_trigger("без истории"), None);
        }
    }
}
