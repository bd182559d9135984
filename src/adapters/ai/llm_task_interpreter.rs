//! LLM-backed task interpretation.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::foundation::ConversationId;
use crate::ports::{
    AIError, AIProvider, CompletionRequest, MessageRole, RequestMetadata, TaskInterpreter,
};

use super::json_response::sanitize_text;

const TASK_PROMPT: &str = "Ты оформляешь описание задачи в карточку. Не выдумывай недостающих фактов: \
если чего-то нет в тексте, напиши «не указано».
Формат:
Цель:
Контекст:
Критерий готовности:
Ограничения и сроки:
Открытые вопросы:
Первый шаг:";

/// [`TaskInterpreter`] that asks the provider for a task card.
pub struct LlmTaskInterpreter {
    provider: Arc<dyn AIProvider>,
    temperature: f32,
}

impl LlmTaskInterpreter {
    pub fn new(provider: Arc<dyn AIProvider>, temperature: f32) -> Self {
        Self {
            provider,
            temperature,
        }
    }
}

#[async_trait]
impl TaskInterpreter for LlmTaskInterpreter {
    async fn interpret(
        &self,
        conversation_id: &ConversationId,
        text: &str,
    ) -> Result<String, AIError> {
        let request = CompletionRequest::new(RequestMetadata::new(conversation_id.clone()))
            .with_system_prompt(TASK_PROMPT)
            .with_message(MessageRole::User, text)
            .with_temperature(self.temperature);

        let response = self.provider.complete(request).await?;
        let card = sanitize_text(&response.content).trim().to_string();
        if card.is_empty() {
            return Err(AIError::parse("empty task card"));
        }
        Ok(card)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;

    #[tokio::test]
    async fn returns_trimmed_card() {
        let provider = MockAIProvider::new().with_response("  Цель: отчёт\nПервый шаг: план  \n");
        let interpreter = LlmTaskInterpreter::new(Arc::new(provider.clone()), 0.2);

        let card = interpreter
            .interpret(&ConversationId::new("c").unwrap(), "нужно сделать отчёт")
            .await
            .unwrap();

        assert_eq!(card, "Цель: отчёт\nПервый шаг: план");
        let call = &provider.get_calls()[0];
        assert!(call.system_prompt.as_deref().unwrap().starts_with("Ты оформляешь"));
        assert!(!call.json_response);
    }

    #[tokio::test]
    async fn blank_reply_is_an_error() {
        let provider = MockAIProvider::new().with_response("   ");
        let interpreter = LlmTaskInterpreter::new(Arc::new(provider), 0.2);

        let err = interpreter
            .interpret(&ConversationId::new("c").unwrap(), "задача")
            .await
            .unwrap_err();
        assert!(matches!(err, AIError::Parse(_)));
    }
}
