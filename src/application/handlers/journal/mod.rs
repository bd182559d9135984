//! Journal command and query handlers.

mod error;
mod get_summary;
mod handle_message;
mod handle_voice;
mod session_registry;
mod set_mode;
mod start_new_day;

pub use error::JournalError;
pub use get_summary::{GetSummaryHandler, GetSummaryQuery, SummaryResult};
pub use handle_message::{HandleMessageCommand, HandleMessageHandler, MessageOutcome};
pub use handle_voice::{HandleVoiceCommand, HandleVoiceHandler, HandleVoiceResult};
pub use session_registry::{SessionHandle, SessionRegistry};
pub use set_mode::{SetModeCommand, SetModeHandler};
pub use start_new_day::{StartNewDayCommand, StartNewDayHandler};

use crate::config::JournalConfig;
use crate::domain::journal::{AnswerParser, CompletenessEvaluator};

/// Dialogue tuning shared by the handlers.
#[derive(Debug, Clone)]
pub struct JournalSettings {
    pub parser: AnswerParser,
    pub evaluator: CompletenessEvaluator,
    /// Transport limit for rendered replies, in characters.
    pub render_max_chars: usize,
}

impl Default for JournalSettings {
    fn default() -> Self {
        Self {
            parser: AnswerParser::default(),
            evaluator: CompletenessEvaluator::default(),
            render_max_chars: 4000,
        }
    }
}

impl From<&JournalConfig> for JournalSettings {
    fn from(config: &JournalConfig) -> Self {
        Self {
            parser: AnswerParser::new(config.negation_tokens()),
            evaluator: CompletenessEvaluator::new(config.max_pending_questions),
            render_max_chars: config.render_max_chars,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::journal::{StructuredRecord, MAX_PENDING_QUESTIONS};
    use std::collections::BTreeSet;

    #[test]
    fn settings_from_config_cap_the_question_queue() {
        let config = JournalConfig {
            max_pending_questions: 5,
            ..Default::default()
        };
        let settings = JournalSettings::from(&config);

        let queue = settings
            .evaluator
            .evaluate(&StructuredRecord::new(), &BTreeSet::new());
        assert_eq!(queue.len(), MAX_PENDING_QUESTIONS);
    }

    #[test]
    fn settings_from_config_use_configured_negations() {
        let config = JournalConfig {
            negation_tokens: Some("пас".to_string()),
            ..Default::default()
        };
        let settings = JournalSettings::from(&config);
        assert!(settings.parser.is_decline("ПАС"));
        assert!(!settings.parser.is_decline("нет"));
    }
}
