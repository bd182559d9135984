//! Dialogue configuration

use serde::Deserialize;
use std::time::Duration;

use crate::domain::journal::{DEFAULT_NEGATION_TOKENS, MAX_PENDING_QUESTIONS};

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct JournalConfig {
    /// How many questions one clarification round lists
    #[serde(default = "default_max_pending")]
    pub max_pending_questions: usize,

    /// Comma-separated replies meaning "skip"; the built-in list when unset
    pub negation_tokens: Option<String>,

    /// Reply length limit of the transport, in characters
    #[serde(default = "default_render_max_chars")]
    pub render_max_chars: usize,

    /// How often stale sessions are evicted, in seconds
    #[serde(default = "default_sweep_interval")]
    pub session_sweep_interval_secs: u64,
}

impl JournalConfig {
    pub fn negation_tokens(&self) -> Vec<String> {
        match self.negation_tokens.as_deref() {
            Some(list) if !list.trim().is_empty() => list
                .split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            _ => DEFAULT_NEGATION_TOKENS.iter().map(|t| t.to_string()).collect(),
        }
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.session_sweep_interval_secs.max(1))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_pending_questions == 0 || self.max_pending_questions > MAX_PENDING_QUESTIONS {
            return Err(ValidationError::InvalidPendingLimit);
        }
        if self.render_max_chars < 100 {
            return Err(ValidationError::InvalidRenderLimit);
        }
        Ok(())
    }
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            max_pending_questions: default_max_pending(),
            negation_tokens: None,
            render_max_chars: default_render_max_chars(),
            session_sweep_interval_secs: default_sweep_interval(),
        }
    }
}

fn default_max_pending() -> usize {
    MAX_PENDING_QUESTIONS
}

fn default_render_max_chars() -> usize {
    4000
}

fn default_sweep_interval() -> u64 {
    600
}
