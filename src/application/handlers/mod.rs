//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod journal;

pub use journal::{
    GetSummaryHandler, GetSummaryQuery, HandleMessageCommand, HandleMessageHandler,
    HandleVoiceCommand, HandleVoiceHandler, HandleVoiceResult, JournalError, JournalSettings,
    MessageOutcome, SessionRegistry, SetModeCommand, SetModeHandler, StartNewDayCommand,
    StartNewDayHandler, SummaryResult,
};
