//! HTTP adapter for journal endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    DayQuery, ErrorResponse, HealthResponse, MessageRequest, MessageResponse, ModeResponse,
    NewDayResponse, ReplyKind, SetModeRequest, SummaryResponse, VoiceResponse,
};
pub use handlers::{health, JournalHandlers};
pub use routes::journal_routes;
