//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers and error types
//! that form the vocabulary of the journal domain.

mod day_key;
mod errors;
mod ids;
mod timestamp;

pub use day_key::DayKey;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{ConversationId, RequestId};
pub use timestamp::Timestamp;
