//! Journal domain - record model, field catalog and the dialogue loop.
//!
//! Everything here is synchronous and free of I/O. The application layer
//! supplies extraction results and user replies and decides what to persist.

mod answer;
mod completeness;
mod field;
mod merge;
mod record;
mod render;
mod session;

pub use answer::{AnswerOutcome, AnswerParser, DEFAULT_NEGATION_TOKENS};
pub use completeness::{evaluate, CompletenessEvaluator, PendingQuestion, MAX_PENDING_QUESTIONS};
pub use field::{FieldCatalog, FieldId, FieldSpec, FieldValue};
pub use merge::merge;
pub use record::{
    ActionPoints, StructuredRecord, MAX_ADHD_SCORE, MAX_DAY_LOG_ENTRIES, MAX_THREE_WINS,
};
pub use render::{truncate_chars, JournalRenderer, NotionRenderer};
pub use session::{
    AnswerKind, AnsweredField, DialogueMode, DialogueState, DialogueStep, JournalSession, Turn,
};
