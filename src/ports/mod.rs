//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the journal and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - chat completions
//! - `RecordExtractor` - narration into a record candidate
//! - `TaskInterpreter` - task description into a task card
//! - `Transcriber` - speech to text
//! - `SessionStore` - session snapshots

mod ai_provider;
mod record_extractor;
mod session_store;
mod task_interpreter;
mod transcriber;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, RequestMetadata, TokenUsage,
};
pub use record_extractor::{ExtractionError, RecordExtractor};
pub use session_store::{SessionStore, SessionStoreError};
pub use task_interpreter::TaskInterpreter;
pub use transcriber::{AudioClip, Transcriber, TranscriptionError};
