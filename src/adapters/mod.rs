//! Adapters - Implementations of port interfaces.
//!
//! - `ai` - OpenAI chat completions, record extraction, task cards
//! - `speech` - Whisper transcription
//! - `storage` - session snapshots (in-memory, YAML files)
//! - `http` - REST API

pub mod ai;
pub mod http;
pub mod speech;
pub mod storage;
