//! Speech Adapters
//!
//! Implementations of the Transcriber port.

mod whisper_transcriber;

pub use whisper_transcriber::{WhisperConfig, WhisperTranscriber};
