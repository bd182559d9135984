//! Daily Journal - slot-filling dialogue over a structured daily record.
//!
//! Free-form narration (text or voice) is extracted into a fixed set of
//! journal fields; missing fields are clarified one question at a time until
//! the record is complete and can be rendered for a notes page.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
