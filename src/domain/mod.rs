//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, day keys, errors, state machine)
//! - `journal` - Record, field catalog, completeness, answers, dialogue session

pub mod foundation;
pub mod journal;
