//! Merge of a fresh extraction candidate into an existing record.
//!
//! Log entries accumulate, scalars are overridden only by non-empty
//! candidate values, and action points are cumulative.

use super::record::StructuredRecord;

/// Combines `candidate` into `existing`, producing a new record.
pub fn merge(existing: &StructuredRecord, candidate: &StructuredRecord) -> StructuredRecord {
    let mut merged = existing.clone();

    merged.extend_day_log(candidate.day_log().iter().cloned());

    if !candidate.three_wins().is_empty() {
        merged.set_three_wins(candidate.three_wins().iter().cloned());
    }
    if !candidate.feelings().trim().is_empty() {
        merged.set_feelings(candidate.feelings());
    }
    if !candidate.story_worthy().trim().is_empty() {
        merged.set_story_worthy(candidate.story_worthy());
    }
    if candidate.adhd_score() != 0 {
        // Both scores are in range by construction.
        let _ = merged.set_adhd_score(candidate.adhd_score());
    }

    merged.set_action_points(existing.action_points().union(candidate.action_points()));
    merged
}
