//! Completeness evaluation - which fields still need asking about.

use serde::Serialize;
use std::collections::BTreeSet;

use super::field::{FieldCatalog, FieldId};
use super::record::StructuredRecord;

/// Default cap on questions queued in one evaluation.
pub const MAX_PENDING_QUESTIONS: usize = 4;

/// A missing field paired with its catalog question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PendingQuestion {
    pub field: FieldId,
    pub question: &'static str,
}

impl From<FieldId> for PendingQuestion {
    fn from(field: FieldId) -> Self {
        Self {
            field,
            question: field.question(),
        }
    }
}

/// Pure evaluator producing the ordered, capped question queue.
#[derive(Debug, Clone, Copy)]
pub struct CompletenessEvaluator {
    max_pending: usize,
}

impl CompletenessEvaluator {
    /// Creates an evaluator with a custom queue cap, clamped to
    /// `1..=MAX_PENDING_QUESTIONS`.
    pub fn new(max_pending: usize) -> Self {
        Self {
            max_pending: max_pending.clamp(1, MAX_PENDING_QUESTIONS),
        }
    }

    pub fn max_pending(&self) -> usize {
        self.max_pending
    }

    /// Walks the catalog in declared order and keeps every field that is
    /// missing and not excluded, truncated to the cap.
    pub fn evaluate(
        &self,
        record: &StructuredRecord,
        excluded: &BTreeSet<FieldId>,
    ) -> Vec<PendingQuestion> {
        FieldCatalog::entries()
            .iter()
            .filter(|spec| !excluded.contains(&spec.id) && spec.id.is_missing(record))
            .take(self.max_pending)
            .map(|spec| PendingQuestion::from(spec.id))
            .collect()
    }
}

impl Default for CompletenessEvaluator {
    fn default() -> Self {
        Self::new(MAX_PENDING_QUESTIONS)
    }
}

/// Evaluates with the default cap.
pub fn evaluate(record: &StructuredRecord, declined: &BTreeSet<FieldId>) -> Vec<PendingQuestion> {
    CompletenessEvaluator::default().evaluate(record, declined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fields(queue: &[PendingQuestion]) -> Vec<FieldId> {
        queue.iter().map(|q| q.field).collect()
    }

    #[test]
    fn empty_record_queues_first_four_fields() {
        let queue = evaluate(&StructuredRecord::new(), &BTreeSet::new());
        assert_eq!(
            fields(&queue),
            vec![
                FieldId::DayLog,
                FieldId::Feelings,
                FieldId::ThreeWins,
                FieldId::StoryWorthy
            ]
        );
    }

    #[test]
    fn questions_come_from_the_catalog() {
        let queue = evaluate(&StructuredRecord::new(), &BTreeSet::new());
        for q in queue {
            assert_eq!(q.question, FieldCatalog::spec(q.field).question);
        }
    }

    #[test]
    fn declined_fields_make_room_for_later_ones() {
        let declined: BTreeSet<FieldId> = [FieldId::DayLog].into_iter().collect();
        let queue = evaluate(&StructuredRecord::new(), &declined);
        assert_eq!(
            fields(&queue),
            vec![
                FieldId::Feelings,
                FieldId::ThreeWins,
                FieldId::StoryWorthy,
                FieldId::AdhdScore
            ]
        );
    }

    #[test]
    fn complete_record_yields_empty_queue() {
        let record = StructuredRecord::new()
            .with_day_log(["a"])
            .with_feelings("b")
            .with_three_wins(["c"])
            .with_story_worthy("d")
            .with_adhd_score(1);
        assert!(evaluate(&record, &BTreeSet::new()).is_empty());
    }

    #[test]
    fn cap_never_exceeds_four() {
        let evaluator = CompletenessEvaluator::new(5);
        assert_eq!(evaluator.max_pending(), MAX_PENDING_QUESTIONS);
        let queue = evaluator.evaluate(&StructuredRecord::new(), &BTreeSet::new());
        assert_eq!(queue.len(), MAX_PENDING_QUESTIONS);
    }

    #[test]
    fn custom_cap_is_respected() {
        let queue = CompletenessEvaluator::new(2).evaluate(&StructuredRecord::new(), &BTreeSet::new());
        assert_eq!(fields(&queue), vec![FieldId::DayLog, FieldId::Feelings]);
    }

    fn arb_record() -> impl Strategy<Value = StructuredRecord> {
        (
            prop::collection::vec("[a-z]{1,6}", 0..3),
            prop::option::of("[a-z]{1,6}"),
            prop::collection::vec("[a-z]{1,6}", 0..4),
            prop::option::of("[a-z]{1,6}"),
            0u8..=100,
        )
            .prop_map(|(log, feelings, wins, story, score)| {
                StructuredRecord::new()
                    .with_day_log(log)
                    .with_feelings(feelings.unwrap_or_default())
                    .with_three_wins(wins)
                    .with_story_worthy(story.unwrap_or_default())
                    .with_adhd_score(score)
            })
    }

    fn arb_declined() -> impl Strategy<Value = BTreeSet<FieldId>> {
        prop::collection::btree_set(prop::sample::select(FieldId::ALL.to_vec()), 0..5)
    }

    proptest! {
        #[test]
        fn queue_is_ordered_capped_and_exact(record in arb_record()) {
            let queue = fields(&evaluate(&record, &BTreeSet::new()));
            let expected: Vec<FieldId> = FieldId::ALL
                .iter()
                .copied()
                .filter(|f| f.is_missing(&record))
                .take(MAX_PENDING_QUESTIONS)
                .collect();
            prop_assert!(queue.len() <= MAX_PENDING_QUESTIONS);
            prop_assert!(queue.windows(2).all(|w| w[0] < w[1]));
            prop_assert_eq!(queue, expected);
        }

        #[test]
        fn declined_fields_never_reappear(record in arb_record(), declined in arb_declined()) {
            let queue = evaluate(&record, &declined);
            prop_assert!(queue.iter().all(|q| !declined.contains(&q.field)));
        }

        #[test]
        fn evaluation_is_deterministic(record in arb_record(), declined in arb_declined()) {
            prop_assert_eq!(evaluate(&record, &declined), evaluate(&record, &declined));
        }
    }
}
