//! Field catalog - the slots the dialogue can ask about.
//!
//! The catalog is the single source of truth for each slot's question and
//! emptiness predicate. Nothing else maps question text back to a field.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::record::StructuredRecord;

/// A record slot eligible for follow-up questions.
///
/// Action points are deliberately absent: they are never asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    DayLog,
    Feelings,
    ThreeWins,
    StoryWorthy,
    #[serde(rename = "adhd_score")]
    AdhdScore,
}

impl FieldId {
    /// All fields in the fixed question order.
    pub const ALL: [FieldId; 5] = [
        FieldId::DayLog,
        FieldId::Feelings,
        FieldId::ThreeWins,
        FieldId::StoryWorthy,
        FieldId::AdhdScore,
    ];

    /// The canonical clarifying question for this field.
    pub fn question(&self) -> &'static str {
        FieldCatalog::spec(*self).question
    }

    /// True when the record has no usable value for this field.
    pub fn is_missing(&self, record: &StructuredRecord) -> bool {
        (FieldCatalog::spec(*self).is_missing)(record)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldId::DayLog => "day_log",
            FieldId::Feelings => "feelings",
            FieldId::ThreeWins => "three_wins",
            FieldId::StoryWorthy => "story_worthy",
            FieldId::AdhdScore => "adhd_score",
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed value parsed for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Entries to append to the day log.
    DayLog(Vec<String>),
    Feelings(String),
    /// Replacement wins, at most three.
    ThreeWins(Vec<String>),
    StoryWorthy(String),
    AdhdScore(u8),
}

impl FieldValue {
    /// The field this value belongs to.
    pub fn field(&self) -> FieldId {
        match self {
            FieldValue::DayLog(_) => FieldId::DayLog,
            FieldValue::Feelings(_) => FieldId::Feelings,
            FieldValue::ThreeWins(_) => FieldId::ThreeWins,
            FieldValue::StoryWorthy(_) => FieldId::StoryWorthy,
            FieldValue::AdhdScore(_) => FieldId::AdhdScore,
        }
    }
}

/// Catalog entry for one field.
#[derive(Debug)]
pub struct FieldSpec {
    pub id: FieldId,
    pub question: &'static str,
    is_missing: fn(&StructuredRecord) -> bool,
}

static CATALOG: [FieldSpec; 5] = [
    FieldSpec {
        id: FieldId::DayLog,
        question: "Что происходило сегодня? Перечисли главные события дня.",
        is_missing: |r| r.day_log().is_empty(),
    },
    FieldSpec {
        id: FieldId::Feelings,
        question: "Как ты себя чувствовал(а) сегодня?",
        is_missing: |r| r.feelings().trim().is_empty(),
    },
    FieldSpec {
        id: FieldId::ThreeWins,
        question: "Назови три победы дня (через запятую).",
        is_missing: |r| r.three_wins().is_empty(),
    },
    FieldSpec {
        id: FieldId::StoryWorthy,
        question: "Какой момент дня стоит запомнить как историю?",
        is_missing: |r| r.story_worthy().trim().is_empty(),
    },
    FieldSpec {
        id: FieldId::AdhdScore,
        question: "Оцени уровень СДВГ за день от 0 до 100.",
        is_missing: |r| r.adhd_score() == 0,
    },
];

/// Read-only access to the static field table.
pub struct FieldCatalog;

impl FieldCatalog {
    /// All entries, in question order.
    pub fn entries() -> &'static [FieldSpec] {
        &CATALOG
    }

    /// Entry for a single field.
    pub fn spec(id: FieldId) -> &'static FieldSpec {
        // CATALOG is declared in FieldId::ALL order.
        &CATALOG[id as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_order_matches_declared_order() {
        let ids: Vec<FieldId> = FieldCatalog::entries().iter().map(|s| s.id).collect();
        assert_eq!(ids, FieldId::ALL.to_vec());
    }

    #[test]
    fn spec_lookup_returns_matching_entry() {
        for id in FieldId::ALL {
            assert_eq!(FieldCatalog::spec(id).id, id);
        }
    }

    #[test]
    fn every_field_has_a_distinct_question() {
        let mut questions: Vec<&str> = FieldId::ALL.iter().map(|f| f.question()).collect();
        questions.sort();
        questions.dedup();
        assert_eq!(questions.len(), FieldId::ALL.len());
    }

    #[test]
    fn empty_record_is_missing_everything() {
        let record = StructuredRecord::new();
        assert!(FieldId::ALL.iter().all(|f| f.is_missing(&record)));
    }

    #[test]
    fn filled_record_is_missing_nothing() {
        let record = StructuredRecord::new()
            .with_day_log(["работа"])
            .with_feelings("спокойно")
            .with_three_wins(["зал"])
            .with_story_worthy("кот открыл дверь")
            .with_adhd_score(30);
        assert!(FieldId::ALL.iter().all(|f| !f.is_missing(&record)));
    }

    #[test]
    fn zero_score_counts_as_missing() {
        let record = StructuredRecord::new().with_adhd_score(0);
        assert!(FieldId::AdhdScore.is_missing(&record));
    }

    #[test]
    fn field_ids_serialize_snake_case() {
        assert_eq!(serde_json::to_string(&FieldId::ThreeWins).unwrap(), "\"three_wins\"");
        assert_eq!(serde_json::to_string(&FieldId::AdhdScore).unwrap(), "\"adhd_score\"");
        for id in FieldId::ALL {
            assert_eq!(serde_json::to_string(&id).unwrap(), format!("\"{}\"", id));
        }
    }

    #[test]
    fn values_know_their_field() {
        assert_eq!(FieldValue::AdhdScore(5).field(), FieldId::AdhdScore);
        assert_eq!(FieldValue::DayLog(vec![]).field(), FieldId::DayLog);
    }
}
