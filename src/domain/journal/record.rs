//! The structured daily-journal record.
//!
//! The record is the unit the dialogue assembles. Its invariants (list caps,
//! score range) are enforced by every constructor and setter, including
//! deserialization, so a record observed anywhere is always well-formed.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::foundation::ValidationError;

use super::field::FieldValue;

/// Maximum number of day-log entries kept in one record.
pub const MAX_DAY_LOG_ENTRIES: usize = 50;

/// Maximum number of wins kept in one record.
pub const MAX_THREE_WINS: usize = 3;

/// Upper bound of the ADHD score scale.
pub const MAX_ADHD_SCORE: u8 = 100;

/// Habit checkboxes tracked alongside the journal.
///
/// Never asked about; only ever filled by extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionPoints {
    #[serde(default, deserialize_with = "null_as_default")]
    pub book_read: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes_done: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rpg: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub finance: bool,
}

impl ActionPoints {
    /// Field-wise OR. A point done in either source stays done.
    pub fn union(&self, other: &ActionPoints) -> ActionPoints {
        ActionPoints {
            book_read: self.book_read || other.book_read,
            notes_done: self.notes_done || other.notes_done,
            rpg: self.rpg || other.rpg,
            finance: self.finance || other.finance,
        }
    }

    /// True when no point is checked.
    pub fn is_empty(&self) -> bool {
        !(self.book_read || self.notes_done || self.rpg || self.finance)
    }
}

/// The record being assembled for one journal day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RecordWire")]
pub struct StructuredRecord {
    day_log: Vec<String>,
    feelings: String,
    three_wins: Vec<String>,
    story_worthy: String,
    adhd_score: u8,
    action_points: ActionPoints,
}

impl StructuredRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn day_log(&self) -> &[String] {
        &self.day_log
    }

    pub fn feelings(&self) -> &str {
        &self.feelings
    }

    pub fn three_wins(&self) -> &[String] {
        &self.three_wins
    }

    pub fn story_worthy(&self) -> &str {
        &self.story_worthy
    }

    /// The ADHD score; 0 means unset.
    pub fn adhd_score(&self) -> u8 {
        self.adhd_score
    }

    pub fn action_points(&self) -> &ActionPoints {
        &self.action_points
    }

    /// Appends log entries, dropping blanks and anything past the cap.
    pub fn extend_day_log<I, S>(&mut self, entries: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for entry in entries {
            if self.day_log.len() >= MAX_DAY_LOG_ENTRIES {
                break;
            }
            let entry = entry.into();
            let entry = entry.trim();
            if !entry.is_empty() {
                self.day_log.push(entry.to_string());
            }
        }
    }

    /// Replaces the wins with at most the first three non-blank entries.
    pub fn set_three_wins<I, S>(&mut self, wins: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.three_wins = wins
            .into_iter()
            .map(Into::into)
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty())
            .take(MAX_THREE_WINS)
            .collect();
    }

    pub fn set_feelings(&mut self, feelings: impl Into<String>) {
        self.feelings = feelings.into().trim().to_string();
    }

    pub fn set_story_worthy(&mut self, story: impl Into<String>) {
        self.story_worthy = story.into().trim().to_string();
    }

    /// Sets the ADHD score, rejecting values above the scale.
    pub fn set_adhd_score(&mut self, score: u8) -> Result<(), ValidationError> {
        if score > MAX_ADHD_SCORE {
            return Err(ValidationError::out_of_range(
                "adhd_score",
                0,
                MAX_ADHD_SCORE as i64,
                score as i64,
            ));
        }
        self.adhd_score = score;
        Ok(())
    }

    pub fn set_action_points(&mut self, points: ActionPoints) {
        self.action_points = points;
    }

    /// Applies a parsed answer through the matching setter.
    ///
    /// Day-log values append; every other value replaces.
    pub fn apply(&mut self, value: FieldValue) {
        match value {
            FieldValue::DayLog(entries) => self.extend_day_log(entries),
            FieldValue::Feelings(text) => self.set_feelings(text),
            FieldValue::ThreeWins(wins) => self.set_three_wins(wins),
            FieldValue::StoryWorthy(text) => self.set_story_worthy(text),
            // Parsed scores are range-checked already; a stray one keeps the old value.
            FieldValue::AdhdScore(score) => {
                let _ = self.set_adhd_score(score);
            }
        }
    }

    /// True when nothing at all has been captured.
    pub fn is_empty(&self) -> bool {
        self.day_log.is_empty()
            && self.feelings.is_empty()
            && self.three_wins.is_empty()
            && self.story_worthy.is_empty()
            && self.adhd_score == 0
            && self.action_points.is_empty()
    }

    // Builder-style helpers, mostly for adapters and tests.

    pub fn with_day_log<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extend_day_log(entries);
        self
    }

    pub fn with_feelings(mut self, feelings: impl Into<String>) -> Self {
        self.set_feelings(feelings);
        self
    }

    pub fn with_three_wins<I, S>(mut self, wins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_three_wins(wins);
        self
    }

    pub fn with_story_worthy(mut self, story: impl Into<String>) -> Self {
        self.set_story_worthy(story);
        self
    }

    /// Out-of-range scores leave the score unset.
    pub fn with_adhd_score(mut self, score: u8) -> Self {
        let _ = self.set_adhd_score(score);
        self
    }

    pub fn with_action_points(mut self, points: ActionPoints) -> Self {
        self.action_points = points;
        self
    }
}

/// Lenient wire shape. Extraction output omits fields, sends nulls and
/// occasionally quotes numbers; all of that lands here and is normalised.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RecordWire {
    #[serde(deserialize_with = "null_as_default")]
    day_log: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    feelings: String,
    #[serde(deserialize_with = "null_as_default")]
    three_wins: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    story_worthy: String,
    #[serde(deserialize_with = "null_as_default")]
    adhd_score: Option<ScoreWire>,
    #[serde(deserialize_with = "null_as_default")]
    action_points: ActionPoints,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScoreWire {
    Int(i64),
    Float(f64),
    Text(String),
}

impl ScoreWire {
    /// Out-of-range or unreadable scores are treated as unset.
    fn into_score(self) -> u8 {
        let value = match self {
            ScoreWire::Int(v) => Some(v),
            ScoreWire::Float(v) if v.is_finite() => Some(v.round() as i64),
            ScoreWire::Float(_) => None,
            ScoreWire::Text(s) => s.trim().parse::<i64>().ok(),
        };
        match value {
            Some(v) if (0..=MAX_ADHD_SCORE as i64).contains(&v) => v as u8,
            _ => 0,
        }
    }
}

impl From<RecordWire> for StructuredRecord {
    fn from(wire: RecordWire) -> Self {
        let mut record = StructuredRecord::new();
        record.extend_day_log(wire.day_log);
        record.set_feelings(wire.feelings);
        record.set_three_wins(wire.three_wins);
        record.set_story_worthy(wire.story_worthy);
        record.adhd_score = wire.adhd_score.map(ScoreWire::into_score).unwrap_or(0);
        record.action_points = wire.action_points;
        record
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
