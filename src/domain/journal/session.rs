//! Per-conversation dialogue session.
//!
//! A [`JournalSession`] owns the record for one conversation and one day and
//! drives the question/answer loop. It is a plain value: exclusive access is
//! the caller's job (see the application-level session registry).

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::domain::foundation::{DayKey, Timestamp};

use super::answer::{AnswerOutcome, AnswerParser};
use super::completeness::{CompletenessEvaluator, PendingQuestion};
use super::field::FieldId;
use super::merge::merge;
use super::record::StructuredRecord;

/// Where the dialogue stands.
///
/// `New` and `Complete` send the next message to extraction;
/// `AwaitingClarification` sends it to the answer parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "field")]
pub enum DialogueState {
    /// No record yet this day.
    #[default]
    New,
    /// Waiting for an answer about one field.
    AwaitingClarification(FieldId),
    /// Nothing left to ask.
    Complete,
}

impl DialogueState {
    /// The field the next message answers, if any.
    pub fn awaiting_field(&self) -> Option<FieldId> {
        match self {
            DialogueState::AwaitingClarification(field) => Some(*field),
            _ => None,
        }
    }
}

/// What a conversation is currently being used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogueMode {
    /// Daily journal slot-filling.
    #[default]
    Journal,
    /// One-shot task understanding; leaves the journal alone.
    Task,
}

/// How the last answer was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerKind {
    Applied,
    Declined,
    Unparsed,
}

/// The answer half of a turn, when the message was an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnsweredField {
    pub field: FieldId,
    pub kind: AnswerKind,
}

/// What the dialogue wants to say next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogueStep {
    /// Ask the pending questions; the next message answers `awaiting`.
    Clarify {
        awaiting: FieldId,
        questions: Vec<PendingQuestion>,
    },
    /// The record is ready to render.
    Complete(StructuredRecord),
}

/// Result of processing one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub answered: Option<AnsweredField>,
    pub step: DialogueStep,
}

/// Dialogue state for one conversation and one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalSession {
    /// Identity of this session instance; every reset gets a new one.
    #[serde(default = "Uuid::new_v4")]
    epoch: Uuid,
    day_key: DayKey,
    #[serde(default)]
    mode: DialogueMode,
    #[serde(default)]
    state: DialogueState,
    #[serde(default)]
    record: Option<StructuredRecord>,
    #[serde(default)]
    pending: Vec<FieldId>,
    #[serde(default)]
    declined: BTreeSet<FieldId>,
    /// Fields answered this round that are still missing (unparsed replies,
    /// a literal zero score). Skipped until the next extraction.
    #[serde(default)]
    deferred: BTreeSet<FieldId>,
    updated_at: Timestamp,
}

impl JournalSession {
    /// Fresh session for a day.
    pub fn new(day_key: DayKey) -> Self {
        Self {
            epoch: Uuid::new_v4(),
            day_key,
            mode: DialogueMode::default(),
            state: DialogueState::New,
            record: None,
            pending: Vec::new(),
            declined: BTreeSet::new(),
            deferred: BTreeSet::new(),
            updated_at: Timestamp::now(),
        }
    }

    pub fn day_key(&self) -> DayKey {
        self.day_key
    }

    /// Changes whenever the session is reset, by rollover or an explicit
    /// new day. Work started against one epoch must not land in another.
    pub fn epoch(&self) -> Uuid {
        self.epoch
    }

    pub fn mode(&self) -> DialogueMode {
        self.mode
    }

    pub fn state(&self) -> DialogueState {
        self.state
    }

    pub fn awaiting_field(&self) -> Option<FieldId> {
        self.state.awaiting_field()
    }

    /// The record, if one has been extracted this day.
    pub fn record(&self) -> Option<&StructuredRecord> {
        self.record.as_ref()
    }

    /// The record when it holds anything worth showing.
    pub fn summary(&self) -> Option<&StructuredRecord> {
        self.record.as_ref().filter(|r| !r.is_empty())
    }

    pub fn pending_questions(&self) -> Vec<PendingQuestion> {
        self.pending.iter().copied().map(PendingQuestion::from).collect()
    }

    pub fn declined_fields(&self) -> &BTreeSet<FieldId> {
        &self.declined
    }

    pub fn deferred_fields(&self) -> &BTreeSet<FieldId> {
        &self.deferred
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    pub fn set_mode(&mut self, mode: DialogueMode) {
        self.mode = mode;
        self.touch();
    }

    /// Replaces the session with a fresh one when `today` differs from the
    /// session's day. The mode survives. Returns true when a reset happened.
    pub fn roll_over(&mut self, today: DayKey) -> bool {
        if self.day_key == today {
            return false;
        }
        let mode = self.mode;
        *self = JournalSession::new(today);
        self.mode = mode;
        true
    }

    /// Explicit "start new day": everything goes, including the mode.
    pub fn start_new_day(&mut self, day_key: DayKey) {
        *self = JournalSession::new(day_key);
    }

    /// Handles `reply` as an answer to the awaited field.
    ///
    /// Returns `None` without touching anything when no field is awaited;
    /// the caller should route the message to extraction instead.
    pub fn answer(
        &mut self,
        reply: &str,
        parser: &AnswerParser,
        evaluator: &CompletenessEvaluator,
    ) -> Option<Turn> {
        let field = self.awaiting_field()?;
        let record = self.record.get_or_insert_with(StructuredRecord::new);

        let kind = match parser.parse(field, reply) {
            AnswerOutcome::Declined => {
                self.declined.insert(field);
                AnswerKind::Declined
            }
            AnswerOutcome::Value(value) => {
                record.apply(value);
                if field.is_missing(record) {
                    self.deferred.insert(field);
                }
                AnswerKind::Applied
            }
            AnswerOutcome::Unparsed => {
                self.deferred.insert(field);
                AnswerKind::Unparsed
            }
        };

        let step = self.advance(evaluator);
        // The answered field is filled, declined or deferred by now.
        debug_assert_ne!(self.state, DialogueState::AwaitingClarification(field));
        Some(Turn {
            answered: Some(AnsweredField { field, kind }),
            step,
        })
    }

    /// Folds a fresh extraction candidate into the session.
    pub fn apply_extraction(
        &mut self,
        candidate: StructuredRecord,
        evaluator: &CompletenessEvaluator,
    ) -> Turn {
        self.record = Some(match self.record.take() {
            Some(existing) => merge(&existing, &candidate),
            None => candidate,
        });
        self.deferred.clear();

        Turn {
            answered: None,
            step: self.advance(evaluator),
        }
    }

    fn advance(&mut self, evaluator: &CompletenessEvaluator) -> DialogueStep {
        let record = self.record.clone().unwrap_or_default();
        let excluded: BTreeSet<FieldId> = self.declined.union(&self.deferred).copied().collect();
        let questions = evaluator.evaluate(&record, &excluded);
        self.pending = questions.iter().map(|q| q.field).collect();

        let (next, step) = match questions.first() {
            Some(first) => (
                DialogueState::AwaitingClarification(first.field),
                DialogueStep::Clarify {
                    awaiting: first.field,
                    questions,
                },
            ),
            None => (DialogueState::Complete, DialogueStep::Complete(record)),
        };

        self.state = next;
        self.touch();
        step
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}
