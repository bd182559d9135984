//! Answer parsing - free-text replies into typed field values.
//!
//! Parsing never fails: input it cannot read yields [`AnswerOutcome::Unparsed`],
//! which the session treats as an ordinary outcome.

use std::collections::BTreeSet;

use super::field::{FieldId, FieldValue};
use super::record::{MAX_ADHD_SCORE, MAX_DAY_LOG_ENTRIES, MAX_THREE_WINS};

/// Replies that mean "skip this field", compared case-insensitively.
pub const DEFAULT_NEGATION_TOKENS: [&str; 6] = ["нет", "no", "-", "нету", "skip", "пропустить"];

/// Result of interpreting one reply against one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// The user chose not to answer.
    Declined,
    /// A usable value.
    Value(FieldValue),
    /// Nothing usable; the field keeps its old value.
    Unparsed,
}

/// Parses replies with a configurable set of negation tokens.
#[derive(Debug, Clone)]
pub struct AnswerParser {
    negation_tokens: BTreeSet<String>,
}

impl AnswerParser {
    /// Creates a parser with custom negation tokens.
    ///
    /// Tokens are normalised the same way replies are.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let negation_tokens = tokens
            .into_iter()
            .map(|t| normalize(t.as_ref()))
            .filter(|t| !t.is_empty())
            .collect();
        Self { negation_tokens }
    }

    /// True when the reply is one of the negation tokens.
    pub fn is_decline(&self, reply: &str) -> bool {
        self.negation_tokens.contains(&normalize(reply))
    }

    /// Interprets `reply` as an answer for `field`.
    pub fn parse(&self, field: FieldId, reply: &str) -> AnswerOutcome {
        if self.is_decline(reply) {
            return AnswerOutcome::Declined;
        }

        match field {
            FieldId::Feelings => parse_text(reply).map_or(AnswerOutcome::Declined, |text| {
                AnswerOutcome::Value(FieldValue::Feelings(text))
            }),
            FieldId::StoryWorthy => parse_text(reply).map_or(AnswerOutcome::Declined, |text| {
                AnswerOutcome::Value(FieldValue::StoryWorthy(text))
            }),
            FieldId::AdhdScore => parse_score(reply)
                .map_or(AnswerOutcome::Unparsed, |score| {
                    AnswerOutcome::Value(FieldValue::AdhdScore(score))
                }),
            FieldId::ThreeWins => {
                let wins: Vec<String> = split_fragments(reply).take(MAX_THREE_WINS).collect();
                if wins.is_empty() {
                    AnswerOutcome::Unparsed
                } else {
                    AnswerOutcome::Value(FieldValue::ThreeWins(wins))
                }
            }
            FieldId::DayLog => {
                let entries: Vec<String> = split_fragments(reply).take(MAX_DAY_LOG_ENTRIES).collect();
                if entries.is_empty() {
                    AnswerOutcome::Unparsed
                } else {
                    AnswerOutcome::Value(FieldValue::DayLog(entries))
                }
            }
        }
    }
}

impl Default for AnswerParser {
    fn default() -> Self {
        Self::new(DEFAULT_NEGATION_TOKENS)
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

fn parse_text(reply: &str) -> Option<String> {
    let text = reply.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// First run of ASCII digits, accepted only inside the score scale.
fn parse_score(reply: &str) -> Option<u8> {
    let start = reply.find(|c: char| c.is_ascii_digit())?;
    let digits: String = reply[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    let value: u32 = digits.parse().ok()?;
    u8::try_from(value).ok().filter(|v| *v <= MAX_ADHD_SCORE)
}

const FRAGMENT_TRIM: [char; 4] = ['.', ';', ',', '-'];

/// Splits a list answer on newlines and commas into clean fragments.
fn split_fragments(reply: &str) -> impl Iterator<Item = String> + '_ {
    reply
        .split(['\n', ','])
        .map(|part| part.trim_matches(|c: char| c.is_whitespace() || FRAGMENT_TRIM.contains(&c)))
        .filter(|part| !part.is_empty())
        .map(str::to_string)
}
