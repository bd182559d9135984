//! The logical journal day a session belongs to.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Calendar day key, rendered as `YYYY-MM-DD`.
///
/// Sessions are scoped to one key; a different key means a fresh session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DayKey(NaiveDate);

impl DayKey {
    /// Day key for the local calendar date right now.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// Creates a key from a calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Returns the calendar date.
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// The following calendar day.
    pub fn next(&self) -> Self {
        Self(self.0.succ_opt().unwrap_or(self.0))
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DayKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Self)
            .map_err(|e| ValidationError::invalid_format("day_key", e.to_string()))
    }
}

impl TryFrom<String> for DayKey {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DayKey> for String {
    fn from(key: DayKey) -> Self {
        key.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_dates() {
        let key: DayKey = "2024-03-09".parse().unwrap();
        assert_eq!(key.to_string(), "2024-03-09");
    }

    #[test]
    fn rejects_garbage() {
        let result = "yesterday".parse::<DayKey>();
        assert!(matches!(result, Err(ValidationError::InvalidFormat { .. })));
    }

    #[test]
    fn next_crosses_month_boundary() {
        let key: DayKey = "2024-02-29".parse().unwrap();
        assert_eq!(key.next().to_string(), "2024-03-01");
    }

    #[test]
    fn orders_chronologically() {
        let a: DayKey = "2024-01-31".parse().unwrap();
        assert!(a < a.next());
    }

    #[test]
    fn serializes_as_plain_string() {
        let key: DayKey = "2024-05-01".parse().unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"2024-05-01\"");
        let back: DayKey = serde_json::from_str("\"2024-05-01\"").unwrap();
        assert_eq!(back, key);
    }
}
