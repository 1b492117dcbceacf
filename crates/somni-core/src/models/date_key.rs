//! Canonical date key for sleep records

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::SyncError;

/// Wire format for the date key (ISO-8601 calendar date).
const CANONICAL_FORMAT: &str = "%Y-%m-%d";

/// Compact form still produced by older watch builds.
const COMPACT_FORMAT: &str = "%Y%m%d";

/// A validated `yyyy-MM-dd` date key.
///
/// The record store keys records by this string, so every client path
/// normalizes to the canonical format before anything touches the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateKey(String);

impl DateKey {
    /// Parse and normalize a caller-supplied date key.
    ///
    /// Accepts the canonical `yyyy-MM-dd` form and the legacy `yyyyMMdd`
    /// compact form; everything else is rejected, including calendar-invalid
    /// dates.
    pub fn parse(raw: &str) -> Result<Self, SyncError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(SyncError::Validation(
                "date key must not be empty".to_string(),
            ));
        }

        let date = NaiveDate::parse_from_str(raw, CANONICAL_FORMAT)
            .or_else(|_| NaiveDate::parse_from_str(raw, COMPACT_FORMAT))
            .map_err(|_| SyncError::Validation(format!("invalid date key: {raw}")))?;

        Ok(Self::from_date(date))
    }

    /// Build a date key from an already-parsed calendar date.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.format(CANONICAL_FORMAT).to_string())
    }

    /// The canonical string sent over the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DateKey {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_accepts_canonical_form() {
        let key = DateKey::parse("2025-11-03").unwrap();
        assert_eq!(key.as_str(), "2025-11-03");
    }

    #[test]
    fn parse_normalizes_compact_form() {
        let key = DateKey::parse("20251103").unwrap();
        assert_eq!(key.as_str(), "2025-11-03");
    }

    #[test]
    fn parse_trims_surrounding_whitespace() {
        let key = DateKey::parse(" 2025-11-03 ").unwrap();
        assert_eq!(key.as_str(), "2025-11-03");
    }

    #[test]
    fn parse_rejects_empty_input() {
        let error = DateKey::parse("   ").unwrap_err();
        assert!(matches!(error, SyncError::Validation(_)));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(DateKey::parse("yesterday").is_err());
        assert!(DateKey::parse("2025/11/03").is_err());
    }

    #[test]
    fn parse_rejects_calendar_invalid_dates() {
        assert!(DateKey::parse("2025-02-30").is_err());
        assert!(DateKey::parse("20251340").is_err());
    }

    #[test]
    fn from_str_matches_parse() {
        let key: DateKey = "20240229".parse().unwrap();
        assert_eq!(key.to_string(), "2024-02-29");
    }

    #[test]
    fn serializes_as_plain_string() {
        let key = DateKey::parse("2025-11-03").unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"2025-11-03\"");
    }
}
