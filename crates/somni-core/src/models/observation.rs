//! Sleep observation value object

use serde::{Deserialize, Serialize};

use crate::error::SyncError;

use super::DateKey;

/// A single date-keyed record of deep and light sleep minutes.
///
/// Immutable once constructed; a new submission builds a new value rather
/// than mutating a prior one. Unsigned fields make the non-negativity
/// invariant structural.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepObservation {
    pub date: DateKey,
    pub deep_sleep_minutes: u32,
    pub light_sleep_minutes: u32,
}

impl SleepObservation {
    #[must_use]
    pub fn new(date: DateKey, deep_sleep_minutes: u32, light_sleep_minutes: u32) -> Self {
        Self {
            date,
            deep_sleep_minutes,
            light_sleep_minutes,
        }
    }

    /// Validate untrusted caller input into an observation.
    ///
    /// Fails when the date key does not normalize or either duration is
    /// negative, without any other side effect.
    pub fn from_raw(
        date: &str,
        deep_sleep_minutes: i64,
        light_sleep_minutes: i64,
    ) -> Result<Self, SyncError> {
        let date = DateKey::parse(date)?;
        let deep = validate_minutes("deep_sleep_minutes", deep_sleep_minutes)?;
        let light = validate_minutes("light_sleep_minutes", light_sleep_minutes)?;
        Ok(Self::new(date, deep, light))
    }
}

fn validate_minutes(field: &'static str, value: i64) -> Result<u32, SyncError> {
    u32::try_from(value).map_err(|_| {
        SyncError::Validation(format!(
            "{field} must be a non-negative integer, got {value}"
        ))
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn from_raw_accepts_valid_input() {
        let observation = SleepObservation::from_raw("2025-11-03", 95, 210).unwrap();
        assert_eq!(observation.date.as_str(), "2025-11-03");
        assert_eq!(observation.deep_sleep_minutes, 95);
        assert_eq!(observation.light_sleep_minutes, 210);
    }

    #[test]
    fn from_raw_normalizes_compact_date() {
        let observation = SleepObservation::from_raw("20251103", 0, 0).unwrap();
        assert_eq!(observation.date.as_str(), "2025-11-03");
    }

    #[test]
    fn from_raw_rejects_negative_deep_minutes() {
        let error = SleepObservation::from_raw("2025-11-03", -1, 210).unwrap_err();
        assert!(matches!(error, SyncError::Validation(_)));
        assert!(error.to_string().contains("deep_sleep_minutes"));
    }

    #[test]
    fn from_raw_rejects_negative_light_minutes() {
        let error = SleepObservation::from_raw("2025-11-03", 95, -30).unwrap_err();
        assert!(matches!(error, SyncError::Validation(_)));
    }

    #[test]
    fn from_raw_rejects_empty_date() {
        let error = SleepObservation::from_raw("", 95, 210).unwrap_err();
        assert!(matches!(error, SyncError::Validation(_)));
    }
}
