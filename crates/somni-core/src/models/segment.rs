//! Raw sleep-segment samples and aggregation into daily totals

use serde::{Deserialize, Serialize};

use crate::error::SyncError;

use super::{DateKey, SleepObservation};

const MILLIS_PER_MINUTE: i64 = 60_000;

/// Sleep stage of a segment, using the wearable health API's numeric codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepStage {
    Awake,
    Sleep,
    OutOfBed,
    LightSleep,
    DeepSleep,
    Rem,
}

impl SleepStage {
    /// Map a numeric stage code reported by the health API.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Awake),
            2 => Some(Self::Sleep),
            3 => Some(Self::OutOfBed),
            4 => Some(Self::LightSleep),
            5 => Some(Self::DeepSleep),
            6 => Some(Self::Rem),
            _ => None,
        }
    }

    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Self::Awake => 1,
            Self::Sleep => 2,
            Self::OutOfBed => 3,
            Self::LightSleep => 4,
            Self::DeepSleep => 5,
            Self::Rem => 6,
        }
    }
}

/// One contiguous sleep segment with Unix-ms bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepSegment {
    /// Segment start (Unix ms)
    pub start_ms: i64,
    /// Segment end (Unix ms), must not precede the start
    pub end_ms: i64,
    pub stage: SleepStage,
}

impl SleepSegment {
    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        self.end_ms.saturating_sub(self.start_ms)
    }
}

/// Sum light and deep stage time into a submittable observation.
///
/// Segments in other stages (awake, REM, generic sleep, out of bed) do not
/// count toward either total. Per-stage totals are truncated to whole
/// minutes after summing, so sub-minute segments still accumulate.
pub fn aggregate_segments(
    date: DateKey,
    segments: &[SleepSegment],
) -> Result<SleepObservation, SyncError> {
    let mut deep_ms: i64 = 0;
    let mut light_ms: i64 = 0;

    for segment in segments {
        if segment.end_ms < segment.start_ms {
            return Err(SyncError::Validation(format!(
                "segment end {} precedes start {}",
                segment.end_ms, segment.start_ms
            )));
        }
        match segment.stage {
            SleepStage::DeepSleep => deep_ms += segment.duration_ms(),
            SleepStage::LightSleep => light_ms += segment.duration_ms(),
            _ => {}
        }
    }

    Ok(SleepObservation::new(
        date,
        total_minutes("deep sleep", deep_ms)?,
        total_minutes("light sleep", light_ms)?,
    ))
}

fn total_minutes(label: &'static str, total_ms: i64) -> Result<u32, SyncError> {
    u32::try_from(total_ms / MILLIS_PER_MINUTE)
        .map_err(|_| SyncError::Validation(format!("{label} total exceeds representable minutes")))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn segment(start_min: i64, end_min: i64, stage: SleepStage) -> SleepSegment {
        SleepSegment {
            start_ms: start_min * MILLIS_PER_MINUTE,
            end_ms: end_min * MILLIS_PER_MINUTE,
            stage,
        }
    }

    fn date() -> DateKey {
        DateKey::parse("2025-11-03").unwrap()
    }

    #[test]
    fn stage_codes_round_trip() {
        for code in 1..=6 {
            let stage = SleepStage::from_code(code).unwrap();
            assert_eq!(stage.code(), code);
        }
        assert_eq!(SleepStage::from_code(0), None);
        assert_eq!(SleepStage::from_code(7), None);
    }

    #[test]
    fn aggregate_sums_light_and_deep_separately() {
        let segments = vec![
            segment(0, 40, SleepStage::LightSleep),
            segment(40, 70, SleepStage::DeepSleep),
            segment(70, 75, SleepStage::Awake),
            segment(75, 130, SleepStage::LightSleep),
            segment(130, 145, SleepStage::Rem),
        ];
        let observation = aggregate_segments(date(), &segments).unwrap();
        assert_eq!(observation.deep_sleep_minutes, 30);
        assert_eq!(observation.light_sleep_minutes, 95);
    }

    #[test]
    fn aggregate_of_no_segments_is_zero() {
        let observation = aggregate_segments(date(), &[]).unwrap();
        assert_eq!(observation.deep_sleep_minutes, 0);
        assert_eq!(observation.light_sleep_minutes, 0);
    }

    #[test]
    fn sub_minute_segments_accumulate_before_truncation() {
        // Two 45-second deep segments: 90 s total, 1 whole minute.
        let segments = vec![
            SleepSegment {
                start_ms: 0,
                end_ms: 45_000,
                stage: SleepStage::DeepSleep,
            },
            SleepSegment {
                start_ms: 60_000,
                end_ms: 105_000,
                stage: SleepStage::DeepSleep,
            },
        ];
        let observation = aggregate_segments(date(), &segments).unwrap();
        assert_eq!(observation.deep_sleep_minutes, 1);
    }

    #[test]
    fn aggregate_rejects_inverted_segment() {
        let segments = vec![segment(50, 10, SleepStage::DeepSleep)];
        let error = aggregate_segments(date(), &segments).unwrap_err();
        assert!(matches!(error, SyncError::Validation(_)));
    }

    #[test]
    fn segment_deserializes_from_snake_case_stage() {
        let segment: SleepSegment =
            serde_json::from_str(r#"{"start_ms":0,"end_ms":60000,"stage":"deep_sleep"}"#).unwrap();
        assert_eq!(segment.stage, SleepStage::DeepSleep);
    }
}
