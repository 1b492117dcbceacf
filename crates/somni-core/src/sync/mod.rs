//! Sleep record sync client for the managed record store.
//!
//! Wire contract (one canonical schema for both directions):
//! - `POST {endpoint}` with `{"date": "yyyy-MM-dd", "deep_sleep_minutes": n,
//!   "light_sleep_minutes": n}` and `Content-Type: application/json;
//!   charset=utf-8`; any 2xx is success.
//! - `GET {endpoint}?date=yyyy-MM-dd` answers with the same duration fields
//!   (integers, or numeric strings from older server builds); a missing
//!   record is HTTP 404 or `{"not_found": true}`.
//!
//! The client holds no state between calls and never retries, caches, or
//! logs; every terminal path yields exactly one typed outcome to the caller.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::models::{DateKey, SleepObservation};

/// Discriminated outcome of a fetch call.
///
/// `NotFound` and `Malformed` are kept apart so callers can tell "no data
/// stored" from "data stored but unreadable".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncResult {
    /// A record exists for the date key with well-formed durations.
    Found {
        deep_sleep_minutes: u32,
        light_sleep_minutes: u32,
    },
    /// The store has no record for the date key.
    NotFound,
    /// A record came back but its duration fields could not be coerced to
    /// non-negative integers. Carries the raw body for diagnosis.
    Malformed { body: String },
    /// The request failed at the HTTP or transport layer.
    Transport { detail: String },
}

/// Outbound record payload.
#[derive(Debug, Serialize)]
struct SleepRecordPayload<'a> {
    date: &'a str,
    deep_sleep_minutes: u32,
    light_sleep_minutes: u32,
}

/// Tolerant inbound record shape.
///
/// Duration fields stay as raw JSON values because servers have answered
/// with both integers and numeric strings; coercion happens explicitly in
/// `classify_record_body`, never by silent defaulting.
#[derive(Debug, Deserialize)]
struct SleepRecordResponse {
    #[serde(default)]
    not_found: Option<bool>,
    #[serde(default)]
    deep_sleep_minutes: Option<Value>,
    #[serde(default)]
    light_sleep_minutes: Option<Value>,
}

/// HTTP client for the sleep record store.
///
/// Cheap to clone; the inner `reqwest::Client` shares one connection pool
/// across clones and is safe for concurrent calls without locking.
#[derive(Debug, Clone)]
pub struct SleepSyncClient {
    endpoint: String,
    client: reqwest::Client,
}

impl SleepSyncClient {
    /// Build a client from config.
    ///
    /// Normalizes the endpoint and installs finite connect/request timeouts
    /// on the shared HTTP client.
    pub fn new(config: &SyncConfig) -> Result<Self, SyncError> {
        let endpoint = normalize_endpoint(&config.endpoint)?;
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|error| SyncError::Transport(error.to_string()))?;
        Ok(Self { endpoint, client })
    }

    /// POST one observation to the record store.
    ///
    /// The store overwrites by date key, so repeating a submit with the same
    /// observation is safe. No retry on failure.
    pub async fn submit(&self, observation: &SleepObservation) -> Result<(), SyncError> {
        let payload = SleepRecordPayload {
            date: observation.date.as_str(),
            deep_sleep_minutes: observation.deep_sleep_minutes,
            light_sleep_minutes: observation.light_sleep_minutes,
        };
        let body = serde_json::to_string(&payload)
            .map_err(|error| SyncError::Validation(error.to_string()))?;

        let response = self
            .client
            .post(&self.endpoint)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/json; charset=utf-8",
            )
            .body(body)
            .send()
            .await
            .map_err(|error| SyncError::Transport(error.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(SyncError::Status(status.as_u16()))
        }
    }

    /// Validate untrusted input and submit it.
    ///
    /// Fails with `SyncError::Validation` before any network call when the
    /// date key or either duration is invalid.
    pub async fn submit_raw(
        &self,
        date: &str,
        deep_sleep_minutes: i64,
        light_sleep_minutes: i64,
    ) -> Result<(), SyncError> {
        let observation =
            SleepObservation::from_raw(date, deep_sleep_minutes, light_sleep_minutes)?;
        self.submit(&observation).await
    }

    /// GET the stored record for a date key.
    ///
    /// An invalid date key fails fast with `SyncError::Validation`; every
    /// post-validation outcome, transport failures included, is folded into
    /// `SyncResult` so the caller always sees one discriminated answer.
    pub async fn fetch(&self, date_key: &str) -> Result<SyncResult, SyncError> {
        let date = DateKey::parse(date_key)?;

        let response = match self
            .client
            .get(&self.endpoint)
            .query(&[("date", date.as_str())])
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
        {
            Ok(response) => response,
            Err(error) => {
                return Ok(SyncResult::Transport {
                    detail: error.to_string(),
                })
            }
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(SyncResult::NotFound);
        }
        if !status.is_success() {
            return Ok(SyncResult::Transport {
                detail: format!("HTTP {}", status.as_u16()),
            });
        }

        match response.text().await {
            Ok(body) => Ok(classify_record_body(&body)),
            Err(error) => Ok(SyncResult::Transport {
                detail: error.to_string(),
            }),
        }
    }
}

/// Classify a 2xx response body into a fetch outcome.
fn classify_record_body(body: &str) -> SyncResult {
    let Ok(record) = serde_json::from_str::<SleepRecordResponse>(body) else {
        return SyncResult::Malformed {
            body: body.to_string(),
        };
    };

    if record.not_found == Some(true) {
        return SyncResult::NotFound;
    }

    let deep = coerce_minutes(record.deep_sleep_minutes.as_ref());
    let light = coerce_minutes(record.light_sleep_minutes.as_ref());
    match (deep, light) {
        (Some(deep_sleep_minutes), Some(light_sleep_minutes)) => SyncResult::Found {
            deep_sleep_minutes,
            light_sleep_minutes,
        },
        _ => SyncResult::Malformed {
            body: body.to_string(),
        },
    }
}

/// Coerce a duration field that may arrive as an integer or a numeric
/// string. Missing, negative, fractional, or non-numeric values do not
/// coerce.
fn coerce_minutes(value: Option<&Value>) -> Option<u32> {
    match value? {
        Value::Number(number) => number.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(text) => text.trim().parse::<u32>().ok(),
        _ => None,
    }
}

fn normalize_endpoint(raw: &str) -> Result<String, SyncError> {
    let endpoint = raw.trim();
    if endpoint.is_empty() {
        return Err(SyncError::Validation(
            "endpoint must not be empty".to_string(),
        ));
    }
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        Ok(endpoint.trim_end_matches('/').to_string())
    } else {
        Err(SyncError::Validation(
            "endpoint must include http:// or https://".to_string(),
        ))
    }
}
