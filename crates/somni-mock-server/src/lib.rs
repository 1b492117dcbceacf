//! In-memory implementation of the Somni record store wire contract.
//!
//! Keeps one raw JSON record per date key and overwrites on resubmission,
//! matching the remote store's by-key semantics. Test-only behavior knobs
//! cover the contract's edge cases: both not-found signaling conventions,
//! forced error statuses, and delayed responses for timeout coverage. The
//! store is also seedable with arbitrary JSON so tests can serve malformed
//! records the submit path would never produce.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::RwLock;

/// How the server signals a missing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotFoundSignal {
    /// Plain HTTP 404.
    #[default]
    Http404,
    /// HTTP 200 with `{"not_found": true}` in the body.
    SoftBody,
}

/// Behavior knobs for fault injection.
#[derive(Debug, Clone, Copy, Default)]
pub struct Behavior {
    pub not_found: NotFoundSignal,
    /// Answer every request with this status and an empty body.
    pub force_status: Option<u16>,
    /// Sleep before answering, to exercise client timeouts.
    pub response_delay: Option<Duration>,
}

/// Shared store: records by date key, plus a request counter so tests can
/// assert that a client call never reached the network.
#[derive(Debug, Default)]
pub struct Store {
    pub records: RwLock<HashMap<String, Value>>,
    pub hits: AtomicU64,
}

impl Store {
    /// Seed a raw record, bypassing submit validation.
    pub async fn seed(&self, date: &str, record: Value) {
        self.records.write().await.insert(date.to_string(), record);
    }

    #[must_use]
    pub fn hit_count(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }
}

pub type SharedStore = Arc<Store>;

#[derive(Clone)]
struct AppState {
    store: SharedStore,
    behavior: Behavior,
}

#[derive(Debug, Deserialize)]
struct SubmitRecord {
    date: String,
    deep_sleep_minutes: u32,
    light_sleep_minutes: u32,
}

#[derive(Debug, Deserialize)]
struct FetchQuery {
    date: String,
}

/// Build the record store router over a shared store.
pub fn app(store: SharedStore, behavior: Behavior) -> Router {
    Router::new()
        .route("/", get(fetch_record).post(submit_record))
        .with_state(AppState { store, behavior })
}

/// Serve the record store on an already-bound listener.
pub async fn serve(
    listener: TcpListener,
    store: SharedStore,
    behavior: Behavior,
) -> Result<(), std::io::Error> {
    axum::serve(listener, app(store, behavior)).await
}

async fn submit_record(
    State(state): State<AppState>,
    Json(input): Json<SubmitRecord>,
) -> Response {
    state.store.hits.fetch_add(1, Ordering::Relaxed);
    if let Some(delay) = state.behavior.response_delay {
        tokio::time::sleep(delay).await;
    }
    if let Some(status) = state.behavior.force_status {
        return forced_status(status);
    }

    tracing::debug!("storing record for {}", input.date);
    state.store.records.write().await.insert(
        input.date,
        json!({
            "deep_sleep_minutes": input.deep_sleep_minutes,
            "light_sleep_minutes": input.light_sleep_minutes,
        }),
    );
    StatusCode::OK.into_response()
}

async fn fetch_record(
    State(state): State<AppState>,
    Query(query): Query<FetchQuery>,
) -> Response {
    state.store.hits.fetch_add(1, Ordering::Relaxed);
    if let Some(delay) = state.behavior.response_delay {
        tokio::time::sleep(delay).await;
    }
    if let Some(status) = state.behavior.force_status {
        return forced_status(status);
    }

    let records = state.store.records.read().await;
    match records.get(&query.date) {
        Some(record) => Json(record.clone()).into_response(),
        None => match state.behavior.not_found {
            NotFoundSignal::Http404 => StatusCode::NOT_FOUND.into_response(),
            NotFoundSignal::SoftBody => Json(json!({ "not_found": true })).into_response(),
        },
    }
}

fn forced_status(code: u16) -> Response {
    StatusCode::from_u16(code)
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        .into_response()
}
