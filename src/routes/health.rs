//! # routes::health
//!
//! `GET /health` — cache status for whoever is watching the screensaver box.
//! Never calls upstream.

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::state::SharedState;

pub async fn health_check(State(state): State<SharedState>) -> impl IntoResponse {
    let entry = state.cache.peek().await;
    let stats = state.cache.stats();

    Json(json!({
        "ok":                true,
        "started_at":        state.started_at,
        "cached":            entry.is_some(),
        "cache_age_secs":    entry.map(|e| e.fetched_at.elapsed().as_secs()),
        "fetched_at":        entry.map(|e| e.fetched_at_utc),
        "ttl_secs":          state.cache.ttl().as_secs(),
        "refreshes":         stats.refreshes,
        "upstream_failures": stats.upstream_failures,
    }))
}
