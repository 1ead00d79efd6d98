//! # routes::snapshot
//!
//! The dashboard's only data endpoint.
//!
//! ## Endpoints
//!
//! | Method | Path            | Description                                  |
//! |--------|-----------------|----------------------------------------------|
//! | GET    | `/snapshot`     | Current [`MarketSnapshot`], TTL-cached        |
//! | GET    | `/api/bitcoin`  | Same payload, legacy path for older pages    |

use axum::{extract::State, Json};

use crate::{models::MarketSnapshot, state::SharedState};

// ─── GET /snapshot ────────────────────────────────────────────────────────────

/// Always `200 OK`.  Upstream trouble shows up as fallback or default values
/// in the body, never as an error status.
///
/// ### Response
/// ```json
/// {
///   "bitcoin":     { "usd": 98500, "lkr": 29850000, "usd_24h_change": 2.5 },
///   "mempool":     { "count": 15000, "vsize": 8500000 },
///   "blockHeight": 875000
/// }
/// ```
pub async fn get_snapshot(State(state): State<SharedState>) -> Json<MarketSnapshot> {
    Json(state.cache.get().await)
}
