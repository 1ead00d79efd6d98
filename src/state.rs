//! # state
//!
//! Shared application state injected into every Axum handler.
//!
//! The cache lives here as an explicit object rather than a module-level
//! global: one [`SnapshotCache`] per `AppState`, built once at start-up.
//! Tests build as many independent states as they like.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::cache::SnapshotCache;
use crate::config::Config;
use crate::upstream::{HttpMarketSource, MarketSource};

// ─── AppState ─────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    /// TTL-gated snapshot cache (the only mutable state in the proxy).
    pub cache: Arc<SnapshotCache>,

    /// Process start time, for `/health`.
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(cache: SnapshotCache) -> Self {
        Self {
            cache:      Arc::new(cache),
            started_at: Utc::now(),
        }
    }
}

/// Convenience type alias
pub type SharedState = Arc<AppState>;

/// Wire the real upstream sources behind a fresh cache.
///
/// reqwest Client ถูกสร้างครั้งเดียว แล้ว share (connection pooling)
pub fn build_state(config: &Config) -> SharedState {
    let source: Arc<dyn MarketSource> =
        Arc::new(HttpMarketSource::new(reqwest::Client::new(), config));

    build_state_with(source, config)
}

/// Same as [`build_state`] but over any [`MarketSource`].
pub fn build_state_with(source: Arc<dyn MarketSource>, config: &Config) -> SharedState {
    let cache = SnapshotCache::new(source, config.cache_ttl, config.serve_stale_on_error);
    Arc::new(AppState::new(cache))
}
