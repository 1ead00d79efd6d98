//! HTTP surface of the proxy.

pub mod health;
pub mod snapshot;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::SharedState;

/// Build the Axum router over an already-constructed state.
pub fn build_router(state: SharedState) -> Router {
    // Dashboard may be served from another origin (file://, dev server).
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // ── Dashboard data ────────────────────────────────────────────────────
        .route("/snapshot",    get(snapshot::get_snapshot))
        .route("/api/bitcoin", get(snapshot::get_snapshot))
        // ── Ops ───────────────────────────────────────────────────────────────
        .route("/health",      get(health::health_check))
        // ── Middleware ────────────────────────────────────────────────────────
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::error::UpstreamError;
    use crate::models::{BitcoinQuote, MempoolStats};
    use crate::state::build_state_with;
    use crate::upstream::MarketSource;

    struct StubSource {
        price_status: Option<StatusCode>,
        calls: AtomicUsize,
    }

    impl StubSource {
        fn new(price_status: Option<StatusCode>) -> Arc<Self> {
            Arc::new(Self { price_status, calls: AtomicUsize::new(0) })
        }
    }

    #[async_trait]
    impl MarketSource for StubSource {
        async fn fetch_quote(&self) -> Result<BitcoinQuote, UpstreamError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.price_status {
                Some(status) => Err(UpstreamError::Status { source_name: "coingecko", status }),
                None => Ok(BitcoinQuote { usd: 98_500.0, lkr: 29_850_000.0, usd_24h_change: 2.5 }),
            }
        }

        async fn fetch_mempool(&self) -> Result<MempoolStats, UpstreamError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(MempoolStats { count: 15_000, vsize: 8_500_000 })
        }

        async fn fetch_block_height(&self) -> Result<u64, UpstreamError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(875_000)
        }
    }

    fn app_over(source: &Arc<StubSource>) -> Router {
        build_router(build_state_with(source.clone(), &Config::default()))
    }

    async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn scenario_body() -> Value {
        json!({
            "bitcoin":     { "usd": 98500, "lkr": 29850000, "usd_24h_change": 2.5 },
            "mempool":     { "count": 15000, "vsize": 8500000 },
            "blockHeight": 875000,
        })
    }

    #[tokio::test]
    async fn test_snapshot_passes_upstream_values_through() {
        let source = StubSource::new(None);
        let app = app_over(&source);

        let (status, body) = get_json(&app, "/snapshot").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, scenario_body());
    }

    #[tokio::test]
    async fn test_price_source_500_still_answers_200_with_fallback() {
        let source = StubSource::new(Some(StatusCode::INTERNAL_SERVER_ERROR));
        let app = app_over(&source);

        let (status, body) = get_json(&app, "/snapshot").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, scenario_body());
        assert_eq!(body, serde_json::to_value(crate::models::FALLBACK_SNAPSHOT).unwrap());
    }

    #[tokio::test]
    async fn test_repeat_requests_within_ttl_hit_upstream_once() {
        let source = StubSource::new(None);
        let app = app_over(&source);

        get_json(&app, "/snapshot").await;
        get_json(&app, "/api/bitcoin").await;
        get_json(&app, "/snapshot").await;

        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_health_reports_cache_without_calling_upstream() {
        let source = StubSource::new(None);
        let app = app_over(&source);

        let (_, before) = get_json(&app, "/health").await;
        assert_eq!(before["cached"], json!(false));
        assert_eq!(before["ttl_secs"], json!(180));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);

        get_json(&app, "/snapshot").await;
        let (_, after) = get_json(&app, "/health").await;
        assert_eq!(after["ok"], json!(true));
        assert_eq!(after["cached"], json!(true));
        assert_eq!(after["refreshes"], json!(1));
        assert!(after["fetched_at"].is_string());
    }
}
