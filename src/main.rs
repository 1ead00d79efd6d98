//! # Deepa — Market-Data Proxy for the Bitcoin Deepa Screensaver
//!
//! ## Architecture Overview
//!
//! ```text
//!  ┌──────────────┐  simple/price (USD, LKR, 24h)  ┌──────────────────────┐
//!  │  CoinGecko   │ ◀───────────────────────────── │                      │
//!  └──────────────┘                                │   AppState           │
//!                                                  │   SnapshotCache      │
//!  ┌──────────────┐  /mempool, /blocks/tip/height  │   (TTL 180s,         │
//!  │ mempool.space│ ◀───────────────────────────── │    single-flight)    │
//!  └──────────────┘                                │                      │
//!                                                  └──────────────────────┘
//!  ┌──────────────┐   GET /snapshot                          │
//!  │  deepa-dash  │ ◀────────────────────────────────────────┘
//!  │  (terminal)  │   GET /health
//!  └──────────────┘
//! ```
//!
//! ## Environment Variables
//!
//! | Variable                | Default                            | Description                          |
//! |-------------------------|------------------------------------|--------------------------------------|
//! | `BIND_ADDR`             | `0.0.0.0:3000`                     | Address Axum listens on              |
//! | `CACHE_TTL_SECS`        | `180`                              | Max snapshot age before refresh      |
//! | `COINGECKO_URL`         | `https://api.coingecko.com/api/v3` | Price source base URL                |
//! | `MEMPOOL_URL`           | `https://mempool.space/api`        | Mempool + block-height base URL      |
//! | `UPSTREAM_TIMEOUT_SECS` | `5`                                | Per-call upstream timeout            |
//! | `SERVE_STALE_ON_ERROR`  | `false`                            | Prefer last good snapshot on failure |
//! | `RUST_LOG`              | `deepa=debug`                      | Tracing filter                       |

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cache;
mod config;
mod error;
mod models;
mod routes;
mod state;
mod upstream;

use config::Config;
use routes::build_router;
use state::build_state;

// ─── Entry Point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Load .env (optional — prod can use real env vars) ─────────────────
    dotenvy::dotenv().ok();

    // ── 2. Initialise structured logging ─────────────────────────────────────
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env()
            .add_directive("deepa=debug".parse()?)
            .add_directive("tower_http=info".parse()?))
        .init();

    info!(
        r#"

  ╔═══════════════════════════════════════════════╗
  ║        DEEPA — Bitcoin Screensaver Proxy      ║
  ║        Rust + Axum  ·  TTL Snapshot Cache     ║
  ╚═══════════════════════════════════════════════╝"#
    );

    let config = Config::from_env().context("Failed to load config")?;

    info!(
        ttl        = ?config.cache_ttl,
        coingecko  = %config.coingecko_url,
        mempool    = %config.mempool_url,
        stale_ok   = config.serve_stale_on_error,
        "Config loaded"
    );

    // ── 3. Build shared state and warm the cache ─────────────────────────────
    let state = build_state(&config);
    state.cache.refresh().await;

    // ── 4. Build the Axum router ─────────────────────────────────────────────
    let app = build_router(state);

    // ── 5. Start the server ──────────────────────────────────────────────────
    info!(addr = ?config.bind_addr, "🚀 Deepa proxy starting");

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Deepa proxy stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
