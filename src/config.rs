//! # config — อ่าน Config จาก Environment Variables

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;

/// Everything the proxy needs at start-up.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// Max age of a cached snapshot before the next request refreshes it.
    pub cache_ttl: Duration,
    /// CoinGecko v3 base URL (no trailing slash).
    pub coingecko_url: String,
    /// mempool.space API base URL (no trailing slash).
    pub mempool_url: String,
    /// Per-request bound for every upstream call.
    pub upstream_timeout: Duration,
    /// On primary failure, serve the last good snapshot instead of the
    /// hardcoded fallback when one exists.
    pub serve_stale_on_error: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr = std::env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()
            .context("BIND_ADDR must be a socket address, e.g. 0.0.0.0:3000")?;

        Ok(Self {
            bind_addr,
            cache_ttl:            Duration::from_secs(env_u64("CACHE_TTL_SECS", 180)),
            coingecko_url:        env_url("COINGECKO_URL", "https://api.coingecko.com/api/v3"),
            mempool_url:          env_url("MEMPOOL_URL", "https://mempool.space/api"),
            upstream_timeout:     Duration::from_secs(env_u64("UPSTREAM_TIMEOUT_SECS", 5)),
            serve_stale_on_error: env_bool("SERVE_STALE_ON_ERROR", false),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr:            SocketAddr::from(([0, 0, 0, 0], 3000)),
            cache_ttl:            Duration::from_secs(180),
            coingecko_url:        "https://api.coingecko.com/api/v3".to_string(),
            mempool_url:          "https://mempool.space/api".to_string(),
            upstream_timeout:     Duration::from_secs(5),
            serve_stale_on_error: false,
        }
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(default)
}

fn env_url(key: &str, default: &str) -> String {
    std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .trim_end_matches('/')
        .to_string()
}
