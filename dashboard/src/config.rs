//! # config — อ่าน Config จาก Environment Variables

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};

/// Where fresh numbers come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshMode {
    /// Tick every `poll_interval`; sample real fetches against the proxy.
    Poll,
    /// Live Binance ticker; block height and mempool are simulated.
    Stream,
}

impl std::fmt::Display for RefreshMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RefreshMode::Poll   => write!(f, "poll"),
            RefreshMode::Stream => write!(f, "stream"),
        }
    }
}

/// Config ทั้งหมดที่ Dashboard ต้องการ
#[derive(Debug, Clone)]
pub struct Config {
    pub mode:                   RefreshMode,
    /// Base URL of the deepa proxy.
    pub proxy_url:              String,
    pub poll_interval:          Duration,
    /// Chance per poll tick of a real fetch (0.03 ≈ one every ~33 s).
    pub real_fetch_probability: f64,
    /// How long changed digits stay highlighted.
    pub highlight:              Duration,
    pub reconnect_delay:        Duration,
    pub stream_url:             String,
    /// LKR per USD, applied to streamed USD prices.
    pub lkr_per_usd:            f64,
    /// Perturb values between real updates.
    pub simulate:               bool,
    pub fetch_timeout:          Duration,
    /// stdout belongs to the TUI, so logs go here.
    pub log_file:               PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let mode = match std::env::var("REFRESH_MODE")
            .unwrap_or_else(|_| "poll".to_string())
            .to_lowercase()
            .as_str()
        {
            "poll"   => RefreshMode::Poll,
            "stream" => RefreshMode::Stream,
            other => bail!("Unknown REFRESH_MODE: '{other}'. Use 'poll' or 'stream'"),
        };

        let real_fetch_probability: f64 = std::env::var("REAL_FETCH_PROBABILITY")
            .unwrap_or_else(|_| "0.03".to_string())
            .parse()
            .context("REAL_FETCH_PROBABILITY must be a number")?;
        if !(0.0..=1.0).contains(&real_fetch_probability) {
            bail!("REAL_FETCH_PROBABILITY must be within 0..=1, got {real_fetch_probability}");
        }

        let lkr_per_usd: f64 = std::env::var("LKR_PER_USD")
            .unwrap_or_else(|_| "303".to_string())
            .parse()
            .context("LKR_PER_USD must be a number")?;

        Ok(Self {
            mode,
            proxy_url:       std::env::var("PROXY_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string())
                .trim_end_matches('/')
                .to_string(),
            poll_interval:   Duration::from_millis(env_u64("POLL_INTERVAL_MS", 1000).max(1)),
            real_fetch_probability,
            highlight:       Duration::from_millis(env_u64("HIGHLIGHT_MS", 600)),
            reconnect_delay: Duration::from_secs(env_u64("RECONNECT_DELAY_SECS", 5)),
            stream_url:      std::env::var("STREAM_URL").unwrap_or_else(|_| {
                "wss://stream.binance.com:9443/ws/btcusdt@ticker".to_string()
            }),
            lkr_per_usd,
            simulate:        std::env::var("SIMULATE").map(|v| v != "false" && v != "0").unwrap_or(true),
            fetch_timeout:   Duration::from_secs(env_u64("FETCH_TIMEOUT_SECS", 5)),
            log_file:        std::env::var("LOG_FILE")
                .unwrap_or_else(|_| "deepa-dash.log".to_string())
                .into(),
        })
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}
