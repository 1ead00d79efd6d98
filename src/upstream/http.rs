//! # upstream::http
//!
//! [`HttpMarketSource`] — the real sources, CoinGecko for price and
//! mempool.space for mempool stats and tip height.
//!
//! | Source       | Request                                                                          |
//! |--------------|----------------------------------------------------------------------------------|
//! | price        | `GET {coingecko}/simple/price?ids=bitcoin&vs_currencies=usd,lkr&include_24hr_change=true` |
//! | mempool      | `GET {mempool}/mempool`                                                          |
//! | block height | `GET {mempool}/blocks/tip/height` (bare integer body)                            |

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::MarketSource;
use crate::config::Config;
use crate::error::UpstreamError;
use crate::models::{BitcoinQuote, MempoolStats};

const CLIENT_USER_AGENT: &str = "BitcoinDeepa-Screensaver/1.0";

const PRICE_SOURCE: &str = "coingecko";
const MEMPOOL_SOURCE: &str = "mempool";
const HEIGHT_SOURCE: &str = "block-height";

// ─── Wire Types ───────────────────────────────────────────────────────────────

/// `{"bitcoin": {"usd": 98500, "lkr": 29850000, "usd_24h_change": 2.5}}`
#[derive(Debug, Deserialize)]
struct SimplePriceResponse {
    bitcoin: SimplePrice,
}

#[derive(Debug, Deserialize)]
struct SimplePrice {
    usd: f64,
    lkr: f64,
    /// CoinGecko omits (or nulls) this for fresh listings; treated as 0.
    #[serde(default)]
    usd_24h_change: Option<f64>,
}

/// mempool.space returns more (`total_fee`, `fee_histogram`); only these two
/// are consumed.
#[derive(Debug, Deserialize)]
struct MempoolResponse {
    count: u64,
    vsize: u64,
}

// ─── Source ───────────────────────────────────────────────────────────────────

pub struct HttpMarketSource {
    client: reqwest::Client,
    coingecko_url: String,
    mempool_url: String,
    timeout: Duration,
}

impl HttpMarketSource {
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            coingecko_url: config.coingecko_url.clone(),
            mempool_url: config.mempool_url.clone(),
            timeout: config.upstream_timeout,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        source_name: &'static str,
        url: &str,
    ) -> Result<T, UpstreamError> {
        debug!(source = source_name, url, "Fetching upstream");

        let resp = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| UpstreamError::Transport { source_name, reason: e.to_string() })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(UpstreamError::Status { source_name, status });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| UpstreamError::Transport { source_name, reason: e.to_string() })?;

        serde_json::from_slice(&body)
            .map_err(|e| UpstreamError::Malformed { source_name, reason: e.to_string() })
    }
}

#[async_trait]
impl MarketSource for HttpMarketSource {
    async fn fetch_quote(&self) -> Result<BitcoinQuote, UpstreamError> {
        let url = format!(
            "{}/simple/price?ids=bitcoin&vs_currencies=usd,lkr&include_24hr_change=true",
            self.coingecko_url
        );
        let resp: SimplePriceResponse = self.get_json(PRICE_SOURCE, &url).await?;

        Ok(BitcoinQuote {
            usd: resp.bitcoin.usd,
            lkr: resp.bitcoin.lkr,
            usd_24h_change: resp.bitcoin.usd_24h_change.unwrap_or(0.0),
        })
    }

    async fn fetch_mempool(&self) -> Result<MempoolStats, UpstreamError> {
        let url = format!("{}/mempool", self.mempool_url);
        let resp: MempoolResponse = self.get_json(MEMPOOL_SOURCE, &url).await?;

        Ok(MempoolStats { count: resp.count, vsize: resp.vsize })
    }

    async fn fetch_block_height(&self) -> Result<u64, UpstreamError> {
        let url = format!("{}/blocks/tip/height", self.mempool_url);
        self.get_json(HEIGHT_SOURCE, &url).await
    }
}
