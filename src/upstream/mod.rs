//! # upstream
//!
//! The three market-data collaborators behind the proxy.
//!
//! [`MarketSource`] is the seam between the cache policy and the network: the
//! cache only ever talks to this trait, so tests can script each source
//! independently and count how many calls reached "upstream".

pub mod http;

use async_trait::async_trait;

use crate::error::UpstreamError;
use crate::models::{BitcoinQuote, MempoolStats};

pub use http::HttpMarketSource;

/// One fetch per source.  Implementations must not retry internally.
#[async_trait]
pub trait MarketSource: Send + Sync {
    /// Primary source: BTC price in USD and LKR plus 24h change.
    async fn fetch_quote(&self) -> Result<BitcoinQuote, UpstreamError>;

    /// Secondary source: pending transaction count and aggregate vsize.
    async fn fetch_mempool(&self) -> Result<MempoolStats, UpstreamError>;

    /// Secondary source: current chain tip height.
    async fn fetch_block_height(&self) -> Result<u64, UpstreamError>;
}
