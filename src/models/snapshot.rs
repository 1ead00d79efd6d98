//! # models::snapshot
//!
//! Defines [`MarketSnapshot`], the JSON payload served by `GET /snapshot`.
//!
//! The wire shape is fixed by the dashboard:
//!
//! ```json
//! {
//!   "bitcoin":     { "usd": 98500, "lkr": 29850000, "usd_24h_change": 2.5 },
//!   "mempool":     { "count": 15000, "vsize": 8500000 },
//!   "blockHeight": 875000
//! }
//! ```

use serde::{Deserialize, Serialize, Serializer};

/// Largest integer an f64 (and a JS number) holds exactly.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Whole values go out as JSON integers: `98500`, not `98500.0`.
fn whole_as_integer<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < MAX_EXACT_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Price quote for BTC in the two display currencies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BitcoinQuote {
    #[serde(serialize_with = "whole_as_integer")]
    pub usd: f64,
    #[serde(serialize_with = "whole_as_integer")]
    pub lkr: f64,
    /// 24h percent change of the USD price.
    #[serde(serialize_with = "whole_as_integer")]
    pub usd_24h_change: f64,
}

/// Pending-transaction statistics from the mempool source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MempoolStats {
    pub count: u64,
    /// Aggregate virtual size in vbytes.
    pub vsize: u64,
}

/// One complete set of market values.  Never served partially filled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub bitcoin: BitcoinQuote,
    pub mempool: MempoolStats,
    #[serde(rename = "blockHeight")]
    pub block_height: u64,
}

/// Served when the mempool source is unavailable.
pub const DEFAULT_MEMPOOL: MempoolStats = MempoolStats {
    count: 15_000,
    vsize: 8_500_000,
};

/// Served when the block-height source is unavailable.
pub const DEFAULT_BLOCK_HEIGHT: u64 = 875_000;

/// Served verbatim whenever the primary price source fails.
pub const FALLBACK_SNAPSHOT: MarketSnapshot = MarketSnapshot {
    bitcoin: BitcoinQuote {
        usd: 98_500.0,
        lkr: 29_850_000.0,
        usd_24h_change: 2.5,
    },
    mempool: DEFAULT_MEMPOOL,
    block_height: DEFAULT_BLOCK_HEIGHT,
};

impl MarketSnapshot {
    /// Assemble a snapshot from a successful price fetch, substituting the
    /// per-field defaults for any secondary source that failed.
    pub fn assemble(
        bitcoin: BitcoinQuote,
        mempool: Option<MempoolStats>,
        block_height: Option<u64>,
    ) -> Self {
        Self {
            bitcoin,
            mempool: mempool.unwrap_or(DEFAULT_MEMPOOL),
            block_height: block_height.unwrap_or(DEFAULT_BLOCK_HEIGHT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_wire_shape() {
        let value = serde_json::to_value(FALLBACK_SNAPSHOT).unwrap();

        assert_eq!(value["bitcoin"]["usd"].as_f64(), Some(98_500.0));
        assert_eq!(value["bitcoin"]["lkr"].as_f64(), Some(29_850_000.0));
        assert_eq!(value["bitcoin"]["usd_24h_change"].as_f64(), Some(2.5));
        assert_eq!(value["mempool"]["count"].as_u64(), Some(15_000));
        assert_eq!(value["mempool"]["vsize"].as_u64(), Some(8_500_000));
        assert_eq!(value["blockHeight"].as_u64(), Some(875_000));
        assert!(value.get("block_height").is_none());
    }

    #[test]
    fn test_fallback_bytes_use_integer_prices() {
        let body = serde_json::to_string(&FALLBACK_SNAPSHOT).unwrap();
        assert_eq!(
            body,
            r#"{"bitcoin":{"usd":98500,"lkr":29850000,"usd_24h_change":2.5},"mempool":{"count":15000,"vsize":8500000},"blockHeight":875000}"#
        );
    }

    #[test]
    fn test_fractional_and_negative_prices_keep_their_form() {
        let quote = BitcoinQuote { usd: 98_512.34, lkr: 29_849_239.02, usd_24h_change: -3.0 };
        let body = serde_json::to_string(&quote).unwrap();
        assert_eq!(body, r#"{"usd":98512.34,"lkr":29849239.02,"usd_24h_change":-3}"#);

        let back: BitcoinQuote = serde_json::from_str(&body).unwrap();
        assert_eq!(back, quote);
    }

    #[test]
    fn test_assemble_degrades_each_field_independently() {
        let quote = BitcoinQuote { usd: 61_000.0, lkr: 18_500_000.0, usd_24h_change: -1.2 };
        let live_mempool = MempoolStats { count: 42, vsize: 9_000 };

        let no_height = MarketSnapshot::assemble(quote, Some(live_mempool), None);
        assert_eq!(no_height.mempool, live_mempool);
        assert_eq!(no_height.block_height, DEFAULT_BLOCK_HEIGHT);

        let no_mempool = MarketSnapshot::assemble(quote, None, Some(900_001));
        assert_eq!(no_mempool.mempool, DEFAULT_MEMPOOL);
        assert_eq!(no_mempool.block_height, 900_001);
        assert_eq!(no_mempool.bitcoin, quote);
    }
}
