//! Domain models shared across the proxy.

pub mod snapshot;

pub use snapshot::{BitcoinQuote, MarketSnapshot, MempoolStats, FALLBACK_SNAPSHOT};
