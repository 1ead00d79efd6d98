//! # display — DisplayState
//!
//! Everything the dashboard shows, including the two derived sat ratios.
//! States are replaced whole: every update path builds a new value and the
//! refresh task publishes it in one `watch` send.

use crate::feed::Snapshot;
use crate::format::round_dp;

pub const SATS_PER_BTC: f64 = 100_000_000.0;

/// No fee source is wired in; the screen shows a flat rate.
pub const DEFAULT_FEE_RATE: u32 = 12;

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayState {
    pub btc_price_lkr:  f64,
    pub btc_price_usd:  f64,
    pub usd_24h_change: f64,
    /// `round(1e8 / lkr, 2)`
    pub sats_per_lkr:   f64,
    /// `round(lkr / 1e8, 4)`
    pub lkr_per_sat:    f64,
    pub block_height:   u64,
    pub mempool:        u64,
    /// sat/vB
    pub fees:           u32,
    pub difficulty:     String,
}

impl Default for DisplayState {
    /// What the screen shows before the first real fetch lands.
    fn default() -> Self {
        Self {
            btc_price_lkr:  29_850_000.0,
            btc_price_usd:  98_500.0,
            usd_24h_change: 2.5,
            sats_per_lkr:   3.35,
            lkr_per_sat:    0.299,
            block_height:   875_432,
            mempool:        15_234,
            fees:           DEFAULT_FEE_RATE,
            difficulty:     "109.78T".to_string(),
        }
    }
}

/// Sats bought by one LKR.
pub fn sats_per_unit(price_in_unit: f64) -> f64 {
    round_dp(SATS_PER_BTC / price_in_unit, 2)
}

/// LKR value of one sat.
pub fn unit_per_sat(price_in_unit: f64) -> f64 {
    round_dp(price_in_unit / SATS_PER_BTC, 4)
}

impl DisplayState {
    /// Set both prices and recompute the sat ratios together.
    ///
    /// A non-positive or non-finite LKR price is ignored.
    pub fn reprice(&mut self, usd: f64, lkr: f64) {
        if !(lkr.is_finite() && lkr > 0.0 && usd.is_finite()) {
            return;
        }
        self.btc_price_usd = usd;
        self.btc_price_lkr = lkr;
        self.sats_per_lkr  = sats_per_unit(lkr);
        self.lkr_per_sat   = unit_per_sat(lkr);
    }

    /// Overlay every field a proxy snapshot carries.
    pub fn merged_with(&self, snapshot: &Snapshot) -> Self {
        let mut next = self.clone();
        next.reprice(snapshot.bitcoin.usd, snapshot.bitcoin.lkr);
        next.usd_24h_change = snapshot.bitcoin.usd_24h_change;
        next.block_height   = snapshot.block_height;
        next.mempool        = snapshot.mempool.count;
        next.fees           = DEFAULT_FEE_RATE;
        next
    }

    /// Share of the way to 1 sat = Rs.1, clamped to `0..=1`.
    pub fn parity_progress(&self) -> f64 {
        self.lkr_per_sat.clamp(0.0, 1.0)
    }
}
