//! # simulate — small fluctuations between real updates
//!
//! Keeps the screen moving without pretending to be new data: prices wander
//! by at most ±0.05 %, mempool drifts by up to ±50 txs (floored at 1000),
//! and in stream mode a block "arrives" about once per hundred messages.

use crate::display::DisplayState;
use crate::noise::Noise;

/// Full jitter width as a share of price; centred, so ±0.05 %.
pub const PRICE_JITTER: f64 = 0.001;
/// Full mempool drift width in transactions; centred, so ±50.
pub const MEMPOOL_JITTER: f64 = 100.0;
pub const MEMPOOL_FLOOR: u64 = 1_000;
pub const BLOCK_ARRIVAL_PROBABILITY: f64 = 0.01;

/// `price + (u - 0.5) * price * PRICE_JITTER`
pub fn jitter_price(price: f64, noise: &mut dyn Noise) -> f64 {
    price + (noise.uniform() - 0.5) * (price * PRICE_JITTER)
}

/// `max(MEMPOOL_FLOOR, count + floor((u - 0.5) * MEMPOOL_JITTER))`
pub fn drift_mempool(count: u64, noise: &mut dyn Noise) -> u64 {
    let delta = ((noise.uniform() - 0.5) * MEMPOOL_JITTER).floor() as i64;
    let drifted = (count as i64).saturating_add(delta);
    drifted.max(MEMPOOL_FLOOR as i64) as u64
}

/// Height + 1 with probability [`BLOCK_ARRIVAL_PROBABILITY`].
pub fn maybe_new_block(height: u64, noise: &mut dyn Noise) -> u64 {
    if noise.uniform() > 1.0 - BLOCK_ARRIVAL_PROBABILITY {
        height + 1
    } else {
        height
    }
}

/// One poll-mode simulated tick: jitter both prices, recompute ratios,
/// drift mempool.  Block height and 24h change are left alone.
pub fn fluctuate(state: &DisplayState, noise: &mut dyn Noise) -> DisplayState {
    let mut next = state.clone();
    let lkr = jitter_price(state.btc_price_lkr, noise);
    let usd = jitter_price(state.btc_price_usd, noise);
    next.reprice(usd, lkr);
    next.mempool = drift_mempool(state.mempool, noise);
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{sats_per_unit, unit_per_sat};
    use crate::noise::{Quiet, RandomNoise, Scripted};

    #[test]
    fn test_quiet_noise_changes_nothing() {
        let state = DisplayState::default();
        let next = fluctuate(&state, &mut Quiet);

        assert_eq!(next.btc_price_lkr, state.btc_price_lkr);
        assert_eq!(next.btc_price_usd, state.btc_price_usd);
        assert_eq!(next.mempool, state.mempool);
        assert_eq!(maybe_new_block(875_000, &mut Quiet), 875_000);
    }

    #[test]
    fn test_price_jitter_is_bounded() {
        let mut noise = RandomNoise::seeded(1);
        for _ in 0..5_000 {
            let p = jitter_price(29_850_000.0, &mut noise);
            assert!((p - 29_850_000.0).abs() <= 29_850_000.0 * 0.0005);
        }
    }

    #[test]
    fn test_price_jitter_extremes() {
        let low = jitter_price(10_000.0, &mut Scripted::new(&[0.0]));
        assert_eq!(low, 9_995.0);
        let high = jitter_price(10_000.0, &mut Scripted::new(&[0.75]));
        assert_eq!(high, 10_002.5);
    }

    #[test]
    fn test_mempool_drift_and_floor() {
        assert_eq!(drift_mempool(15_000, &mut Scripted::new(&[0.0])), 14_950);
        assert_eq!(drift_mempool(15_000, &mut Scripted::new(&[0.999])), 15_049);
        assert_eq!(drift_mempool(1_020, &mut Scripted::new(&[0.0])), MEMPOOL_FLOOR);
        assert_eq!(drift_mempool(0, &mut Scripted::new(&[0.9])), MEMPOOL_FLOOR);
    }

    #[test]
    fn test_block_arrival_is_rare() {
        assert_eq!(maybe_new_block(10, &mut Scripted::new(&[0.995])), 11);
        assert_eq!(maybe_new_block(10, &mut Scripted::new(&[0.98])), 10);

        let mut noise = RandomNoise::seeded(99);
        let arrivals = (0..10_000)
            .filter(|_| maybe_new_block(0, &mut noise) == 1)
            .count();
        assert!((50..200).contains(&arrivals), "arrivals = {arrivals}");
    }

    #[test]
    fn test_fluctuate_keeps_ratios_consistent() {
        let mut noise = RandomNoise::seeded(3);
        let mut state = DisplayState::default();
        for _ in 0..100 {
            state = fluctuate(&state, &mut noise);
            assert_eq!(state.sats_per_lkr, sats_per_unit(state.btc_price_lkr));
            assert_eq!(state.lkr_per_sat, unit_per_sat(state.btc_price_lkr));
        }
    }
}
