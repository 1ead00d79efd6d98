//! # board — what is on screen right now
//!
//! Holds the previous and current rendered [`DisplayState`] plus one
//! [`FlowingNumber`] per field.  [`Board::apply`] is the only mutation: it
//! shifts `current` into `previous`, so the pair is always two consecutive
//! render states.

use std::time::{Duration, Instant};

use crate::display::DisplayState;
use crate::flow::FlowingNumber;
use crate::format::{fixed, grouped, grouped_int};

/// Formatted text of every animated field.
#[derive(Debug, Clone)]
pub struct Fields {
    pub price_lkr:    FlowingNumber,
    pub price_usd:    FlowingNumber,
    pub change_24h:   FlowingNumber,
    pub lkr_per_sat:  FlowingNumber,
    pub sats_per_lkr: FlowingNumber,
    pub block_height: FlowingNumber,
    pub difficulty:   FlowingNumber,
    pub mempool:      FlowingNumber,
    pub fees:         FlowingNumber,
}

/// `[price_lkr, price_usd, change_24h, lkr_per_sat, sats_per_lkr,
/// block_height, difficulty, mempool, fees]`
fn render_texts(state: &DisplayState) -> [String; 9] {
    [
        grouped(state.btc_price_lkr),
        grouped(state.btc_price_usd),
        format!("{:+}", crate::format::round_dp(state.usd_24h_change, 2)),
        fixed(state.lkr_per_sat, 4),
        fixed(state.sats_per_lkr, 2),
        grouped_int(state.block_height),
        state.difficulty.clone(),
        grouped_int(state.mempool),
        state.fees.to_string(),
    ]
}

impl Fields {
    fn from_state(state: &DisplayState) -> Self {
        let [price_lkr, price_usd, change_24h, lkr_per_sat, sats_per_lkr, block_height, difficulty, mempool, fees] =
            render_texts(state).map(FlowingNumber::new);
        Self {
            price_lkr,
            price_usd,
            change_24h,
            lkr_per_sat,
            sats_per_lkr,
            block_height,
            difficulty,
            mempool,
            fees,
        }
    }

    fn iter_mut(&mut self) -> [&mut FlowingNumber; 9] {
        [
            &mut self.price_lkr,
            &mut self.price_usd,
            &mut self.change_24h,
            &mut self.lkr_per_sat,
            &mut self.sats_per_lkr,
            &mut self.block_height,
            &mut self.difficulty,
            &mut self.mempool,
            &mut self.fees,
        ]
    }
}

pub struct Board {
    previous: DisplayState,
    current:  DisplayState,
    fields:   Fields,
    hold:     Duration,
}

impl Board {
    pub fn new(initial: DisplayState, hold: Duration) -> Self {
        Self {
            previous: initial.clone(),
            fields:   Fields::from_state(&initial),
            current:  initial,
            hold,
        }
    }

    pub fn apply(&mut self, next: DisplayState, now: Instant) {
        let texts = render_texts(&next);
        for (field, text) in self.fields.iter_mut().into_iter().zip(texts) {
            field.update(text, now, self.hold);
        }
        self.previous = std::mem::replace(&mut self.current, next);
    }

    pub fn current(&self) -> &DisplayState {
        &self.current
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// LKR price direction since the last render: `1`, `-1` or `0`.
    pub fn lkr_trend(&self) -> i8 {
        let delta = self.current.btc_price_lkr - self.previous.btc_price_lkr;
        if delta > 0.0 {
            1
        } else if delta < 0.0 {
            -1
        } else {
            0
        }
    }
}
