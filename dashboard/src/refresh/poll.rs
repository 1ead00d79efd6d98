//! # refresh::poll — sampled polling
//!
//! ```text
//! start: real fetch
//! every tick (1 s):
//!   u > 1 - p  (p = 0.03) ─▶ GET /snapshot, merge all fields
//!   otherwise             ─▶ simulate::fluctuate
//! ```
//!
//! Real calls happen roughly once per `1/p` ticks; every tick still moves
//! the display.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::cancelled;
use crate::display::DisplayState;
use crate::feed::SnapshotFeed;
use crate::noise::Noise;
use crate::simulate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickAction {
    Fetch,
    Simulate,
}

pub struct PollPolicy {
    fetch_probability: f64,
    /// Decides fetch vs simulate.
    sampler: Box<dyn Noise>,
    /// Drives the simulated fluctuation; `Quiet` disables it.
    jitter:  Box<dyn Noise>,
}

impl PollPolicy {
    pub fn new(fetch_probability: f64, sampler: Box<dyn Noise>, jitter: Box<dyn Noise>) -> Self {
        Self { fetch_probability, sampler, jitter }
    }

    pub fn decide(&mut self) -> TickAction {
        if self.sampler.uniform() > 1.0 - self.fetch_probability {
            TickAction::Fetch
        } else {
            TickAction::Simulate
        }
    }

    pub fn simulate(&mut self, state: &DisplayState) -> DisplayState {
        simulate::fluctuate(state, self.jitter.as_mut())
    }
}

/// One real fetch merged into `state`; on failure `state` comes back as is.
async fn fetch_merged(feed: &dyn SnapshotFeed, state: &DisplayState) -> DisplayState {
    match feed.fetch().await {
        Ok(snapshot) => state.merged_with(&snapshot),
        Err(e) => {
            warn!(error = %e, "Snapshot fetch failed — keeping current values");
            state.clone()
        }
    }
}

pub async fn run_poll(
    feed: Arc<dyn SnapshotFeed>,
    mut policy: PollPolicy,
    interval: Duration,
    tx: watch::Sender<DisplayState>,
    mut shutdown: watch::Receiver<bool>,
) {
    info!(interval = ?interval, "📡 Poll refresh started");

    let initial = tx.borrow().clone();
    tokio::select! {
        _ = cancelled(&mut shutdown) => return,
        next = fetch_merged(feed.as_ref(), &initial) => { tx.send_replace(next); }
    }

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = cancelled(&mut shutdown) => break,
            _ = ticker.tick() => {}
        }

        let current = tx.borrow().clone();
        let next = match policy.decide() {
            TickAction::Fetch => {
                debug!("Tick sampled for real fetch");
                tokio::select! {
                    _ = cancelled(&mut shutdown) => break,
                    next = fetch_merged(feed.as_ref(), &current) => next,
                }
            }
            TickAction::Simulate => policy.simulate(&current),
        };
        tx.send_replace(next);
    }

    info!("📡 Poll refresh stopped");
}
