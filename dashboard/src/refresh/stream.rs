//! # refresh::stream — live Binance ticker
//!
//! Subscribes to a `@ticker` stream.  Each 24hr-ticker event carries the last
//! price (`"c"`) and 24h change percent (`"P"`) as decimal strings:
//!
//! ```json
//! { "e": "24hrTicker", "s": "BTCUSDT", "c": "98512.34000000", "P": "2.504", ... }
//! ```
//!
//! USD comes straight from the event; LKR is USD × a fixed rate.  Mempool
//! drifts and block height occasionally ticks up to look alive.
//!
//! Disconnects are supervised by [`supervise`]: wait the fixed delay, then
//! reconnect, forever.  Shutdown ends the session *and* the retry schedule.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::watch;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

use super::cancelled;
use crate::display::DisplayState;
use crate::feed::FeedError;
use crate::noise::Noise;
use crate::simulate::{drift_mempool, maybe_new_block};

// ─── Message Handling ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct TickerEvent {
    #[serde(rename = "c")]
    last_price: String,
    #[serde(rename = "P")]
    change_pct: String,
}

fn parse_decimal(field: &str, raw: &str) -> Result<f64, FeedError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| FeedError::Parse(format!("{field}={raw:?}")))
}

/// Fold one ticker frame into `state`.  Errors leave the caller's state
/// untouched.
pub fn apply_ticker(
    state: &DisplayState,
    text: &str,
    lkr_per_usd: f64,
    noise: &mut dyn Noise,
) -> Result<DisplayState, FeedError> {
    let event: TickerEvent =
        serde_json::from_str(text).map_err(|e| FeedError::Parse(e.to_string()))?;

    let usd = parse_decimal("c", &event.last_price)?;
    let change = parse_decimal("P", &event.change_pct)?;
    if usd <= 0.0 {
        return Err(FeedError::Parse(format!("non-positive price {usd}")));
    }

    let mut next = state.clone();
    next.reprice(usd, usd * lkr_per_usd);
    next.usd_24h_change = change;
    next.mempool        = drift_mempool(state.mempool, noise);
    next.block_height   = maybe_new_block(state.block_height, noise);
    Ok(next)
}

// ─── Session / Supervisor ─────────────────────────────────────────────────────

/// One connection lifetime.  `Ok` = closed cleanly by the server.
#[async_trait]
pub trait Session: Send {
    async fn run_once(&mut self) -> Result<(), FeedError>;
}

/// Run `session` until shutdown, reconnecting after `delay` every time it
/// ends.  No backoff growth, no attempt cap.
pub async fn supervise<S: Session>(
    session: &mut S,
    delay: Duration,
    shutdown: &mut watch::Receiver<bool>,
) {
    let mut attempt: u64 = 0;

    loop {
        attempt += 1;
        let outcome = tokio::select! {
            _ = cancelled(shutdown) => break,
            outcome = session.run_once() => outcome,
        };

        match outcome {
            Ok(())   => info!(attempt, "Stream closed by server"),
            Err(err) => warn!(attempt, error = %err, "Stream dropped"),
        }
        info!(delay = ?delay, "🔄 Reconnecting after delay");

        tokio::select! {
            _ = cancelled(shutdown) => break,
            _ = tokio::time::sleep(delay) => {}
        }
    }

    info!("Stream supervisor stopped");
}

/// Live Binance ticker session.
pub struct TickerSession {
    pub url:             String,
    pub lkr_per_usd:     f64,
    pub connect_timeout: Duration,
    pub noise:           Box<dyn Noise>,
    pub tx:              watch::Sender<DisplayState>,
}

#[async_trait]
impl Session for TickerSession {
    async fn run_once(&mut self) -> Result<(), FeedError> {
        let (ws, _) = tokio::time::timeout(self.connect_timeout, connect_async(self.url.as_str()))
            .await
            .map_err(|_| FeedError::Connect("timed out".into()))?
            .map_err(|e| FeedError::Connect(e.to_string()))?;

        info!(url = %self.url, "🔌 Ticker stream connected");
        let (mut write, mut read) = ws.split();

        while let Some(frame) = read.next().await {
            match frame.map_err(|e| FeedError::Stream(e.to_string()))? {
                Message::Text(text) => {
                    let current = self.tx.borrow().clone();
                    match apply_ticker(&current, &text, self.lkr_per_usd, self.noise.as_mut()) {
                        Ok(next) => {
                            self.tx.send_replace(next);
                        }
                        Err(e) => warn!(error = %e, "Ticker message skipped"),
                    }
                }
                Message::Ping(data) => {
                    write
                        .send(Message::Pong(data))
                        .await
                        .map_err(|e| FeedError::Stream(e.to_string()))?;
                }
                Message::Close(_) => return Ok(()),
                other => debug!(?other, "Ignoring non-text frame"),
            }
        }

        Ok(())
    }
}
