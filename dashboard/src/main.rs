//! # Deepa Dash — Terminal Screensaver
//!
//! แสดงราคา Bitcoin เป็น LKR แบบเต็มจอ พร้อมตัวเลขที่ "ไหล" เมื่อเปลี่ยน
//!
//! ## Flow
//! ```text
//!  RefreshTask (poll | stream) ──watch<DisplayState>──▶ UI loop
//!                                                        ├─ Board::apply  (on change)
//!                                                        └─ draw          (every 100 ms)
//! ```
//!
//! ## Environment Variables
//!
//! | Variable                 | Default                                            |
//! |--------------------------|----------------------------------------------------|
//! | `REFRESH_MODE`           | `poll`                                             |
//! | `PROXY_URL`              | `http://localhost:3000`                            |
//! | `POLL_INTERVAL_MS`       | `1000`                                             |
//! | `REAL_FETCH_PROBABILITY` | `0.03`                                             |
//! | `HIGHLIGHT_MS`           | `600`                                              |
//! | `STREAM_URL`             | `wss://stream.binance.com:9443/ws/btcusdt@ticker`  |
//! | `RECONNECT_DELAY_SECS`   | `5`                                                |
//! | `LKR_PER_USD`            | `303`                                              |
//! | `SIMULATE`               | `true`                                             |
//! | `FETCH_TIMEOUT_SECS`     | `5`                                                |
//! | `LOG_FILE`               | `deepa-dash.log`                                   |

use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::Context;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod board;
mod config;
mod display;
mod feed;
mod flow;
mod format;
mod noise;
mod refresh;
mod simulate;
mod ui;

use board::Board;
use config::{Config, RefreshMode};
use display::DisplayState;
use feed::ProxyFeed;
use noise::{Noise, Quiet, RandomNoise};
use refresh::poll::{run_poll, PollPolicy};
use refresh::stream::{supervise, TickerSession};
use refresh::RefreshTask;

const FRAME: Duration = Duration::from_millis(100);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("Failed to load config")?;

    let log = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("Failed to open log file {}", config.log_file.display()))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Mutex::new(log)).with_ansi(false))
        .with(EnvFilter::from_default_env()
            .add_directive("deepa_dash=debug".parse()?)
            .add_directive("reqwest=warn".parse()?))
        .init();

    info!(
        mode     = %config.mode,
        proxy    = %config.proxy_url,
        simulate = config.simulate,
        "Deepa Dash starting"
    );

    let (tx, rx) = watch::channel(DisplayState::default());
    let task = spawn_refresh(&config, tx)?;

    let result = run_ui(&config, rx).await;

    task.stop().await;
    info!("Deepa Dash stopped");
    result
}

fn jitter_source(config: &Config) -> Box<dyn Noise> {
    if config.simulate {
        Box::new(RandomNoise::from_entropy())
    } else {
        Box::new(Quiet)
    }
}

fn spawn_refresh(config: &Config, tx: watch::Sender<DisplayState>) -> anyhow::Result<RefreshTask> {
    let task = match config.mode {
        RefreshMode::Poll => {
            let client = reqwest::Client::builder()
                .user_agent("BitcoinDeepa-Screensaver/1.0")
                .build()
                .context("Failed to build HTTP client")?;
            let feed = Arc::new(ProxyFeed::new(client, &config.proxy_url, config.fetch_timeout));
            let policy = PollPolicy::new(
                config.real_fetch_probability,
                Box::new(RandomNoise::from_entropy()),
                jitter_source(config),
            );
            let interval = config.poll_interval;

            RefreshTask::spawn(move |shutdown| run_poll(feed, policy, interval, tx, shutdown))
        }
        RefreshMode::Stream => {
            let mut session = TickerSession {
                url:             config.stream_url.clone(),
                lkr_per_usd:     config.lkr_per_usd,
                connect_timeout: config.fetch_timeout,
                noise:           jitter_source(config),
                tx,
            };
            let delay = config.reconnect_delay;

            RefreshTask::spawn(move |mut shutdown| async move {
                supervise(&mut session, delay, &mut shutdown).await;
            })
        }
    };
    Ok(task)
}

async fn run_ui(config: &Config, mut rx: watch::Receiver<DisplayState>) -> anyhow::Result<()> {
    let (_guard, mut terminal) = ui::TerminalGuard::enter().context("Failed to set up terminal")?;
    let mut board = Board::new(rx.borrow_and_update().clone(), config.highlight);
    let mut frame = tokio::time::interval(FRAME);

    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    info!("Refresh task gone — leaving UI");
                    break;
                }
                let next = rx.borrow_and_update().clone();
                board.apply(next, Instant::now());
            }
            _ = frame.tick() => {
                if ui::quit_requested()? {
                    break;
                }
            }
        }

        let now = Instant::now();
        terminal.draw(|f| ui::draw(f, &board, now))?;
    }

    Ok(())
}
