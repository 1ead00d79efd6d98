//! # cache
//!
//! **Snapshot Cache** — the fetch-or-cache policy that sits in front of the
//! upstream market APIs.
//!
//! ```text
//! get()
//!   │
//!   ├─ entry younger than TTL? ──────────────▶ return cached snapshot
//!   │
//!   ├─ lock refresh slot (single-flight)
//!   │    └─ re-check: someone refreshed while we queued? ─▶ return it
//!   │
//!   ├─ [1] price source      ✗ ─▶ FALLBACK_SNAPSHOT (or stale, if enabled)
//!   ├─ [2] mempool  ┐ concurrent, each ✗ ─▶ field default
//!   ├─ [3] height   ┘
//!   │
//!   └─ store entry (fetched_at = now) ─▶ return new snapshot
//! ```
//!
//! ## Single-flight
//!
//! Misses serialise on `refresh_lock`.  Waiters re-check freshness after
//! acquiring it, so N concurrent misses cost one upstream pass.  A failed
//! primary fetch stores nothing, so the next waiter tries again.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::error::UpstreamError;
use crate::models::{MarketSnapshot, FALLBACK_SNAPSHOT};
use crate::upstream::MarketSource;

// ─── Cache Entry ──────────────────────────────────────────────────────────────

/// The single cached value.  Replaced wholesale, never mutated in place.
#[derive(Debug, Clone, Copy)]
pub struct CacheEntry {
    pub snapshot: MarketSnapshot,
    /// Monotonic; drives TTL decisions.
    pub fetched_at: Instant,
    /// Wall-clock; reported by `/health`.
    pub fetched_at_utc: DateTime<Utc>,
}

impl CacheEntry {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

/// Counters for the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub refreshes: u64,
    pub upstream_failures: u64,
}

// ─── Snapshot Cache ───────────────────────────────────────────────────────────

pub struct SnapshotCache {
    source: Arc<dyn MarketSource>,
    ttl: Duration,
    serve_stale_on_error: bool,
    entry: RwLock<Option<CacheEntry>>,
    refresh_lock: Mutex<()>,
    refreshes: AtomicU64,
    upstream_failures: AtomicU64,
}

impl SnapshotCache {
    pub fn new(source: Arc<dyn MarketSource>, ttl: Duration, serve_stale_on_error: bool) -> Self {
        Self {
            source,
            ttl,
            serve_stale_on_error,
            entry: RwLock::new(None),
            refresh_lock: Mutex::new(()),
            refreshes: AtomicU64::new(0),
            upstream_failures: AtomicU64::new(0),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// TTL-gated read.  Always yields a complete snapshot.
    pub async fn get(&self) -> MarketSnapshot {
        if let Some(snapshot) = self.fresh().await {
            return snapshot;
        }

        let _slot = self.refresh_lock.lock().await;

        if let Some(snapshot) = self.fresh().await {
            debug!("Cache refreshed by a concurrent caller — reusing");
            return snapshot;
        }

        self.refresh_locked().await
    }

    /// Unconditional upstream pass, ignoring the TTL.  Used to warm the cache
    /// at start-up.
    pub async fn refresh(&self) -> MarketSnapshot {
        let _slot = self.refresh_lock.lock().await;
        self.refresh_locked().await
    }

    /// Current entry without touching upstream.
    pub async fn peek(&self) -> Option<CacheEntry> {
        *self.entry.read().await
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            refreshes:         self.refreshes.load(Ordering::Relaxed),
            upstream_failures: self.upstream_failures.load(Ordering::Relaxed),
        }
    }

    async fn fresh(&self) -> Option<MarketSnapshot> {
        let guard = self.entry.read().await;
        guard
            .as_ref()
            .filter(|entry| entry.is_fresh(self.ttl))
            .map(|entry| entry.snapshot)
    }

    /// Caller must hold `refresh_lock`.
    async fn refresh_locked(&self) -> MarketSnapshot {
        // ── 1. Primary: price ─────────────────────────────────────────────────
        let quote = match self.source.fetch_quote().await {
            Ok(quote) => quote,
            Err(err) => {
                self.upstream_failures.fetch_add(1, Ordering::Relaxed);
                return self.primary_failed(&err).await;
            }
        };

        // ── 2. Secondaries: independent, run together ────────────────────────
        let (mempool, height) = tokio::join!(
            self.source.fetch_mempool(),
            self.source.fetch_block_height(),
        );
        let mempool = self.degrade(mempool);
        let block_height = self.degrade(height);

        // ── 3. Store ──────────────────────────────────────────────────────────
        let snapshot = MarketSnapshot::assemble(quote, mempool, block_height);
        *self.entry.write().await = Some(CacheEntry {
            snapshot,
            fetched_at:     Instant::now(),
            fetched_at_utc: Utc::now(),
        });
        self.refreshes.fetch_add(1, Ordering::Relaxed);

        info!(
            usd          = snapshot.bitcoin.usd,
            lkr          = snapshot.bitcoin.lkr,
            mempool      = snapshot.mempool.count,
            block_height = snapshot.block_height,
            "📦 Snapshot refreshed from upstream"
        );

        snapshot
    }

    async fn primary_failed(&self, err: &UpstreamError) -> MarketSnapshot {
        if self.serve_stale_on_error {
            if let Some(entry) = *self.entry.read().await {
                warn!(error = %err, "Price source failed — serving stale snapshot");
                return entry.snapshot;
            }
        }

        warn!(error = %err, "Price source failed — serving fallback snapshot");
        FALLBACK_SNAPSHOT
    }

    fn degrade<T>(&self, result: Result<T, UpstreamError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.upstream_failures.fetch_add(1, Ordering::Relaxed);
                warn!(source = err.source_name(), error = %err, "Secondary source failed — using default");
                None
            }
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
