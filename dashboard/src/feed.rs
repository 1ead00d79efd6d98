//! # feed — ดึง Snapshot จาก deepa proxy
//!
//! [`SnapshotFeed`] is what the poll loop talks to; [`ProxyFeed`] is the
//! real `GET {PROXY_URL}/snapshot` client.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

// ─── Wire Types ───────────────────────────────────────────────────────────────

/// Subset of the proxy payload the dashboard consumes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Snapshot {
    pub bitcoin: SnapshotQuote,
    pub mempool: SnapshotMempool,
    #[serde(rename = "blockHeight")]
    pub block_height: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SnapshotQuote {
    pub usd: f64,
    pub lkr: f64,
    #[serde(default)]
    pub usd_24h_change: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SnapshotMempool {
    pub count: u64,
}

// ─── Errors ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("proxy unreachable: {0}")]
    Unreachable(String),

    #[error("proxy returned HTTP {0}")]
    Status(u16),

    #[error("stream connect failed: {0}")]
    Connect(String),

    #[error("stream error: {0}")]
    Stream(String),

    #[error("unparseable message: {0}")]
    Parse(String),
}

// ─── Feed ─────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait SnapshotFeed: Send + Sync {
    async fn fetch(&self) -> Result<Snapshot, FeedError>;
}

pub struct ProxyFeed {
    client:  reqwest::Client,
    url:     String,
    timeout: Duration,
}

impl ProxyFeed {
    pub fn new(client: reqwest::Client, proxy_url: &str, timeout: Duration) -> Self {
        Self {
            client,
            url: format!("{proxy_url}/snapshot"),
            timeout,
        }
    }
}

#[async_trait]
impl SnapshotFeed for ProxyFeed {
    async fn fetch(&self) -> Result<Snapshot, FeedError> {
        let resp = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| FeedError::Unreachable(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(FeedError::Status(resp.status().as_u16()));
        }

        let snapshot: Snapshot = resp
            .json()
            .await
            .map_err(|e| FeedError::Parse(e.to_string()))?;

        debug!(
            lkr          = snapshot.bitcoin.lkr,
            block_height = snapshot.block_height,
            "Snapshot fetched from proxy"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    /// One-shot HTTP server answering the first request with `status` + `body`.
    async fn serve_once(status: &str, body: &str) -> String {
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 2048];
            let _ = socket.read(&mut request).await.unwrap();
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{addr}")
    }

    fn feed_for(base: &str) -> ProxyFeed {
        ProxyFeed::new(reqwest::Client::new(), base, Duration::from_secs(2))
    }

    #[tokio::test]
    async fn test_fetch_decodes_proxy_snapshot() {
        let base = serve_once(
            "200 OK",
            r#"{"bitcoin":{"usd":98500,"lkr":29850000,"usd_24h_change":2.5},"mempool":{"count":15000,"vsize":8500000},"blockHeight":875000}"#,
        )
        .await;

        let snapshot = feed_for(&base).fetch().await.unwrap();

        assert_eq!(snapshot.bitcoin.usd, 98_500.0);
        assert_eq!(snapshot.bitcoin.usd_24h_change, 2.5);
        assert_eq!(snapshot.block_height, 875_000);
    }

    #[tokio::test]
    async fn test_fetch_maps_server_error_to_status() {
        let base = serve_once("500 Internal Server Error", "").await;

        let err = feed_for(&base).fetch().await.unwrap_err();

        assert!(matches!(err, FeedError::Status(500)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_fetch_rejects_non_json_body() {
        let base = serve_once("200 OK", "<html>oops</html>").await;

        let err = feed_for(&base).fetch().await.unwrap_err();

        assert!(matches!(err, FeedError::Parse(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_fetch_reports_closed_port_as_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = feed_for(&format!("http://{addr}")).fetch().await.unwrap_err();

        assert!(matches!(err, FeedError::Unreachable(_)), "got {err:?}");
    }

    #[test]
    fn test_parses_proxy_payload() {
        let body = r#"{
            "bitcoin": { "usd": 98500, "lkr": 29850000, "usd_24h_change": 2.5 },
            "mempool": { "count": 15000, "vsize": 8500000 },
            "blockHeight": 875000
        }"#;

        let snapshot: Snapshot = serde_json::from_str(body).unwrap();

        assert_eq!(snapshot.bitcoin.lkr, 29_850_000.0);
        assert_eq!(snapshot.mempool.count, 15_000);
        assert_eq!(snapshot.block_height, 875_000);
    }

    #[test]
    fn test_rejects_incomplete_payload() {
        let body = r#"{ "bitcoin": { "usd": 98500, "lkr": 29850000 } }"#;
        assert!(serde_json::from_str::<Snapshot>(body).is_err());
    }
}
