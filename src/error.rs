//! # error
//!
//! Failure taxonomy for upstream market-data calls.
//!
//! Nothing here ever reaches the HTTP client: `GET /snapshot` always answers
//! `200` and every variant below collapses into the degrade path inside
//! [`crate::cache::SnapshotCache`].  The variants exist so logs can say *why*
//! a source was skipped.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection refused, DNS failure, TLS error or timeout.
    #[error("{source_name} unreachable: {reason}")]
    Transport {
        source_name: &'static str,
        reason: String,
    },

    /// The source answered with a non-2xx status.
    #[error("{source_name} returned HTTP {status}")]
    Status {
        source_name: &'static str,
        status: StatusCode,
    },

    /// The body parsed but a consumed field was missing or mistyped.
    #[error("{source_name} payload malformed: {reason}")]
    Malformed {
        source_name: &'static str,
        reason: String,
    },
}

impl UpstreamError {
    pub fn source_name(&self) -> &'static str {
        match self {
            UpstreamError::Transport { source_name, .. }
            | UpstreamError::Status { source_name, .. }
            | UpstreamError::Malformed { source_name, .. } => source_name,
        }
    }
}
