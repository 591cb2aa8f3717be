// Domain error taxonomy

use std::time::Duration;

use thiserror::Error;

/// Failure of a single upstream call, classified by how the caller may react.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    #[error("upstream throttled (retry after {retry_after:?})")]
    Throttled { retry_after: Option<Duration> },
    #[error("upstream client error: HTTP {status}")]
    Client { status: u16 },
    #[error("upstream server error: HTTP {status}")]
    Server { status: u16 },
    #[error("upstream transport error: {0}")]
    Transport(String),
    #[error("upstream payload could not be decoded: {0}")]
    Decode(String),
}

impl UpstreamError {
    pub fn from_status(status: u16, retry_after: Option<Duration>) -> Self {
        match status {
            429 => UpstreamError::Throttled { retry_after },
            500..=599 => UpstreamError::Server { status },
            _ => UpstreamError::Client { status },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("transient store failure: {0}")]
    Transient(String),
    #[error("store failure: {0}")]
    Fatal(String),
}

impl StoreError {
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Transient(_))
    }
}

/// Reasons a fetched payload yields no record. Never surfaced to callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DerivationError {
    #[error("participant {puuid} not found in match {match_id}")]
    ParticipantNotFound { match_id: String, puuid: String },
    #[error("match {match_id} has no usable timeline samples")]
    Unproducible { match_id: String },
    #[error("match {match_id} is invalid: {reason}")]
    Invalid { match_id: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        assert_eq!(
            UpstreamError::from_status(429, None),
            UpstreamError::Throttled { retry_after: None }
        );
        assert_eq!(UpstreamError::from_status(503, None), UpstreamError::Server { status: 503 });
        assert_eq!(UpstreamError::from_status(404, None), UpstreamError::Client { status: 404 });
    }
}
