use std::sync::Arc;

use thiserror::Error;

/// Errors from the single request against the open-data endpoint.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body is not JSON of shape `{ "results": [...] }`.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid dataset URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// A single raw record could not be turned into a parking spot.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("record {record_id} rejected: {reason}")]
    RecordRejected { record_id: String, reason: String },
}

/// Local snapshot storage failed. Always absorbed as a cache miss.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache unavailable: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache unavailable: snapshot (de)serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("cache unavailable: invalid timestamp {0:?}")]
    InvalidTimestamp(String),

    #[error("cache unavailable: key {0:?} is not a valid file name")]
    InvalidKey(String),
}

/// The only error surfaced to callers of [`crate::ParkingService`].
///
/// The fetch error is behind an `Arc` so that every caller coalesced onto
/// one in-flight fetch receives the same error.
#[derive(Debug, Clone, Error)]
pub enum ParkingError {
    #[error("failed to fetch parking data: {0}")]
    FetchFailed(#[source] Arc<FetchError>),
}

impl From<FetchError> for ParkingError {
    fn from(err: FetchError) -> Self {
        ParkingError::FetchFailed(Arc::new(err))
    }
}
