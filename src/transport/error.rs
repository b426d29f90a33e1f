use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Failed to decode JSON response from {0}")]
    Decode(String, #[source] reqwest::Error),

    #[error("Response from {url} is not a service envelope")]
    Envelope {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Request to {url} timed out after {limit:?}")]
    Timeout { url: String, limit: Duration },
}

impl TransportError {
    /// The URL of the request that failed.
    pub fn url(&self) -> &str {
        match self {
            TransportError::NetworkRequest(url, _) | TransportError::Decode(url, _) => url,
            TransportError::HttpStatus { url, .. }
            | TransportError::Envelope { url, .. }
            | TransportError::Timeout { url, .. } => url,
        }
    }
}
