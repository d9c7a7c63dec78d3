//! Error types for wikimapia-client

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Wikimapia API calls
#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Wikimapia API error {code}: {message}")]
    Api { code: i64, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}
