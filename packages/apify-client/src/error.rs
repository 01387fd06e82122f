//! Typed errors for the Apify client.

use thiserror::Error;

/// Errors that can occur when talking to the Apify platform.
#[derive(Debug, Error)]
pub enum ApifyError {
    /// HTTP transport failure (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-success status.
    #[error("Apify API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Response body did not match the expected shape.
    #[error("malformed Apify response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Result type alias for Apify operations.
pub type Result<T> = std::result::Result<T, ApifyError>;
