//! HTTP client error types

use thiserror::Error;

/// Result type for HTTP operations
pub type Result<T> = std::result::Result<T, HttpError>;

/// HTTP client errors
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network or protocol failure during the transport call
    #[error("Network request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// JSON body could not be encoded or decoded
    #[error("JSON body error: {0}")]
    Json(#[from] serde_json::Error),

    /// An interceptor returned an error, aborting the call
    #[error("Interceptor failed: {0}")]
    Interceptor(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Client build error
    #[error("Failed to build HTTP client: {0}")]
    BuildError(String),
}

impl HttpError {
    /// Wrap an arbitrary error as an interceptor failure.
    pub fn interceptor(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        HttpError::Interceptor(err.into())
    }
}
