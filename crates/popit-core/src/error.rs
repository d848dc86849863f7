//! Centralized error types for popit.

use thiserror::Error;

/// Main error type for cache and reconciliation operations.
#[derive(Error, Debug)]
pub enum PopitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Build failed: {0}")]
    Build(#[from] BuildError),
}

/// Result type for popit operations.
pub type PopitResult<T> = Result<T, PopitError>;

impl PopitError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Failure to retrieve a page from the remote repository.
///
/// Every variant is fatal for the current pass; nothing retries.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },

    #[error("could not decode page from {url}: {reason}")]
    Decode { url: String, reason: String },
}

/// A single record that could not be mapped into a graph fragment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("record has no canonical id")]
    MissingId,

    #[error("record {id} is missing required field '{field}'")]
    MissingField { id: String, field: &'static str },
}

impl BuildError {
    pub fn missing(id: &str, field: &'static str) -> Self {
        Self::MissingField { id: id.to_string(), field }
    }
}
