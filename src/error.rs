//! Error types for RIPS API operations.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during RIPS API operations.
#[derive(Debug, Error)]
pub enum RipsError {
    /// Configuration is missing or inconsistent. Raised before any network call
    /// that would depend on it.
    #[error("RIPS configuration error: {0}")]
    ConfigMissing(String),

    /// No usable access token could be found or created.
    #[error("RIPS authentication failed: {0}")]
    AuthFailed(String),

    /// API request failed with a non-success status.
    #[error("RIPS API error ({status_code}): {message}")]
    ApiError { message: String, status_code: u16 },

    /// Path template could not be filled with the supplied segments.
    #[error("Invalid resource path: {0}")]
    InvalidPath(String),

    /// Resource ids are positive integers.
    #[error("Invalid resource id 0: ids must be positive")]
    InvalidId,

    /// A header name or value was rejected.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Scan did not reach its finished state within the wait budget.
    #[error("Scan {scan_id} of application {application_id} did not finish within {waited:?}")]
    ScanTimeout {
        application_id: u64,
        scan_id: u64,
        waited: Duration,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Query string or form body could not be encoded.
    #[error("Failed to encode parameters: {0}")]
    QueryError(#[from] serde_qs::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// File system error while writing tokens or exports.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RipsError {
    /// HTTP status code carried by the error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            RipsError::ApiError { status_code, .. } => Some(*status_code),
            RipsError::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type alias for RIPS operations.
pub type Result<T> = core::result::Result<T, RipsError>;
