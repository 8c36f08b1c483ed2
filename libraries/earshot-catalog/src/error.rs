//! Error types for the catalog client.

use earshot_core::EarshotError;
use thiserror::Error;

/// Errors that can occur when loading the track catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Service answered but reported `success: false`
    #[error("Catalog service failed: {0}")]
    Service(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Filtered load matched no track
    #[error("Track not found: {0}")]
    TrackNotFound(String),

    /// Invalid service URL
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),

    /// Service is offline or unreachable
    #[error("Catalog service unreachable: {0}")]
    ServerUnreachable(String),
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

impl From<CatalogError> for EarshotError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::TrackNotFound(key) => EarshotError::not_found("Track", key),
            CatalogError::Request(e) => EarshotError::Network(e.to_string()),
            CatalogError::ServerUnreachable(msg) => EarshotError::Network(msg),
            CatalogError::InvalidUrl(msg) => EarshotError::invalid_input(msg),
            other => EarshotError::catalog(other.to_string()),
        }
    }
}
