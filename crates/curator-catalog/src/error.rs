//! Error types for catalog access.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors returned by a [`Catalog`](crate::Catalog).
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The requested section, entry or collection does not exist.
    #[error("Not found: {what}")]
    NotFound { what: String },

    /// The server answered with a non-success status.
    #[error("Server returned {status} for {url}")]
    Status { status: u16, url: String },

    /// The server URL could not be parsed.
    #[error("Invalid server URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be decoded.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The response decoded but lacked an expected field.
    #[error("Unexpected response: {message}")]
    InvalidResponse { message: String },

    /// A local file (poster) could not be read.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CatalogError {
    /// Create a not-found error.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Check if this is a lookup miss.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found() {
        let err = CatalogError::not_found("collection 'Alien'");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Not found: collection 'Alien'");

        let err = CatalogError::Status {
            status: 500,
            url: "http://plex/library".into(),
        };
        assert!(!err.is_not_found());
    }
}
