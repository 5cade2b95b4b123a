//! Error types for a reconciliation run.

use curator_catalog::CatalogError;
use curator_core::ScanError;
use thiserror::Error;

/// Errors that end a reconciliation run.
///
/// Ambiguities are not errors: they are logged, recorded in the
/// [`SyncReport`](crate::SyncReport) and the run continues.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The section is neither a movie nor a show library.
    #[error("Unsupported section type '{kind}'")]
    UnsupportedSection { kind: String },

    /// The options could not produce a valid scan configuration.
    #[error("Invalid options: {message}")]
    InvalidOptions { message: String },

    /// Building a directory tree failed.
    #[error("Failed to build directory tree: {0}")]
    Scan(#[from] ScanError),

    /// A catalog call failed.
    #[error("Catalog request failed: {0}")]
    Catalog(#[from] CatalogError),
}
