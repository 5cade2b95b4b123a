//! Media directory tree builder for curator.
//!
//! This crate walks a library location and builds the
//! [`DirectoryTree`] the reconciler works from. Each directory node records
//! the artwork file and the recognized video files found directly inside it.
//!
//! # Example
//!
//! ```rust,no_run
//! use curator_scan::{ScanConfig, TreeScanner};
//!
//! let config = ScanConfig::new("/media/movies");
//! let tree = TreeScanner::new().scan(&config).unwrap();
//!
//! println!("{} directories", tree.stats.total_dirs);
//! println!("{} media files", tree.stats.total_media);
//! ```
//!
//! Traversal is serial and follows symlinks. Unreadable directories abort the
//! scan unless [`ScanConfig::skip_unreadable`] is set, in which case they are
//! recorded as [`ScanWarning`]s.

mod scanner;

pub use scanner::TreeScanner;

// Re-export core types for convenience
pub use curator_core::{
    DirectoryNode, DirectoryTree, ScanConfig, ScanError, ScanWarning, TreeStats, WarningKind,
};
