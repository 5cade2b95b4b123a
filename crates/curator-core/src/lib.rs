//! Core types for curator.
//!
//! This crate provides the data structures shared by the scanner and the
//! reconciler: directory nodes and trees, scan configuration, scan errors,
//! and the path normalization used to turn media file locations into
//! directory keys.

mod config;
mod error;
mod node;
pub mod path;
mod tree;

pub use config::{DEFAULT_ARTWORK_NAME, DEFAULT_VIDEO_EXTENSIONS, ScanConfig, ScanConfigBuilder};
pub use error::{ScanError, ScanWarning, WarningKind};
pub use node::DirectoryNode;
pub use path::{base_directory, show_root};
pub use tree::{DirectoryTree, TreeStats};
