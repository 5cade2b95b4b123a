//! Options for a reconciliation run.

use std::path::Path;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use curator_core::{DEFAULT_ARTWORK_NAME, DEFAULT_VIDEO_EXTENSIONS, ScanConfig};

use crate::error::SyncError;

/// Prefix applied to collection sort titles so collections list first.
pub const DEFAULT_SORT_PREFIX: &str = "!";

/// Options threaded through every stage of a run.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into))]
pub struct SyncOptions {
    /// Artwork base name, matched case-insensitively.
    #[builder(default = "DEFAULT_ARTWORK_NAME.to_string()")]
    pub artwork_name: String,

    /// Log candidate details.
    #[builder(default = "false")]
    pub verbose: bool,

    /// Give synthesized collections a sort title that lists them first.
    #[builder(default = "false")]
    pub prioritize_collections: bool,

    /// Prefix used for collection sort titles.
    #[builder(default = "DEFAULT_SORT_PREFIX.to_string()")]
    pub collection_sort_prefix: String,

    /// Recognized video file extensions.
    #[builder(default = "DEFAULT_VIDEO_EXTENSIONS.iter().map(|e| e.to_string()).collect()")]
    pub video_extensions: Vec<String>,

    /// Record unreadable directories as warnings instead of failing.
    #[builder(default = "false")]
    pub skip_unreadable: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            artwork_name: DEFAULT_ARTWORK_NAME.to_string(),
            verbose: false,
            prioritize_collections: false,
            collection_sort_prefix: DEFAULT_SORT_PREFIX.to_string(),
            video_extensions: DEFAULT_VIDEO_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            skip_unreadable: false,
        }
    }
}

impl SyncOptions {
    /// Create a new options builder.
    pub fn builder() -> SyncOptionsBuilder {
        SyncOptionsBuilder::default()
    }

    /// Tree builder configuration for one section location.
    pub fn scan_config(&self, root: &Path) -> Result<ScanConfig, SyncError> {
        ScanConfig::builder()
            .root(root)
            .artwork_name(self.artwork_name.clone())
            .video_extensions(self.video_extensions.clone())
            .skip_unreadable(self.skip_unreadable)
            .build()
            .map_err(|e| SyncError::InvalidOptions {
                message: e.to_string(),
            })
    }

    /// Sort title for a synthesized collection.
    pub fn sort_title(&self, name: &str) -> String {
        format!("{}{}", self.collection_sort_prefix, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let options = SyncOptions::builder().build().unwrap();
        assert_eq!(options.artwork_name, "artwork");
        assert_eq!(options.collection_sort_prefix, "!");
        assert!(!options.prioritize_collections);
        assert!(options.video_extensions.iter().any(|e| e == "mkv"));
    }

    #[test]
    fn test_scan_config_carries_options() {
        let options = SyncOptions::builder()
            .artwork_name("poster")
            .skip_unreadable(true)
            .build()
            .unwrap();
        let config = options.scan_config(Path::new("/media/movies")).unwrap();
        assert_eq!(config.artwork_name, "poster");
        assert!(config.skip_unreadable);
        assert_eq!(config.root, Path::new("/media/movies"));
    }

    #[test]
    fn test_blank_artwork_name_rejected() {
        let options = SyncOptions::builder().artwork_name(" ").build().unwrap();
        let err = options.scan_config(Path::new("/media")).unwrap_err();
        assert!(matches!(err, SyncError::InvalidOptions { .. }));
    }

    #[test]
    fn test_sort_title() {
        let options = SyncOptions::builder()
            .collection_sort_prefix("~")
            .build()
            .unwrap();
        assert_eq!(options.sort_title("Alien"), "~Alien");
        assert_eq!(SyncOptions::default().sort_title("Alien"), "!Alien");
    }
}
