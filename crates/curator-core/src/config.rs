//! Scan configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Base name (before the first `.`) of artwork files.
pub const DEFAULT_ARTWORK_NAME: &str = "artwork";

/// Video containers recognized as media files.
pub const DEFAULT_VIDEO_EXTENSIONS: &[&str] =
    &["asf", "avi", "mov", "mp4", "mpeg", "mpegts", "mkv", "wmv"];

/// Configuration for building a directory tree.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanConfig {
    /// Root path to scan.
    pub root: PathBuf,

    /// Artwork base name, matched case-insensitively.
    #[builder(default = "DEFAULT_ARTWORK_NAME.to_string()")]
    #[serde(default = "default_artwork_name")]
    pub artwork_name: String,

    /// Recognized video file extensions, matched case-insensitively.
    #[builder(default = "default_video_extensions()")]
    #[serde(default = "default_video_extensions")]
    pub video_extensions: Vec<String>,

    /// Record unreadable directories as warnings instead of failing.
    #[builder(default = "false")]
    #[serde(default)]
    pub skip_unreadable: bool,
}

fn default_artwork_name() -> String {
    DEFAULT_ARTWORK_NAME.to_string()
}

fn default_video_extensions() -> Vec<String> {
    DEFAULT_VIDEO_EXTENSIONS.iter().map(|ext| ext.to_string()).collect()
}

impl ScanConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref root) = self.root {
            if root.as_os_str().is_empty() {
                return Err("Root path cannot be empty".to_string());
            }
        } else {
            return Err("Root path is required".to_string());
        }
        if self.artwork_name.as_ref().is_some_and(|name| name.trim().is_empty()) {
            return Err("Artwork name cannot be empty".to_string());
        }
        Ok(())
    }
}

impl ScanConfig {
    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Create a simple config for scanning a path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            artwork_name: default_artwork_name(),
            video_extensions: default_video_extensions(),
            skip_unreadable: false,
        }
    }

    /// Check if a file name is an artwork file.
    pub fn is_artwork(&self, file_name: &str) -> bool {
        file_name
            .split('.')
            .next()
            .is_some_and(|stem| stem.eq_ignore_ascii_case(&self.artwork_name))
    }

    /// Check if a file name has a recognized video extension.
    pub fn is_media(&self, file_name: &str) -> bool {
        match file_name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => self
                .video_extensions
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext)),
            _ => false,
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new(".")
    }
}
