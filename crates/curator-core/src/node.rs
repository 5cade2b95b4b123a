//! Directory node type.

use std::path::PathBuf;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// A single directory in a media library tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryNode {
    /// Directory name (leaf segment of `path`).
    pub name: CompactString,

    /// Full path of the directory. Unique within one tree.
    pub path: PathBuf,

    /// Distance from the tree root (the root itself is 0).
    pub depth: u32,

    /// Artwork file found directly inside this directory.
    pub artwork: Option<PathBuf>,

    /// Recognized video files directly inside this directory.
    pub media: Vec<PathBuf>,

    /// Subdirectories, sorted by name.
    pub children: Vec<DirectoryNode>,
}

impl DirectoryNode {
    /// Create an empty node.
    pub fn new(name: impl Into<CompactString>, path: impl Into<PathBuf>, depth: u32) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            depth,
            artwork: None,
            media: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Attach an artwork file.
    pub fn with_artwork(mut self, artwork: impl Into<PathBuf>) -> Self {
        self.artwork = Some(artwork.into());
        self
    }

    /// Append a media file.
    pub fn with_media(mut self, media: impl Into<PathBuf>) -> Self {
        self.media.push(media.into());
        self
    }

    /// Append a child directory.
    pub fn with_child(mut self, child: DirectoryNode) -> Self {
        self.children.push(child);
        self
    }

    /// Visit this node and all descendants in pre-order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a DirectoryNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}
