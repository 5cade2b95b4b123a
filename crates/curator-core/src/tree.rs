//! Directory tree container, statistics and the annotated tree dump.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::config::ScanConfig;
use crate::error::ScanWarning;
use crate::node::DirectoryNode;

/// Summary statistics for a scanned tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    /// Total number of directories, including the root.
    pub total_dirs: u64,
    /// Total number of recognized media files.
    pub total_media: u64,
    /// Number of directories carrying artwork.
    pub total_artwork: u64,
    /// Maximum depth reached.
    pub max_depth: u32,
}

impl TreeStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a directory node.
    pub fn record_dir(&mut self, node: &DirectoryNode) {
        self.total_dirs += 1;
        self.total_media += node.media.len() as u64;
        if node.artwork.is_some() {
            self.total_artwork += 1;
        }
        self.max_depth = self.max_depth.max(node.depth);
    }

    /// Compute stats for an existing tree.
    pub fn from_root(root: &DirectoryNode) -> Self {
        let mut stats = Self::new();
        root.walk(&mut |node| stats.record_dir(node));
        stats
    }
}

/// Complete scanned directory tree for one library location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryTree {
    /// Root node of the tree.
    pub root: DirectoryNode,

    /// Root path that was scanned.
    pub root_path: PathBuf,

    /// When this scan was performed.
    pub scanned_at: SystemTime,

    /// Duration of the scan.
    pub scan_duration: Duration,

    /// Scan configuration used.
    pub config: ScanConfig,

    /// Summary statistics.
    pub stats: TreeStats,

    /// Warnings encountered during scan.
    pub warnings: Vec<ScanWarning>,
}

impl DirectoryTree {
    /// Create a new directory tree.
    pub fn new(
        root: DirectoryNode,
        root_path: PathBuf,
        config: ScanConfig,
        stats: TreeStats,
        scan_duration: Duration,
        warnings: Vec<ScanWarning>,
    ) -> Self {
        Self {
            root,
            root_path,
            scanned_at: SystemTime::now(),
            scan_duration,
            config,
            stats,
            warnings,
        }
    }

    /// Top-level entries of the tree (the root's direct subdirectories).
    pub fn top_level(&self) -> &[DirectoryNode] {
        &self.root.children
    }

    /// Check if there were any warnings during scanning.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Render the tree with each directory's mapping state.
    ///
    /// `label` returns the identifier a directory is mapped to, if any.
    pub fn render(&self, label: impl Fn(&Path) -> Option<String>) -> String {
        let mut out = String::new();
        render_node(&self.root, 0, &label, &mut out);
        out
    }
}

fn render_node(
    node: &DirectoryNode,
    depth: usize,
    label: &impl Fn(&Path) -> Option<String>,
    out: &mut String,
) {
    let indent = "    ".repeat(depth);
    out.push('\n');
    match label(&node.path) {
        Some(id) => {
            let _ = writeln!(out, "{indent}[MAPPED : {id}]");
        }
        None => {
            let _ = writeln!(out, "{indent}[NOT MAPPED]");
        }
    }
    let marker = if node.artwork.is_some() { " (A)" } else { "" };
    let _ = writeln!(out, "{indent}{}{marker}", node.name);
    for media in &node.media {
        let _ = writeln!(out, "{indent}* {}", media.display());
    }
    for child in &node.children {
        render_node(child, depth + 1, label, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> DirectoryTree {
        let root = DirectoryNode::new("lib", "/lib", 0).with_child(
            DirectoryNode::new("Alien", "/lib/Alien", 1)
                .with_artwork("/lib/Alien/artwork.png")
                .with_media("/lib/Alien/alien.mkv"),
        );
        let stats = TreeStats::from_root(&root);
        DirectoryTree::new(
            root,
            PathBuf::from("/lib"),
            ScanConfig::new("/lib"),
            stats,
            Duration::ZERO,
            Vec::new(),
        )
    }

    #[test]
    fn test_tree_stats_from_root() {
        let tree = tree();
        assert_eq!(tree.stats.total_dirs, 2);
        assert_eq!(tree.stats.total_media, 1);
        assert_eq!(tree.stats.total_artwork, 1);
        assert_eq!(tree.stats.max_depth, 1);
    }

    #[test]
    fn test_render_marks_mapped_dirs() {
        let tree = tree();
        let out = tree.render(|path| (path == Path::new("/lib/Alien")).then(|| "42".to_string()));

        assert!(out.contains("[NOT MAPPED]\nlib\n"));
        assert!(out.contains("    [MAPPED : 42]\n    Alien (A)\n"));
        assert!(out.contains("    * /lib/Alien/alien.mkv"));
    }
}
