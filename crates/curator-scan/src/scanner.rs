//! JWalk-based directory tree builder.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use compact_str::CompactString;
use jwalk::{Parallelism, WalkDir};
use tracing::{debug, warn};

use curator_core::{DirectoryNode, DirectoryTree, ScanConfig, ScanError, ScanWarning, TreeStats};

/// Builds a [`DirectoryTree`] for a library location.
#[derive(Debug, Default)]
pub struct TreeScanner;

impl TreeScanner {
    /// Create a new scanner.
    pub fn new() -> Self {
        Self
    }

    /// Scan the configured root.
    pub fn scan(&self, config: &ScanConfig) -> Result<DirectoryTree, ScanError> {
        let start = Instant::now();
        // Node paths keep the root as given so they line up with the
        // locations the catalog reports.
        let root_path = config.root.clone();
        let metadata = fs::metadata(&root_path).map_err(|e| ScanError::io(&root_path, e))?;

        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory { path: root_path });
        }

        let mut warnings = Vec::new();
        let entries = self.collect_entries(config, &root_path, &mut warnings)?;
        let root_node = self.build_tree(config, &root_path, entries);
        let stats = TreeStats::from_root(&root_node);

        debug!(
            root = %root_path.display(),
            dirs = stats.total_dirs,
            media = stats.total_media,
            "built directory tree"
        );

        Ok(DirectoryTree::new(
            root_node,
            root_path,
            config.clone(),
            stats,
            start.elapsed(),
            warnings,
        ))
    }

    /// Collect every directory's entries, keyed by parent path.
    fn collect_entries(
        &self,
        config: &ScanConfig,
        root_path: &Path,
        warnings: &mut Vec<ScanWarning>,
    ) -> Result<HashMap<PathBuf, Vec<EntryInfo>>, ScanError> {
        let walker = WalkDir::new(root_path)
            .parallelism(Parallelism::Serial)
            .sort(true)
            .skip_hidden(false)
            .follow_links(true)
            .min_depth(1);

        let mut entries_by_parent: HashMap<PathBuf, Vec<EntryInfo>> = HashMap::new();

        for entry_result in walker {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
                    let error = match err.io_error() {
                        Some(io) => ScanError::io(&path, std::io::Error::new(io.kind(), io.to_string())),
                        None => ScanError::Unreadable {
                            path: path.clone(),
                            message: err.to_string(),
                        },
                    };
                    if !config.skip_unreadable {
                        return Err(error);
                    }
                    warn!(path = %path.display(), "skipping unreadable entry: {error}");
                    warnings.push(ScanWarning::from_error(&error));
                    continue;
                }
            };

            let file_type = entry.file_type();
            let kind = if file_type.is_dir() {
                EntryKind::Directory
            } else if file_type.is_file() {
                EntryKind::File
            } else {
                continue;
            };

            let path = entry.path();
            if let Some(parent) = path.parent() {
                entries_by_parent
                    .entry(parent.to_path_buf())
                    .or_default()
                    .push(EntryInfo {
                        name: entry.file_name().to_string_lossy().into(),
                        path: path.clone(),
                        kind,
                    });
            }
        }

        Ok(entries_by_parent)
    }

    /// Build tree structure from collected entries.
    fn build_tree(
        &self,
        config: &ScanConfig,
        root_path: &Path,
        mut entries_by_parent: HashMap<PathBuf, Vec<EntryInfo>>,
    ) -> DirectoryNode {
        self.build_node(config, root_path, 0, &mut entries_by_parent)
    }

    /// Recursively build a node and its children.
    fn build_node(
        &self,
        config: &ScanConfig,
        path: &Path,
        depth: u32,
        entries_by_parent: &mut HashMap<PathBuf, Vec<EntryInfo>>,
    ) -> DirectoryNode {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());

        let mut node = DirectoryNode::new(name, path, depth);

        let mut children_entries = entries_by_parent.remove(path).unwrap_or_default();
        children_entries.sort_by(|a, b| a.name.cmp(&b.name));

        for entry in children_entries {
            match entry.kind {
                EntryKind::Directory => {
                    let child = self.build_node(config, &entry.path, depth + 1, entries_by_parent);
                    node.children.push(child);
                }
                EntryKind::File if config.is_artwork(&entry.name) => {
                    node.artwork = Some(entry.path);
                }
                EntryKind::File if config.is_media(&entry.name) => {
                    node.media.push(entry.path);
                }
                EntryKind::File => {}
            }
        }

        node
    }
}

/// Kind of directory entry kept for tree building.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    File,
    Directory,
}

/// Temporary struct for collecting entry information.
struct EntryInfo {
    name: CompactString,
    path: PathBuf,
    kind: EntryKind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_library() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir_all(root.join("Franchise/Movie B")).unwrap();
        fs::create_dir_all(root.join("Franchise/Movie A")).unwrap();
        fs::create_dir_all(root.join("Solo")).unwrap();

        fs::write(root.join("Franchise/Artwork.JPG"), "img").unwrap();
        fs::write(root.join("Franchise/Movie A/a.mkv"), "video").unwrap();
        fs::write(root.join("Franchise/Movie A/a.srt"), "subs").unwrap();
        fs::write(root.join("Franchise/Movie B/b.MP4"), "video").unwrap();
        fs::write(root.join("Franchise/Movie B/artwork.png"), "img").unwrap();
        fs::write(root.join("Solo/solo.avi"), "video").unwrap();
        fs::write(root.join("Solo/notes.txt"), "text").unwrap();

        temp
    }

    #[test]
    fn test_basic_scan() {
        let temp = create_test_library();
        let tree = TreeScanner::new().scan(&ScanConfig::new(temp.path())).unwrap();

        assert_eq!(tree.stats.total_dirs, 5);
        assert_eq!(tree.stats.total_media, 3);
        assert_eq!(tree.stats.total_artwork, 2);
        assert_eq!(tree.stats.max_depth, 2);
        assert!(!tree.has_warnings());
    }

    #[test]
    fn test_children_sorted_by_name() {
        let temp = create_test_library();
        let tree = TreeScanner::new().scan(&ScanConfig::new(temp.path())).unwrap();

        let names: Vec<_> = tree.root.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Franchise", "Solo"]);

        let franchise = &tree.root.children[0];
        let names: Vec<_> = franchise.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Movie A", "Movie B"]);
        assert_eq!(franchise.children[0].depth, 2);
    }

    #[test]
    fn test_artwork_and_media_detection() {
        let temp = create_test_library();
        let tree = TreeScanner::new().scan(&ScanConfig::new(temp.path())).unwrap();
        let root = &tree.root_path;

        let franchise = &tree.root.children[0];
        assert_eq!(franchise.artwork, Some(root.join("Franchise/Artwork.JPG")));
        assert!(franchise.media.is_empty());

        let movie_a = &franchise.children[0];
        assert_eq!(movie_a.artwork, None);
        assert_eq!(movie_a.media, vec![root.join("Franchise/Movie A/a.mkv")]);

        let movie_b = &franchise.children[1];
        assert_eq!(movie_b.artwork, Some(root.join("Franchise/Movie B/artwork.png")));
        assert_eq!(movie_b.media, vec![root.join("Franchise/Movie B/b.MP4")]);

        let solo = &tree.root.children[1];
        assert_eq!(solo.media, vec![root.join("Solo/solo.avi")]);
    }

    #[test]
    fn test_custom_artwork_name() {
        let temp = create_test_library();
        fs::write(temp.path().join("Solo/poster.jpg"), "img").unwrap();

        let config = ScanConfig::builder()
            .root(temp.path())
            .artwork_name("poster")
            .build()
            .unwrap();
        let tree = TreeScanner::new().scan(&config).unwrap();

        let solo = &tree.root.children[1];
        assert!(solo.artwork.as_ref().unwrap().ends_with("poster.jpg"));
        // artwork.* files are no longer artwork and are not media either
        assert_eq!(tree.stats.total_artwork, 1);
    }

    #[test]
    fn test_root_must_be_directory() {
        let temp = create_test_library();
        let file = temp.path().join("Solo/solo.avi");
        let err = TreeScanner::new().scan(&ScanConfig::new(&file)).unwrap_err();
        assert!(matches!(err, ScanError::NotADirectory { .. }));
    }

    #[test]
    fn test_missing_root() {
        let temp = TempDir::new().unwrap();
        let err = TreeScanner::new()
            .scan(&ScanConfig::new(temp.path().join("missing")))
            .unwrap_err();
        assert!(matches!(err, ScanError::NotFound { .. }));
    }
}
