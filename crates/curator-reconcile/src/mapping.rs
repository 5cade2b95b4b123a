//! Directory-keyed mappings and mapped-descendant collection.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use curator_catalog::{CatalogEntry, SeasonEntry};
use curator_core::DirectoryNode;

/// Insertion-ordered mapping from a directory key to one catalog object.
#[derive(Debug, Clone)]
pub struct DirectoryMapping<T> {
    entries: IndexMap<PathBuf, T>,
}

impl<T> Default for DirectoryMapping<T> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<T> DirectoryMapping<T> {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a directory, returning the previous value if any.
    pub fn insert(&mut self, directory: PathBuf, value: T) -> Option<T> {
        self.entries.insert(directory, value)
    }

    /// Look up the object mapped to a directory.
    pub fn get(&self, directory: &Path) -> Option<&T> {
        self.entries.get(directory)
    }

    /// Remove a directory, keeping the order of the others.
    pub fn remove(&mut self, directory: &Path) -> Option<T> {
        self.entries.shift_remove(directory)
    }

    pub fn contains(&self, directory: &Path) -> bool {
        self.entries.contains_key(directory)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate mappings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &T)> {
        self.entries.iter().map(|(path, value)| (path.as_path(), value))
    }
}

impl<T> FromIterator<(PathBuf, T)> for DirectoryMapping<T> {
    fn from_iter<I: IntoIterator<Item = (PathBuf, T)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Final mappings of one section.
#[derive(Debug, Clone)]
pub enum LibraryMapping {
    /// Movie directories to movies.
    Movies(DirectoryMapping<CatalogEntry>),
    /// Show directories to shows and season directories to seasons.
    Shows {
        shows: DirectoryMapping<CatalogEntry>,
        seasons: DirectoryMapping<SeasonEntry>,
    },
}

impl LibraryMapping {
    /// Top-level item mapping (movies or shows).
    pub fn items(&self) -> &DirectoryMapping<CatalogEntry> {
        match self {
            Self::Movies(movies) => movies,
            Self::Shows { shows, .. } => shows,
        }
    }

    /// Season mapping, for show libraries.
    pub fn seasons(&self) -> Option<&DirectoryMapping<SeasonEntry>> {
        match self {
            Self::Movies(_) => None,
            Self::Shows { seasons, .. } => Some(seasons),
        }
    }

    /// Identifier a directory is mapped to, if any.
    pub fn label(&self, directory: &Path) -> Option<String> {
        if let Some(item) = self.items().get(directory) {
            return Some(item.id.to_string());
        }
        self.seasons()
            .and_then(|seasons| seasons.get(directory))
            .map(|season| season.id.to_string())
    }
}

/// Collect every descendant of `node` whose path satisfies `contains`.
///
/// Descendants are visited children-first, so nested matches come before
/// their ancestors. `node` itself is never included.
pub fn collect_mapped<'a>(
    node: &'a DirectoryNode,
    contains: impl Fn(&Path) -> bool,
) -> Vec<&'a DirectoryNode> {
    let mut found = Vec::new();
    for child in &node.children {
        collect_into(child, &contains, &mut found);
    }
    found
}

fn collect_into<'a>(
    node: &'a DirectoryNode,
    contains: &impl Fn(&Path) -> bool,
    found: &mut Vec<&'a DirectoryNode>,
) {
    for child in &node.children {
        collect_into(child, contains, found);
    }
    if contains(&node.path) {
        found.push(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn franchise() -> DirectoryNode {
        DirectoryNode::new("Franchise", "/lib/Franchise", 1)
            .with_child(DirectoryNode::new("Movie A", "/lib/Franchise/Movie A", 2))
            .with_child(
                DirectoryNode::new("Trilogy", "/lib/Franchise/Trilogy", 2)
                    .with_child(DirectoryNode::new("Part 1", "/lib/Franchise/Trilogy/Part 1", 3)),
            )
    }

    #[test]
    fn test_collect_mapped_is_post_order() {
        let node = franchise();
        let found = collect_mapped(&node, |_| true);
        let names: Vec<_> = found.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Movie A", "Part 1", "Trilogy"]);
    }

    #[test]
    fn test_collect_mapped_excludes_start() {
        let node = franchise();
        let found = collect_mapped(&node, |p| p == Path::new("/lib/Franchise"));
        assert!(found.is_empty());
    }

    #[test]
    fn test_collect_mapped_filters() {
        let node = franchise();
        let found = collect_mapped(&node, |p| p.ends_with("Part 1"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].depth, 3);
    }

    #[test]
    fn test_mapping_remove_keeps_order() {
        let mut mapping: DirectoryMapping<u32> = [
            (PathBuf::from("/a"), 1),
            (PathBuf::from("/b"), 2),
            (PathBuf::from("/c"), 3),
        ]
        .into_iter()
        .collect();

        assert_eq!(mapping.remove(Path::new("/b")), Some(2));
        assert_eq!(mapping.get(Path::new("/b")), None);
        let keys: Vec<_> = mapping.iter().map(|(k, _)| k.to_path_buf()).collect();
        assert_eq!(keys, vec![PathBuf::from("/a"), PathBuf::from("/c")]);
    }
}
