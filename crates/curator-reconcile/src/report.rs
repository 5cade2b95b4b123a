//! Run report.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use curator_catalog::{EntryId, SectionKind};

/// Why a directory or entry was left out of the mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguityKind {
    /// A movie still had other than one location after splitting.
    MovieLocations,
    /// A season's episodes live in other than one directory.
    SeasonDirectories,
    /// Two or more seasons claim the same directory.
    SeasonCollision,
    /// A show's seasons disagree on the show directory.
    ShowRoots,
    /// Shows share a directory but their seasons conflict.
    ShowCollision,
    /// A merged show no longer resolves to the shared directory.
    MergedShowMoved,
}

/// A skipped directory together with the entries that competed for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ambiguity {
    pub kind: AmbiguityKind,
    /// Directories involved.
    pub directories: Vec<PathBuf>,
    /// Human-readable descriptions of the competing entries.
    pub candidates: Vec<String>,
}

impl Ambiguity {
    pub fn new(kind: AmbiguityKind, directories: Vec<PathBuf>, candidates: Vec<String>) -> Self {
        Self {
            kind,
            directories,
            candidates,
        }
    }
}

/// A merge request issued during the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRecord {
    /// Directory the merged entries shared.
    pub directory: PathBuf,
    pub survivor: EntryId,
    pub merged: Vec<EntryId>,
}

/// Summary of one reconciliation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    /// Section title.
    pub section: String,
    /// Section type.
    pub kind: SectionKind,
    /// Section locations a tree was built for.
    pub roots: Vec<PathBuf>,
    /// Entries split because they spanned several locations.
    pub splits: Vec<EntryId>,
    /// Merges requested.
    pub merges: Vec<MergeRecord>,
    /// Directories mapped to a movie or show.
    pub mapped_items: usize,
    /// Directories mapped to a season.
    pub mapped_seasons: usize,
    /// Directories or entries skipped as ambiguous.
    pub ambiguities: Vec<Ambiguity>,
    /// Collections created.
    pub collections_created: Vec<String>,
    /// Existing collections that received members.
    pub collections_updated: Vec<String>,
    /// Posters uploaded to entries, seasons and collections.
    pub posters_uploaded: usize,
    /// Directories skipped while building trees.
    pub scan_warnings: usize,
}

impl SyncReport {
    /// Create an empty report for a section.
    pub fn new(section: impl Into<String>, kind: SectionKind) -> Self {
        Self {
            section: section.into(),
            kind,
            roots: Vec::new(),
            splits: Vec::new(),
            merges: Vec::new(),
            mapped_items: 0,
            mapped_seasons: 0,
            ambiguities: Vec::new(),
            collections_created: Vec::new(),
            collections_updated: Vec::new(),
            posters_uploaded: 0,
            scan_warnings: 0,
        }
    }

    /// Record an ambiguity.
    pub fn ambiguous(
        &mut self,
        kind: AmbiguityKind,
        directories: Vec<PathBuf>,
        candidates: Vec<String>,
    ) {
        self.ambiguities.push(Ambiguity::new(kind, directories, candidates));
    }

    /// Number of ambiguities of one kind.
    pub fn ambiguity_count(&self, kind: AmbiguityKind) -> usize {
        self.ambiguities.iter().filter(|a| a.kind == kind).count()
    }

    /// Check if anything was skipped as ambiguous.
    pub fn has_ambiguities(&self) -> bool {
        !self.ambiguities.is_empty()
    }
}
