//! Catalog model types.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Opaque identifier of a catalog object (Plex rating key).
///
/// Identifiers can go stale: a split or merge may retire them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub String);

impl EntryId {
    /// Create a new identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Type of library section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// Flat library of movies.
    Movie,
    /// Show/season/episode library.
    Show,
    /// Any other section type (music, photos, ...).
    Other(String),
}

impl SectionKind {
    /// Parse the section type string reported by the server.
    pub fn from_type(value: &str) -> Self {
        match value {
            "movie" => Self::Movie,
            "show" => Self::Show,
            other => Self::Other(other.to_string()),
        }
    }

    /// Section type string as reported by the server.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Movie => "movie",
            Self::Show => "show",
            Self::Other(other) => other,
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A library section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionInfo {
    /// Section key.
    pub id: String,
    /// Section title (the "library name").
    pub title: String,
    /// Section type.
    pub kind: SectionKind,
    /// Physical roots backing the section.
    pub locations: Vec<PathBuf>,
}

/// A movie or show record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: EntryId,
    pub title: String,
    /// Files (movies) or folders (shows) backing this entry.
    pub locations: Vec<PathBuf>,
}

/// A season of a show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonEntry {
    pub id: EntryId,
    /// Season number (0 for specials).
    pub number: u32,
    /// Title of the show owning this season.
    pub show_title: String,
}

/// An episode of a season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeEntry {
    pub id: EntryId,
    pub title: String,
    /// Files backing this episode.
    pub locations: Vec<PathBuf>,
}

/// A named grouping of entries within a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRef {
    pub id: EntryId,
    pub title: String,
    /// Key of the section owning the collection.
    pub section_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_kind_from_type() {
        assert_eq!(SectionKind::from_type("movie"), SectionKind::Movie);
        assert_eq!(SectionKind::from_type("show"), SectionKind::Show);
        assert_eq!(
            SectionKind::from_type("artist"),
            SectionKind::Other("artist".to_string())
        );
        assert_eq!(SectionKind::from_type("artist").to_string(), "artist");
    }

    #[test]
    fn test_entry_id_display() {
        let id = EntryId::new("1234");
        assert_eq!(id.to_string(), "1234");
        assert_eq!(EntryId::from("1234"), id);
    }
}
