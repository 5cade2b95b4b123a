//! The catalog collaborator trait.

use std::path::Path;

use crate::error::{CatalogError, Result};
use crate::model::{
    CatalogEntry, CollectionRef, EntryId, EpisodeEntry, SeasonEntry, SectionInfo,
};

/// Read and write access to a media server catalog.
///
/// Calls are blocking and are issued one at a time. Mutating calls
/// (`split`, `merge`) may invalidate identifiers returned earlier, so callers
/// re-enumerate after issuing them.
pub trait Catalog {
    /// List all library sections.
    fn sections(&self) -> Result<Vec<SectionInfo>>;

    /// Find a section by title.
    fn section(&self, name: &str) -> Result<SectionInfo> {
        self.sections()?
            .into_iter()
            .find(|section| section.title == name)
            .ok_or_else(|| CatalogError::not_found(format!("library section '{name}'")))
    }

    /// List every top-level entry (movie or show) of a section.
    fn entries(&self, section: &SectionInfo) -> Result<Vec<CatalogEntry>>;

    /// List the seasons of a show.
    fn seasons(&self, show: &EntryId) -> Result<Vec<SeasonEntry>>;

    /// List the episodes of a season.
    fn episodes(&self, season: &EntryId) -> Result<Vec<EpisodeEntry>>;

    /// Split an entry into one entry per underlying location.
    fn split(&self, id: &EntryId) -> Result<()>;

    /// Merge `others` into `survivor`.
    fn merge(&self, survivor: &EntryId, others: &[EntryId]) -> Result<()>;

    /// Find a collection by title. Fails with [`CatalogError::NotFound`] when absent.
    fn collection_by_name(&self, section: &SectionInfo, name: &str) -> Result<CollectionRef>;

    /// Create a collection with an initial member list.
    fn create_collection(
        &self,
        section: &SectionInfo,
        name: &str,
        members: &[EntryId],
    ) -> Result<CollectionRef>;

    /// Add members to an existing collection.
    fn add_to_collection(&self, collection: &CollectionRef, members: &[EntryId]) -> Result<()>;

    /// Upload a local image as the poster of an entry, season or collection.
    fn upload_poster(&self, target: &EntryId, file: &Path) -> Result<()>;

    /// Set (and lock) the sort title of a collection.
    fn set_sort_title(&self, collection: &CollectionRef, value: &str) -> Result<()>;
}
