//! Collection synthesis and artwork assignment.

use std::path::Path;

use tracing::{debug, info};

use curator_catalog::{Catalog, CatalogError, CollectionRef, EntryId, SectionInfo};
use curator_core::{DirectoryNode, DirectoryTree};

use crate::mapping::{LibraryMapping, collect_mapped};
use crate::options::SyncOptions;
use crate::report::SyncReport;

/// Turns top-level directories into collections and uploads artwork.
///
/// A top-level directory with mapped descendants becomes a collection named
/// after it. A top-level directory that is itself mapped is a single item.
/// Member and season artwork is uploaded before collection artwork.
pub struct CollectionSynthesizer<'a, C: Catalog + ?Sized> {
    catalog: &'a C,
    section: &'a SectionInfo,
    options: &'a SyncOptions,
}

impl<'a, C: Catalog + ?Sized> CollectionSynthesizer<'a, C> {
    pub fn new(catalog: &'a C, section: &'a SectionInfo, options: &'a SyncOptions) -> Self {
        Self {
            catalog,
            section,
            options,
        }
    }

    /// Process every top-level directory of every tree.
    pub fn synthesize(
        &self,
        trees: &[DirectoryTree],
        mapping: &LibraryMapping,
        report: &mut SyncReport,
    ) -> Result<(), CatalogError> {
        for tree in trees {
            for entry in tree.top_level() {
                self.process(entry, mapping, report)?;
            }
        }
        Ok(())
    }

    fn process(
        &self,
        entry: &DirectoryNode,
        mapping: &LibraryMapping,
        report: &mut SyncReport,
    ) -> Result<(), CatalogError> {
        let items = mapping.items();
        let members = collect_mapped(entry, |path| items.contains(path));
        if !members.is_empty() {
            return self.apply_collection(entry, &members, mapping, report);
        }
        if let Some(item) = items.get(&entry.path) {
            if let Some(artwork) = &entry.artwork {
                self.upload(&item.id, artwork, &item.title, report)?;
            }
            if let Some(seasons) = mapping.seasons() {
                for child in &entry.children {
                    if let (Some(artwork), Some(season)) = (&child.artwork, seasons.get(&child.path)) {
                        let label = format!("season {} of '{}'", season.number, season.show_title);
                        self.upload(&season.id, artwork, &label, report)?;
                    }
                }
            }
            return Ok(());
        }
        debug!(directory = %entry.path.display(), "nothing mapped under directory, skipping");
        Ok(())
    }

    fn apply_collection(
        &self,
        entry: &DirectoryNode,
        members: &[&DirectoryNode],
        mapping: &LibraryMapping,
        report: &mut SyncReport,
    ) -> Result<(), CatalogError> {
        let items = mapping.items();
        let name = entry.name.as_str();
        let ids: Vec<EntryId> = members
            .iter()
            .filter_map(|node| items.get(&node.path))
            .map(|item| item.id.clone())
            .collect();

        let collection = self.find_or_create(name, &ids, report)?;

        for node in members {
            if let (Some(artwork), Some(item)) = (&node.artwork, items.get(&node.path)) {
                self.upload(&item.id, artwork, &item.title, report)?;
            }
        }

        if let Some(seasons) = mapping.seasons() {
            for node in collect_mapped(entry, |path| seasons.contains(path)) {
                if let (Some(artwork), Some(season)) = (&node.artwork, seasons.get(&node.path)) {
                    let label = format!("season {} of '{}'", season.number, season.show_title);
                    self.upload(&season.id, artwork, &label, report)?;
                }
            }
        }

        if let Some(artwork) = &entry.artwork {
            let label = format!("collection '{}'", collection.title);
            self.upload(&collection.id, artwork, &label, report)?;
        }

        if self.options.prioritize_collections {
            let sort_title = self.options.sort_title(name);
            self.catalog.set_sort_title(&collection, &sort_title)?;
            debug!(collection = name, sort_title = %sort_title, "set collection sort title");
        }
        Ok(())
    }

    fn find_or_create(
        &self,
        name: &str,
        members: &[EntryId],
        report: &mut SyncReport,
    ) -> Result<CollectionRef, CatalogError> {
        match self.catalog.collection_by_name(self.section, name) {
            Ok(collection) => {
                self.catalog.add_to_collection(&collection, members)?;
                info!(collection = name, members = members.len(), "updated collection");
                report.collections_updated.push(name.to_string());
                Ok(collection)
            }
            Err(err) if err.is_not_found() => {
                let collection = self.catalog.create_collection(self.section, name, members)?;
                info!(collection = name, members = members.len(), "created collection");
                report.collections_created.push(name.to_string());
                Ok(collection)
            }
            Err(err) => Err(err),
        }
    }

    fn upload(
        &self,
        target: &EntryId,
        artwork: &Path,
        label: &str,
        report: &mut SyncReport,
    ) -> Result<(), CatalogError> {
        self.catalog.upload_poster(target, artwork)?;
        info!(artwork = %artwork.display(), item = label, "applied artwork to poster");
        report.posters_uploaded += 1;
        Ok(())
    }
}
