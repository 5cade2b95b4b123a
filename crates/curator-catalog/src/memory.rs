//! In-process catalog.
//!
//! [`MemoryCatalog`] mirrors the server-side semantics the reconciler relies
//! on: splitting an entry retires its identifier and creates one entry per
//! underlying location (or per show folder), merging folds locations and
//! seasons into the survivor, and adding collection members is set-like.
//! Every mutating call is recorded as a [`Mutation`].

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use curator_core::{base_directory, show_root};

use crate::catalog::Catalog;
use crate::error::{CatalogError, Result};
use crate::model::{
    CatalogEntry, CollectionRef, EntryId, EpisodeEntry, SeasonEntry, SectionInfo, SectionKind,
};

/// A mutating call received by a [`MemoryCatalog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Split { id: EntryId },
    Merge { survivor: EntryId, merged: Vec<EntryId> },
    CreateCollection { title: String, members: Vec<EntryId> },
    AddToCollection { collection: EntryId, members: Vec<EntryId> },
    UploadPoster { target: EntryId, file: PathBuf },
    SetSortTitle { collection: EntryId, value: String },
}

/// Snapshot of a collection held by a [`MemoryCatalog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionState {
    pub id: EntryId,
    pub title: String,
    pub members: Vec<EntryId>,
    pub sort_title: Option<String>,
    pub poster: Option<PathBuf>,
}

#[derive(Debug, Clone)]
struct Item {
    id: EntryId,
    section: String,
    title: String,
    locations: Vec<PathBuf>,
    seasons: Vec<Season>,
    poster: Option<PathBuf>,
}

#[derive(Debug, Clone)]
struct Season {
    id: EntryId,
    number: u32,
    episodes: Vec<Episode>,
    poster: Option<PathBuf>,
}

#[derive(Debug, Clone)]
struct Episode {
    id: EntryId,
    title: String,
    locations: Vec<PathBuf>,
}

#[derive(Debug, Clone)]
struct Collection {
    id: EntryId,
    section: String,
    title: String,
    members: Vec<EntryId>,
    sort_title: Option<String>,
    poster: Option<PathBuf>,
}

#[derive(Debug, Default)]
struct State {
    next_id: u64,
    sections: Vec<SectionInfo>,
    items: Vec<Item>,
    collections: Vec<Collection>,
    mutations: Vec<Mutation>,
}

impl State {
    fn next_id(&mut self) -> EntryId {
        self.next_id += 1;
        EntryId(self.next_id.to_string())
    }

    fn item(&self, id: &EntryId) -> Result<&Item> {
        self.items
            .iter()
            .find(|item| &item.id == id)
            .ok_or_else(|| CatalogError::not_found(format!("entry {id}")))
    }

    fn item_index(&self, id: &EntryId) -> Result<usize> {
        self.items
            .iter()
            .position(|item| &item.id == id)
            .ok_or_else(|| CatalogError::not_found(format!("entry {id}")))
    }

    fn season_mut(&mut self, id: &EntryId) -> Option<&mut Season> {
        self.items
            .iter_mut()
            .flat_map(|item| item.seasons.iter_mut())
            .find(|season| &season.id == id)
    }

    /// Split a show into one show per show folder.
    fn split_show(&mut self, item: Item) -> Vec<Item> {
        let mut roots: Vec<PathBuf> = Vec::new();
        for location in item.seasons.iter().flat_map(episode_locations) {
            let root = show_root(&base_directory(location));
            if !roots.contains(&root) {
                roots.push(root);
            }
        }

        let mut shows = Vec::new();
        for root in roots {
            let mut seasons = Vec::new();
            for season in &item.seasons {
                let episodes: Vec<Episode> = season
                    .episodes
                    .iter()
                    .filter_map(|episode| {
                        let locations: Vec<PathBuf> = episode
                            .locations
                            .iter()
                            .filter(|l| show_root(&base_directory(l)) == root)
                            .cloned()
                            .collect();
                        (!locations.is_empty()).then(|| Episode {
                            id: self.next_id(),
                            title: episode.title.clone(),
                            locations,
                        })
                    })
                    .collect();
                if !episodes.is_empty() {
                    seasons.push(Season {
                        id: self.next_id(),
                        number: season.number,
                        episodes,
                        poster: None,
                    });
                }
            }
            shows.push(Item {
                id: self.next_id(),
                section: item.section.clone(),
                title: item.title.clone(),
                locations: vec![root],
                seasons,
                poster: None,
            });
        }
        shows
    }
}

fn episode_locations(season: &Season) -> impl Iterator<Item = &PathBuf> {
    season.episodes.iter().flat_map(|episode| episode.locations.iter())
}

/// [`Catalog`] kept entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    state: RefCell<State>,
}

impl MemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a library section.
    pub fn add_section<P: Into<PathBuf>>(
        &self,
        title: &str,
        kind: SectionKind,
        locations: impl IntoIterator<Item = P>,
    ) -> SectionInfo {
        let mut state = self.state.borrow_mut();
        let section = SectionInfo {
            id: state.next_id().0,
            title: title.to_string(),
            kind,
            locations: locations.into_iter().map(Into::into).collect(),
        };
        state.sections.push(section.clone());
        section
    }

    /// Add a movie backed by the given files.
    pub fn add_movie<P: Into<PathBuf>>(
        &self,
        section: &SectionInfo,
        title: &str,
        locations: impl IntoIterator<Item = P>,
    ) -> EntryId {
        let mut state = self.state.borrow_mut();
        let id = state.next_id();
        state.items.push(Item {
            id: id.clone(),
            section: section.id.clone(),
            title: title.to_string(),
            locations: locations.into_iter().map(Into::into).collect(),
            seasons: Vec::new(),
            poster: None,
        });
        id
    }

    /// Add a show without seasons.
    pub fn add_show(&self, section: &SectionInfo, title: &str) -> EntryId {
        self.add_movie(section, title, Vec::<PathBuf>::new())
    }

    /// Add a season to a show.
    pub fn add_season(&self, show: &EntryId, number: u32) -> EntryId {
        let mut state = self.state.borrow_mut();
        let id = state.next_id();
        if let Some(item) = state.items.iter_mut().find(|item| &item.id == show) {
            item.seasons.push(Season {
                id: id.clone(),
                number,
                episodes: Vec::new(),
                poster: None,
            });
        }
        id
    }

    /// Add an episode backed by the given files to a season.
    pub fn add_episode<P: Into<PathBuf>>(
        &self,
        season: &EntryId,
        title: &str,
        locations: impl IntoIterator<Item = P>,
    ) -> EntryId {
        let mut state = self.state.borrow_mut();
        let id = state.next_id();
        let locations: Vec<PathBuf> = locations.into_iter().map(Into::into).collect();
        if let Some(entry) = state.season_mut(season) {
            entry.episodes.push(Episode {
                id: id.clone(),
                title: title.to_string(),
                locations,
            });
        }
        id
    }

    /// Add an existing collection.
    pub fn add_collection(&self, section: &SectionInfo, title: &str, members: &[EntryId]) -> EntryId {
        let mut state = self.state.borrow_mut();
        let id = state.next_id();
        state.collections.push(Collection {
            id: id.clone(),
            section: section.id.clone(),
            title: title.to_string(),
            members: members.to_vec(),
            sort_title: None,
            poster: None,
        });
        id
    }

    /// All mutating calls received so far, in order.
    pub fn mutations(&self) -> Vec<Mutation> {
        self.state.borrow().mutations.clone()
    }

    /// Check if an entry still exists.
    pub fn contains(&self, id: &EntryId) -> bool {
        self.state.borrow().items.iter().any(|item| &item.id == id)
    }

    /// Find a current entry by title.
    pub fn entry_by_title(&self, title: &str) -> Option<CatalogEntry> {
        let state = self.state.borrow();
        state
            .items
            .iter()
            .find(|item| item.title == title)
            .map(to_entry)
    }

    /// Poster uploaded to an entry or season.
    pub fn poster(&self, id: &EntryId) -> Option<PathBuf> {
        let state = self.state.borrow();
        state
            .items
            .iter()
            .find(|item| &item.id == id)
            .map(|item| item.poster.clone())
            .or_else(|| {
                state
                    .items
                    .iter()
                    .flat_map(|item| item.seasons.iter())
                    .find(|season| &season.id == id)
                    .map(|season| season.poster.clone())
            })
            .flatten()
    }

    /// Snapshot of a collection by title.
    pub fn collection(&self, section: &SectionInfo, title: &str) -> Option<CollectionState> {
        let state = self.state.borrow();
        state
            .collections
            .iter()
            .find(|c| c.section == section.id && c.title == title)
            .map(|c| CollectionState {
                id: c.id.clone(),
                title: c.title.clone(),
                members: c.members.clone(),
                sort_title: c.sort_title.clone(),
                poster: c.poster.clone(),
            })
    }

    /// Number of collections in a section.
    pub fn collection_count(&self, section: &SectionInfo) -> usize {
        let state = self.state.borrow();
        state.collections.iter().filter(|c| c.section == section.id).count()
    }
}

fn to_entry(item: &Item) -> CatalogEntry {
    let locations = if item.seasons.is_empty() {
        item.locations.clone()
    } else {
        let mut roots: Vec<PathBuf> = Vec::new();
        for location in item.seasons.iter().flat_map(episode_locations) {
            let root = show_root(&base_directory(location));
            if !roots.contains(&root) {
                roots.push(root);
            }
        }
        roots
    };
    CatalogEntry {
        id: item.id.clone(),
        title: item.title.clone(),
        locations,
    }
}

impl Catalog for MemoryCatalog {
    fn sections(&self) -> Result<Vec<SectionInfo>> {
        Ok(self.state.borrow().sections.clone())
    }

    fn entries(&self, section: &SectionInfo) -> Result<Vec<CatalogEntry>> {
        let state = self.state.borrow();
        Ok(state
            .items
            .iter()
            .filter(|item| item.section == section.id)
            .map(to_entry)
            .collect())
    }

    fn seasons(&self, show: &EntryId) -> Result<Vec<SeasonEntry>> {
        let state = self.state.borrow();
        let item = state.item(show)?;
        Ok(item
            .seasons
            .iter()
            .map(|season| SeasonEntry {
                id: season.id.clone(),
                number: season.number,
                show_title: item.title.clone(),
            })
            .collect())
    }

    fn episodes(&self, season: &EntryId) -> Result<Vec<EpisodeEntry>> {
        let state = self.state.borrow();
        let season = state
            .items
            .iter()
            .flat_map(|item| item.seasons.iter())
            .find(|s| &s.id == season)
            .ok_or_else(|| CatalogError::not_found(format!("season {season}")))?;
        Ok(season
            .episodes
            .iter()
            .map(|episode| EpisodeEntry {
                id: episode.id.clone(),
                title: episode.title.clone(),
                locations: episode.locations.clone(),
            })
            .collect())
    }

    fn split(&self, id: &EntryId) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let index = state.item_index(id)?;
        let item = state.items.remove(index);
        let replacements = if item.seasons.is_empty() {
            let mut movies = Vec::new();
            for location in &item.locations {
                movies.push(Item {
                    id: state.next_id(),
                    section: item.section.clone(),
                    title: item.title.clone(),
                    locations: vec![location.clone()],
                    seasons: Vec::new(),
                    poster: None,
                });
            }
            movies
        } else {
            state.split_show(item)
        };
        for (offset, replacement) in replacements.into_iter().enumerate() {
            state.items.insert(index + offset, replacement);
        }
        state.mutations.push(Mutation::Split { id: id.clone() });
        Ok(())
    }

    fn merge(&self, survivor: &EntryId, others: &[EntryId]) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.item(survivor)?;
        for other in others {
            state.item(other)?;
        }
        let mut absorbed = Vec::new();
        for other in others {
            let index = state.item_index(other)?;
            absorbed.push(state.items.remove(index));
        }
        let index = state.item_index(survivor)?;
        let target = &mut state.items[index];
        for item in absorbed {
            target.locations.extend(item.locations);
            for season in item.seasons {
                match target.seasons.iter_mut().find(|s| s.number == season.number) {
                    Some(existing) => existing.episodes.extend(season.episodes),
                    None => target.seasons.push(season),
                }
            }
        }
        target.seasons.sort_by_key(|season| season.number);
        state.mutations.push(Mutation::Merge {
            survivor: survivor.clone(),
            merged: others.to_vec(),
        });
        Ok(())
    }

    fn collection_by_name(&self, section: &SectionInfo, name: &str) -> Result<CollectionRef> {
        let state = self.state.borrow();
        state
            .collections
            .iter()
            .find(|c| c.section == section.id && c.title == name)
            .map(|c| CollectionRef {
                id: c.id.clone(),
                title: c.title.clone(),
                section_id: c.section.clone(),
            })
            .ok_or_else(|| CatalogError::not_found(format!("collection '{name}'")))
    }

    fn create_collection(
        &self,
        section: &SectionInfo,
        name: &str,
        members: &[EntryId],
    ) -> Result<CollectionRef> {
        let mut state = self.state.borrow_mut();
        for member in members {
            state.item(member)?;
        }
        let id = state.next_id();
        state.collections.push(Collection {
            id: id.clone(),
            section: section.id.clone(),
            title: name.to_string(),
            members: members.to_vec(),
            sort_title: None,
            poster: None,
        });
        state.mutations.push(Mutation::CreateCollection {
            title: name.to_string(),
            members: members.to_vec(),
        });
        Ok(CollectionRef {
            id,
            title: name.to_string(),
            section_id: section.id.clone(),
        })
    }

    fn add_to_collection(&self, collection: &CollectionRef, members: &[EntryId]) -> Result<()> {
        let mut state = self.state.borrow_mut();
        for member in members {
            state.item(member)?;
        }
        let target = state
            .collections
            .iter_mut()
            .find(|c| c.id == collection.id)
            .ok_or_else(|| CatalogError::not_found(format!("collection {}", collection.id)))?;
        for member in members {
            if !target.members.contains(member) {
                target.members.push(member.clone());
            }
        }
        state.mutations.push(Mutation::AddToCollection {
            collection: collection.id.clone(),
            members: members.to_vec(),
        });
        Ok(())
    }

    fn upload_poster(&self, target: &EntryId, file: &Path) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let file = file.to_path_buf();
        if let Some(item) = state.items.iter_mut().find(|item| &item.id == target) {
            item.poster = Some(file.clone());
        } else if let Some(season) = state.season_mut(target) {
            season.poster = Some(file.clone());
        } else if let Some(collection) = state.collections.iter_mut().find(|c| &c.id == target) {
            collection.poster = Some(file.clone());
        } else {
            return Err(CatalogError::not_found(format!("poster target {target}")));
        }
        state.mutations.push(Mutation::UploadPoster {
            target: target.clone(),
            file,
        });
        Ok(())
    }

    fn set_sort_title(&self, collection: &CollectionRef, value: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let target = state
            .collections
            .iter_mut()
            .find(|c| c.id == collection.id)
            .ok_or_else(|| CatalogError::not_found(format!("collection {}", collection.id)))?;
        target.sort_title = Some(value.to_string());
        state.mutations.push(Mutation::SetSortTitle {
            collection: collection.id.clone(),
            value: value.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_movie_retires_id() {
        let catalog = MemoryCatalog::new();
        let section = catalog.add_section("Movies", SectionKind::Movie, ["/m"]);
        let id = catalog.add_movie(&section, "Alien", ["/m/Alien/a.mkv", "/m/Aliens/b.mkv"]);

        catalog.split(&id).unwrap();

        assert!(!catalog.contains(&id));
        let entries = catalog.entries(&section).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.locations.len() == 1));
        assert_eq!(catalog.mutations(), vec![Mutation::Split { id }]);
    }

    #[test]
    fn test_split_show_by_folder() {
        let catalog = MemoryCatalog::new();
        let section = catalog.add_section("TV", SectionKind::Show, ["/tv"]);
        let show = catalog.add_show(&section, "X");
        let season = catalog.add_season(&show, 1);
        catalog.add_episode(&season, "e1", ["/tv/X/S1/e1.mkv", "/tv/Y/S1/e1.mkv"]);

        catalog.split(&show).unwrap();

        let entries = catalog.entries(&section).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].locations, vec![PathBuf::from("/tv/X")]);
        assert_eq!(entries[1].locations, vec![PathBuf::from("/tv/Y")]);
    }

    #[test]
    fn test_merge_folds_seasons() {
        let catalog = MemoryCatalog::new();
        let section = catalog.add_section("TV", SectionKind::Show, ["/tv"]);
        let a = catalog.add_show(&section, "X");
        let a1 = catalog.add_season(&a, 1);
        catalog.add_episode(&a1, "e1", ["/tv/X/S1/e1.mkv"]);
        let b = catalog.add_show(&section, "X (dup)");
        let b1 = catalog.add_season(&b, 1);
        catalog.add_episode(&b1, "e2", ["/tv/X/S1/e2.mkv"]);
        let b2 = catalog.add_season(&b, 2);
        catalog.add_episode(&b2, "e1", ["/tv/X/S2/e1.mkv"]);

        catalog.merge(&a, &[b.clone()]).unwrap();

        assert!(!catalog.contains(&b));
        let seasons = catalog.seasons(&a).unwrap();
        assert_eq!(seasons.len(), 2);
        assert_eq!(seasons[0].id, a1);
        assert_eq!(catalog.episodes(&a1).unwrap().len(), 2);
    }

    #[test]
    fn test_merge_with_unknown_id_changes_nothing() {
        let catalog = MemoryCatalog::new();
        let section = catalog.add_section("TV", SectionKind::Show, ["/tv"]);
        let a = catalog.add_show(&section, "X");
        let b = catalog.add_show(&section, "X (dup)");

        let err = catalog
            .merge(&a, &[b.clone(), EntryId::new("99")])
            .unwrap_err();

        assert!(err.is_not_found());
        assert!(catalog.contains(&b));
        assert_eq!(catalog.entries(&section).unwrap().len(), 2);
        assert!(catalog.mutations().is_empty());
    }

    #[test]
    fn test_collections_are_set_like() {
        let catalog = MemoryCatalog::new();
        let section = catalog.add_section("Movies", SectionKind::Movie, ["/m"]);
        let a = catalog.add_movie(&section, "A", ["/m/A/a.mkv"]);

        assert!(catalog.collection_by_name(&section, "Set").unwrap_err().is_not_found());
        let collection = catalog.create_collection(&section, "Set", &[a.clone()]).unwrap();
        catalog.add_to_collection(&collection, &[a.clone()]).unwrap();

        let state = catalog.collection(&section, "Set").unwrap();
        assert_eq!(state.members, vec![a]);
    }

    #[test]
    fn test_upload_poster_unknown_target() {
        let catalog = MemoryCatalog::new();
        let err = catalog
            .upload_poster(&EntryId::new("99"), Path::new("/x/artwork.jpg"))
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
