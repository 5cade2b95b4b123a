//! Catalog scanning: the split pass and per-show location evidence.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use curator_catalog::{Catalog, CatalogEntry, CatalogError, SeasonEntry, SectionInfo};
use curator_core::{base_directory, show_root};

use crate::report::SyncReport;

/// Directories holding the episodes of one season.
#[derive(Debug, Clone)]
pub struct SeasonEvidence {
    pub season: SeasonEntry,
    /// Unique base directories of the episodes, in discovery order.
    pub directories: Vec<PathBuf>,
}

impl SeasonEvidence {
    /// The season directory, when all episodes share exactly one.
    pub fn directory(&self) -> Option<&Path> {
        match self.directories.as_slice() {
            [directory] => Some(directory.as_path()),
            _ => None,
        }
    }
}

/// A show together with the evidence gathered for its seasons.
#[derive(Debug, Clone)]
pub struct ShowEvidence {
    pub show: CatalogEntry,
    pub seasons: Vec<SeasonEvidence>,
}

/// Show directory inferred from season evidence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShowRoot {
    /// No season has a single directory.
    Unknown,
    /// Every valid season sits in this directory.
    Resolved(PathBuf),
    /// Valid seasons point at different parents.
    Divergent(Vec<PathBuf>),
}

impl ShowEvidence {
    /// Seasons whose episodes share exactly one directory.
    pub fn valid_seasons(&self) -> impl Iterator<Item = &SeasonEvidence> {
        self.seasons.iter().filter(|s| s.directory().is_some())
    }

    /// Seasons that do not resolve to a single directory.
    pub fn invalid_seasons(&self) -> impl Iterator<Item = &SeasonEvidence> {
        self.seasons.iter().filter(|s| s.directory().is_none())
    }

    /// Infer the show directory from the parents of its valid seasons.
    pub fn root(&self) -> ShowRoot {
        let mut parents: Vec<PathBuf> = Vec::new();
        for directory in self.valid_seasons().filter_map(SeasonEvidence::directory) {
            let parent = show_root(directory);
            if !parents.contains(&parent) {
                parents.push(parent);
            }
        }
        match parents.len() {
            0 => ShowRoot::Unknown,
            1 => ShowRoot::Resolved(parents.remove(0)),
            _ => ShowRoot::Divergent(parents),
        }
    }

    /// Unique location set of every season number with evidence.
    pub fn location_sets(&self) -> BTreeMap<u32, BTreeSet<PathBuf>> {
        let mut sets: BTreeMap<u32, BTreeSet<PathBuf>> = BTreeMap::new();
        for season in self.seasons.iter().filter(|s| !s.directories.is_empty()) {
            sets.entry(season.season.number)
                .or_default()
                .extend(season.directories.iter().cloned());
        }
        sets
    }

    /// Short description used in warnings and reports.
    pub fn describe(&self) -> String {
        describe_entry(&self.show)
    }
}

pub(crate) fn describe_entry(entry: &CatalogEntry) -> String {
    format!("'{}' ({})", entry.title, entry.id)
}

pub(crate) fn describe_season(season: &SeasonEntry) -> String {
    format!("season {} of '{}' ({})", season.number, season.show_title, season.id)
}

/// Split every movie spanning more than one file, then re-enumerate.
pub fn split_movies<C: Catalog + ?Sized>(
    catalog: &C,
    section: &SectionInfo,
    report: &mut SyncReport,
) -> Result<Vec<CatalogEntry>, CatalogError> {
    info!(section = %section.title, "searching for merged movies to split");
    for movie in catalog.entries(section)? {
        if movie.locations.len() > 1 {
            info!(
                movie = %movie.title,
                count = movie.locations.len(),
                "splitting merged movie into independent entries"
            );
            for location in &movie.locations {
                debug!(location = %location.display(), "split location");
            }
            catalog.split(&movie.id)?;
            report.splits.push(movie.id);
        }
    }
    catalog.entries(section)
}

/// Gather show evidence, splitting shows whose episodes span several files.
///
/// Shows are re-enumerated when any split was issued since splits retire
/// the identifiers read before them.
pub fn scan_shows<C: Catalog + ?Sized>(
    catalog: &C,
    section: &SectionInfo,
    report: &mut SyncReport,
) -> Result<Vec<ShowEvidence>, CatalogError> {
    info!(section = %section.title, "gathering season locations");
    let mut evidence = Vec::new();
    let mut split_any = false;
    for show in catalog.entries(section)? {
        let (gathered, multi_location) = gather(catalog, show)?;
        if multi_location {
            info!(show = %gathered.show.title, "splitting show with episodes in several locations");
            catalog.split(&gathered.show.id)?;
            report.splits.push(gathered.show.id);
            split_any = true;
        } else {
            evidence.push(gathered);
        }
    }

    if !split_any {
        return Ok(evidence);
    }

    catalog
        .entries(section)?
        .into_iter()
        .map(|show| show_evidence(catalog, show))
        .collect()
}

/// Read seasons and episodes of one show into evidence.
pub fn show_evidence<C: Catalog + ?Sized>(
    catalog: &C,
    show: CatalogEntry,
) -> Result<ShowEvidence, CatalogError> {
    gather(catalog, show).map(|(evidence, _)| evidence)
}

fn gather<C: Catalog + ?Sized>(
    catalog: &C,
    show: CatalogEntry,
) -> Result<(ShowEvidence, bool), CatalogError> {
    let mut multi_location = false;
    let mut seasons = Vec::new();
    for season in catalog.seasons(&show.id)? {
        let mut directories: Vec<PathBuf> = Vec::new();
        for episode in catalog.episodes(&season.id)? {
            multi_location |= episode.locations.len() > 1;
            for location in &episode.locations {
                let directory = base_directory(location);
                if !directories.contains(&directory) {
                    directories.push(directory);
                }
            }
        }
        seasons.push(SeasonEvidence {
            season,
            directories,
        });
    }
    Ok((ShowEvidence { show, seasons }, multi_location))
}
