//! Show library mapping.
//!
//! Shows and seasons are treated differently when they collide on a
//! directory. Several show records can legitimately point at the same show
//! folder before a merge, so shows sharing a root are handed to the merge
//! resolver. Seasons sharing a directory are never merged: the directory is
//! dropped from the season mapping for the rest of the run.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use curator_catalog::{Catalog, CatalogEntry, CatalogError, EntryId, SeasonEntry};

use crate::mapping::DirectoryMapping;
use crate::report::{AmbiguityKind, MergeRecord, SyncReport};
use crate::scanner::{ShowEvidence, ShowRoot, describe_season, show_evidence};

/// Show and season mappings of a show library.
#[derive(Debug, Clone, Default)]
pub struct ShowMapping {
    pub shows: DirectoryMapping<CatalogEntry>,
    pub seasons: DirectoryMapping<SeasonEntry>,
}

/// Check whether shows sharing a root can be merged.
///
/// The first candidate is the base. It must have at least one season with
/// located episodes. Every candidate must report the same set of
/// directories for each season number any other candidate also has.
pub fn should_merge_shows(candidates: &[ShowEvidence]) -> bool {
    let Some(base) = candidates.first() else {
        return false;
    };
    if base.location_sets().is_empty() {
        return false;
    }
    let mut agreed: BTreeMap<u32, BTreeSet<PathBuf>> = BTreeMap::new();
    candidates.iter().all(|show| {
        show.location_sets()
            .into_iter()
            .all(|(number, directories)| match agreed.entry(number) {
                Entry::Vacant(entry) => {
                    entry.insert(directories);
                    true
                }
                Entry::Occupied(entry) => *entry.get() == directories,
            })
    })
}

/// Map show and season directories from gathered evidence.
///
/// Every single-directory season claims its directory, whether or not its
/// show ends up mapped. A directory claimed by more than one season is left
/// out of the season mapping. Seasons of shows merged together count as one
/// season per number.
pub fn map_shows<C: Catalog + ?Sized>(
    catalog: &C,
    evidence: Vec<ShowEvidence>,
    report: &mut SyncReport,
) -> Result<ShowMapping, CatalogError> {
    let claims = season_claims(&evidence);

    let mut by_root: IndexMap<PathBuf, Vec<ShowEvidence>> = IndexMap::new();
    for show in evidence {
        match show.root() {
            ShowRoot::Resolved(root) => by_root.entry(root).or_default().push(show),
            ShowRoot::Unknown => {
                report_invalid_seasons(&show, report);
                debug!(show = %show.show.title, "no season resolved to a single directory, show left unmapped");
            }
            ShowRoot::Divergent(parents) => {
                warn!(
                    show = %show.show.title,
                    "show is ambiguous (seasons live under different directories), skipping"
                );
                for parent in &parents {
                    debug!(directory = %parent.display(), "candidate show directory");
                }
                report_invalid_seasons(&show, report);
                report.ambiguous(AmbiguityKind::ShowRoots, parents, vec![show.describe()]);
            }
        }
    }

    let first_merge = report.merges.len();
    let mut survivors = Vec::new();
    for (root, mut group) in by_root {
        if group.len() == 1 {
            if let Some(show) = group.pop() {
                survivors.push((root, show));
            }
            continue;
        }
        if let Some(show) = resolve_collision(catalog, &root, group, report)? {
            survivors.push((root, show));
        }
    }

    let merged_into: HashMap<EntryId, EntryId> = report.merges[first_merge..]
        .iter()
        .flat_map(|record| {
            record
                .merged
                .iter()
                .map(|merged| (merged.clone(), record.survivor.clone()))
        })
        .collect();
    let mut rejected = contested_directories(claims, &merged_into, report);

    let mut mapping = ShowMapping::default();
    for (root, show) in survivors {
        report_invalid_seasons(&show, report);
        for season in show.valid_seasons() {
            let Some(directory) = season.directory() else {
                continue;
            };
            let directory = directory.to_path_buf();
            if rejected.contains(&directory) {
                let candidate = describe_season(&season.season);
                debug!(
                    season = %candidate,
                    directory = %directory.display(),
                    "season directory is already ambiguous, skipping"
                );
                if let Some(ambiguity) = report.ambiguities.iter_mut().find(|a| {
                    a.kind == AmbiguityKind::SeasonCollision && a.directories.contains(&directory)
                }) {
                    if !ambiguity.candidates.contains(&candidate) {
                        ambiguity.candidates.push(candidate);
                    }
                }
                continue;
            }
            if let Some(existing) = mapping.seasons.remove(&directory) {
                warn!(
                    season = %describe_season(&season.season),
                    other = %describe_season(&existing),
                    directory = %directory.display(),
                    "season is ambiguous (multiple seasons have media files in this directory), skipping"
                );
                report.ambiguous(
                    AmbiguityKind::SeasonCollision,
                    vec![directory.clone()],
                    vec![describe_season(&existing), describe_season(&season.season)],
                );
                rejected.insert(directory);
                continue;
            }
            mapping.seasons.insert(directory, season.season.clone());
        }
        info!(show = %show.show.title, directory = %root.display(), "mapped show");
        mapping.shows.insert(root, show.show);
    }
    Ok(mapping)
}

/// Seasons claiming each single-directory season folder, keyed by the
/// owning show.
fn season_claims(evidence: &[ShowEvidence]) -> IndexMap<PathBuf, Vec<(EntryId, SeasonEntry)>> {
    let mut claims: IndexMap<PathBuf, Vec<(EntryId, SeasonEntry)>> = IndexMap::new();
    for show in evidence {
        for season in show.valid_seasons() {
            if let Some(directory) = season.directory() {
                claims
                    .entry(directory.to_path_buf())
                    .or_default()
                    .push((show.show.id.clone(), season.season.clone()));
            }
        }
    }
    claims
}

/// Reject directories claimed by more than one distinct season.
///
/// Claims of merged shows are attributed to the survivor, so the same
/// season number reported by a show and its merged duplicate is one claim.
fn contested_directories(
    claims: IndexMap<PathBuf, Vec<(EntryId, SeasonEntry)>>,
    merged_into: &HashMap<EntryId, EntryId>,
    report: &mut SyncReport,
) -> HashSet<PathBuf> {
    let mut rejected = HashSet::new();
    for (directory, claimants) in claims {
        let mut owners: Vec<(&EntryId, u32)> = Vec::new();
        for (show, season) in &claimants {
            let owner = (merged_into.get(show).unwrap_or(show), season.number);
            if !owners.contains(&owner) {
                owners.push(owner);
            }
        }
        if owners.len() < 2 {
            continue;
        }
        let candidates: Vec<String> = claimants
            .iter()
            .map(|(_, season)| describe_season(season))
            .collect();
        warn!(
            directory = %directory.display(),
            count = candidates.len(),
            "season is ambiguous (multiple seasons have media files in this directory), skipping"
        );
        for candidate in &candidates {
            debug!(directory = %directory.display(), season = %candidate, "conflicting season");
        }
        report.ambiguous(AmbiguityKind::SeasonCollision, vec![directory.clone()], candidates);
        rejected.insert(directory);
    }
    rejected
}

/// Merge shows sharing `root` when eligible, returning the survivor.
fn resolve_collision<C: Catalog + ?Sized>(
    catalog: &C,
    root: &Path,
    group: Vec<ShowEvidence>,
    report: &mut SyncReport,
) -> Result<Option<ShowEvidence>, CatalogError> {
    let candidates: Vec<String> = group.iter().map(ShowEvidence::describe).collect();

    if !should_merge_shows(&group) {
        warn!(
            directory = %root.display(),
            count = group.len(),
            "shows are ambiguous (media files in the same directory disagree), skipping"
        );
        for candidate in &candidates {
            warn!(directory = %root.display(), show = %candidate, "conflicting show");
        }
        for show in &group {
            report_invalid_seasons(show, report);
        }
        report.ambiguous(AmbiguityKind::ShowCollision, vec![root.to_path_buf()], candidates);
        return Ok(None);
    }

    let mut group = group.into_iter();
    let Some(base) = group.next() else {
        return Ok(None);
    };
    let merged: Vec<EntryId> = group.map(|show| show.show.id).collect();
    info!(
        directory = %root.display(),
        show = %base.show.title,
        count = merged.len() + 1,
        "merging shows sharing a directory"
    );
    catalog.merge(&base.show.id, &merged)?;
    report.merges.push(MergeRecord {
        directory: root.to_path_buf(),
        survivor: base.show.id.clone(),
        merged,
    });

    // Seasons of the merged shows now belong to the survivor.
    let refreshed = show_evidence(catalog, base.show)?;
    match refreshed.root() {
        ShowRoot::Resolved(ref resolved) if resolved == root => Ok(Some(refreshed)),
        other => {
            warn!(
                directory = %root.display(),
                show = %refreshed.show.title,
                "merged show no longer resolves to its directory, skipping"
            );
            debug!(root = ?other, "refreshed show root");
            report.ambiguous(AmbiguityKind::MergedShowMoved, vec![root.to_path_buf()], candidates);
            Ok(None)
        }
    }
}

fn report_invalid_seasons(show: &ShowEvidence, report: &mut SyncReport) {
    for season in show.invalid_seasons() {
        warn!(
            season = season.season.number,
            show = %show.show.title,
            count = season.directories.len(),
            "season is ambiguous (media files across multiple directories), skipping"
        );
        for directory in &season.directories {
            debug!(directory = %directory.display(), "season media directory");
        }
        report.ambiguous(
            AmbiguityKind::SeasonDirectories,
            season.directories.clone(),
            vec![describe_season(&season.season)],
        );
    }
}
