//! Movie library mapping.

use std::path::PathBuf;

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use curator_catalog::{Catalog, CatalogEntry, CatalogError, EntryId};
use curator_core::base_directory;

use crate::mapping::DirectoryMapping;
use crate::report::{AmbiguityKind, MergeRecord, SyncReport};
use crate::scanner::describe_entry;

/// Map movie directories to movies, merging movies that share a directory.
///
/// The first movie enumerated for a directory survives; the others are
/// merged into it. Movies without exactly one location are skipped.
pub fn map_movies<C: Catalog + ?Sized>(
    catalog: &C,
    movies: Vec<CatalogEntry>,
    report: &mut SyncReport,
) -> Result<DirectoryMapping<CatalogEntry>, CatalogError> {
    let mut groups: IndexMap<PathBuf, Vec<CatalogEntry>> = IndexMap::new();
    for movie in movies {
        let [location] = movie.locations.as_slice() else {
            warn!(
                movie = %movie.title,
                count = movie.locations.len(),
                "movie still has an unexpected number of media files after split, skipping"
            );
            report.ambiguous(
                AmbiguityKind::MovieLocations,
                movie.locations.clone(),
                vec![describe_entry(&movie)],
            );
            continue;
        };
        groups.entry(base_directory(location)).or_default().push(movie);
    }

    info!("merging movie entries with identical media directories");
    let mut mapping = DirectoryMapping::new();
    for (directory, group) in groups {
        let mut group = group.into_iter();
        let Some(survivor) = group.next() else {
            continue;
        };
        let merged: Vec<EntryId> = group.map(|movie| movie.id).collect();
        if !merged.is_empty() {
            info!(
                directory = %directory.display(),
                count = merged.len() + 1,
                survivor = %survivor.title,
                "merging movies sharing a directory"
            );
            catalog.merge(&survivor.id, &merged)?;
            report.merges.push(MergeRecord {
                directory: directory.clone(),
                survivor: survivor.id.clone(),
                merged,
            });
        }
        debug!(directory = %directory.display(), movie = %survivor.title, "mapped movie");
        mapping.insert(directory, survivor);
    }
    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use curator_catalog::{MemoryCatalog, Mutation, SectionKind};
    use std::path::Path;

    #[test]
    fn test_shared_directory_merges_into_first() {
        let catalog = MemoryCatalog::new();
        let section = catalog.add_section("Movies", SectionKind::Movie, ["/m"]);
        let a = catalog.add_movie(&section, "Heat", ["/m/Heat/heat.mkv"]);
        let b = catalog.add_movie(&section, "Heat (1995)", ["/m/Heat/heat.cd2.mkv"]);
        let c = catalog.add_movie(&section, "Ronin", ["/m/Ronin/ronin.mkv"]);

        let mut report = SyncReport::new("Movies", SectionKind::Movie);
        let entries = catalog.entries(&section).unwrap();
        let mapping = map_movies(&catalog, entries, &mut report).unwrap();

        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.get(Path::new("/m/Heat")).unwrap().id, a);
        assert_eq!(mapping.get(Path::new("/m/Ronin")).unwrap().id, c);
        assert_eq!(
            catalog.mutations(),
            vec![Mutation::Merge {
                survivor: a,
                merged: vec![b],
            }]
        );
        assert_eq!(report.merges.len(), 1);
    }

    #[test]
    fn test_locationless_movie_skipped() {
        let catalog = MemoryCatalog::new();
        let section = catalog.add_section("Movies", SectionKind::Movie, ["/m"]);
        catalog.add_movie(&section, "Ghost", Vec::<PathBuf>::new());

        let mut report = SyncReport::new("Movies", SectionKind::Movie);
        let entries = catalog.entries(&section).unwrap();
        let mapping = map_movies(&catalog, entries, &mut report).unwrap();

        assert!(mapping.is_empty());
        assert_eq!(report.ambiguity_count(AmbiguityKind::MovieLocations), 1);
        assert!(catalog.mutations().is_empty());
    }
}
