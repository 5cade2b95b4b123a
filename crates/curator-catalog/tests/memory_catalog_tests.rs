//! Integration tests for the in-memory catalog.

use std::path::{Path, PathBuf};

use curator_catalog::{Catalog, EntryId, MemoryCatalog, Mutation, SectionKind};

#[test]
fn test_section_lookup_by_title() {
    let catalog = MemoryCatalog::new();
    catalog.add_section("Movies", SectionKind::Movie, ["/media/movies"]);
    catalog.add_section("TV", SectionKind::Show, ["/media/tv"]);

    let tv = catalog.section("TV").unwrap();
    assert_eq!(tv.kind, SectionKind::Show);
    assert_eq!(tv.locations, vec![PathBuf::from("/media/tv")]);

    let err = catalog.section("Music").unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("Music"));
}

#[test]
fn test_entries_are_scoped_to_section() {
    let catalog = MemoryCatalog::new();
    let movies = catalog.add_section("Movies", SectionKind::Movie, ["/m"]);
    let other = catalog.add_section("Kids", SectionKind::Movie, ["/k"]);
    catalog.add_movie(&movies, "Alien", ["/m/Alien/alien.mkv"]);
    catalog.add_movie(&other, "Cars", ["/k/Cars/cars.mkv"]);

    let entries = catalog.entries(&movies).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].title, "Alien");
}

#[test]
fn test_show_locations_follow_episode_folders() {
    let catalog = MemoryCatalog::new();
    let tv = catalog.add_section("TV", SectionKind::Show, ["/tv"]);
    let show = catalog.add_show(&tv, "SeriesX");
    let s1 = catalog.add_season(&show, 1);
    let s2 = catalog.add_season(&show, 2);
    catalog.add_episode(&s1, "Pilot", ["/tv/SeriesX/Season 1/e01.mkv"]);
    catalog.add_episode(&s2, "Return", ["/tv/SeriesX/Season 2/e01.mkv"]);

    let entry = catalog.entry_by_title("SeriesX").unwrap();
    assert_eq!(entry.locations, vec![PathBuf::from("/tv/SeriesX")]);

    let seasons = catalog.seasons(&show).unwrap();
    assert_eq!(seasons.iter().map(|s| s.number).collect::<Vec<_>>(), vec![1, 2]);
    assert!(seasons.iter().all(|s| s.show_title == "SeriesX"));
}

#[test]
fn test_merge_then_split_movie() {
    let catalog = MemoryCatalog::new();
    let movies = catalog.add_section("Movies", SectionKind::Movie, ["/m"]);
    let a = catalog.add_movie(&movies, "Heat", ["/m/Heat/heat.mkv"]);
    let b = catalog.add_movie(&movies, "Heat", ["/m/Heat/heat-extended.mkv"]);

    catalog.merge(&a, &[b.clone()]).unwrap();
    let entries = catalog.entries(&movies).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].locations.len(), 2);

    catalog.split(&a).unwrap();
    let entries = catalog.entries(&movies).unwrap();
    assert_eq!(entries.len(), 2);
    assert!(!entries.iter().any(|e| e.id == a || e.id == b));

    assert_eq!(
        catalog.mutations(),
        vec![
            Mutation::Merge {
                survivor: a.clone(),
                merged: vec![b],
            },
            Mutation::Split { id: a },
        ]
    );
}

#[test]
fn test_stale_ids_are_rejected() {
    let catalog = MemoryCatalog::new();
    let movies = catalog.add_section("Movies", SectionKind::Movie, ["/m"]);
    let id = catalog.add_movie(&movies, "Alien", ["/m/A/a.mkv", "/m/B/b.mkv"]);
    catalog.split(&id).unwrap();

    assert!(catalog.split(&id).unwrap_err().is_not_found());
    assert!(catalog.seasons(&id).unwrap_err().is_not_found());
    assert!(catalog.episodes(&EntryId::new("404")).unwrap_err().is_not_found());
}

#[test]
fn test_collection_lifecycle() {
    let catalog = MemoryCatalog::new();
    let movies = catalog.add_section("Movies", SectionKind::Movie, ["/m"]);
    let a = catalog.add_movie(&movies, "Alien", ["/m/Alien/Alien/a.mkv"]);
    let b = catalog.add_movie(&movies, "Aliens", ["/m/Alien/Aliens/b.mkv"]);

    let collection = catalog.create_collection(&movies, "Alien", &[a.clone()]).unwrap();
    catalog.add_to_collection(&collection, &[a.clone(), b.clone()]).unwrap();
    catalog.set_sort_title(&collection, "!Alien").unwrap();
    catalog
        .upload_poster(&collection.id, Path::new("/m/Alien/artwork.jpg"))
        .unwrap();

    let found = catalog.collection_by_name(&movies, "Alien").unwrap();
    assert_eq!(found.id, collection.id);

    let state = catalog.collection(&movies, "Alien").unwrap();
    assert_eq!(state.members, vec![a, b]);
    assert_eq!(state.sort_title.as_deref(), Some("!Alien"));
    assert_eq!(state.poster, Some(PathBuf::from("/m/Alien/artwork.jpg")));
    assert_eq!(catalog.collection_count(&movies), 1);
}

#[test]
fn test_season_posters() {
    let catalog = MemoryCatalog::new();
    let tv = catalog.add_section("TV", SectionKind::Show, ["/tv"]);
    let show = catalog.add_show(&tv, "X");
    let season = catalog.add_season(&show, 1);

    catalog
        .upload_poster(&season, Path::new("/tv/X/S1/artwork.png"))
        .unwrap();

    assert_eq!(catalog.poster(&season), Some(PathBuf::from("/tv/X/S1/artwork.png")));
    assert_eq!(catalog.poster(&show), None);
}
