//! Run orchestration for one library section.

use std::fmt::Write;

use tracing::info;

use curator_catalog::{Catalog, SectionInfo, SectionKind};
use curator_core::DirectoryTree;
use curator_scan::TreeScanner;

use crate::collections::CollectionSynthesizer;
use crate::error::SyncError;
use crate::mapping::LibraryMapping;
use crate::movies::map_movies;
use crate::options::SyncOptions;
use crate::report::SyncReport;
use crate::scanner::{scan_shows, split_movies};
use crate::shows::map_shows;

/// Everything a finished run produced.
#[derive(Debug)]
pub struct SyncOutcome {
    pub report: SyncReport,
    /// One tree per section location.
    pub trees: Vec<DirectoryTree>,
    pub mapping: LibraryMapping,
}

impl SyncOutcome {
    /// Dump every tree annotated with the mapping state of each directory.
    pub fn render_trees(&self) -> String {
        let mut out = String::new();
        for tree in &self.trees {
            let _ = write!(out, "==========|{}|==========", tree.root_path.display());
            out.push_str(&tree.render(|path| self.mapping.label(path)));
        }
        out
    }
}

/// Reconciles a section's folders against its catalog.
pub struct Reconciler<'c, C: Catalog + ?Sized> {
    catalog: &'c C,
    options: SyncOptions,
    scanner: TreeScanner,
}

impl<'c, C: Catalog + ?Sized> Reconciler<'c, C> {
    pub fn new(catalog: &'c C, options: SyncOptions) -> Self {
        Self {
            catalog,
            options,
            scanner: TreeScanner::new(),
        }
    }

    /// Look up a section by name and reconcile it.
    pub fn sync(&self, library: &str) -> Result<SyncOutcome, SyncError> {
        let section = self.catalog.section(library)?;
        self.sync_section(&section)
    }

    /// Reconcile one section.
    ///
    /// Unsupported section types fail before any tree is built and before
    /// the catalog is touched.
    pub fn sync_section(&self, section: &SectionInfo) -> Result<SyncOutcome, SyncError> {
        if let SectionKind::Other(kind) = &section.kind {
            return Err(SyncError::UnsupportedSection { kind: kind.clone() });
        }

        let mut report = SyncReport::new(&section.title, section.kind.clone());
        let trees = self.build_trees(section, &mut report)?;

        let mapping = match section.kind {
            SectionKind::Movie => {
                let movies = split_movies(self.catalog, section, &mut report)?;
                LibraryMapping::Movies(map_movies(self.catalog, movies, &mut report)?)
            }
            _ => {
                let evidence = scan_shows(self.catalog, section, &mut report)?;
                let shows = map_shows(self.catalog, evidence, &mut report)?;
                LibraryMapping::Shows {
                    shows: shows.shows,
                    seasons: shows.seasons,
                }
            }
        };
        report.mapped_items = mapping.items().len();
        report.mapped_seasons = mapping.seasons().map_or(0, |seasons| seasons.len());

        CollectionSynthesizer::new(self.catalog, section, &self.options)
            .synthesize(&trees, &mapping, &mut report)?;

        Ok(SyncOutcome {
            report,
            trees,
            mapping,
        })
    }

    fn build_trees(
        &self,
        section: &SectionInfo,
        report: &mut SyncReport,
    ) -> Result<Vec<DirectoryTree>, SyncError> {
        let mut trees = Vec::with_capacity(section.locations.len());
        for location in &section.locations {
            info!(
                section = %section.title,
                location = %location.display(),
                "building directory tree"
            );
            let config = self.options.scan_config(location)?;
            let tree = self.scanner.scan(&config)?;
            report.scan_warnings += tree.warnings.len();
            report.roots.push(location.clone());
            trees.push(tree);
        }
        Ok(trees)
    }
}
