//! Directory-to-catalog reconciliation for curator.
//!
//! A run works on one library section:
//!
//! 1. **Tree building** - one [`DirectoryTree`] per section location
//! 2. **Split pass** - catalog entries spanning several locations are split
//! 3. **Mapping** - directories are mapped to movies, shows and seasons;
//!    ambiguous directories are skipped and reported
//! 4. **Merging** - entries sharing a directory are merged when that is safe
//! 5. **Collections** - top-level directories with mapped descendants become
//!    collections, and artwork found on disk becomes posters
//!
//! ```rust,no_run
//! use curator_catalog::PlexCatalog;
//! use curator_reconcile::{Reconciler, SyncOptions};
//!
//! let plex = PlexCatalog::new("http://127.0.0.1:32400", "token").unwrap();
//! let options = SyncOptions::builder().prioritize_collections(true).build().unwrap();
//! let outcome = Reconciler::new(&plex, options).sync("Movies").unwrap();
//!
//! println!("{} directories mapped", outcome.report.mapped_items);
//! for ambiguity in &outcome.report.ambiguities {
//!     println!("skipped {:?}: {:?}", ambiguity.kind, ambiguity.candidates);
//! }
//! ```

mod collections;
mod error;
mod mapping;
mod movies;
mod options;
mod reconciler;
mod report;
pub mod scanner;
mod shows;

pub use collections::CollectionSynthesizer;
pub use error::SyncError;
pub use mapping::{DirectoryMapping, LibraryMapping, collect_mapped};
pub use movies::map_movies;
pub use options::{DEFAULT_SORT_PREFIX, SyncOptions, SyncOptionsBuilder};
pub use reconciler::{Reconciler, SyncOutcome};
pub use report::{Ambiguity, AmbiguityKind, MergeRecord, SyncReport};
pub use shows::{ShowMapping, map_shows, should_merge_shows};

// Re-export core types
pub use curator_core::{DirectoryNode, DirectoryTree};
