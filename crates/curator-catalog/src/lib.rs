//! Media server catalog access for curator.
//!
//! The reconciler never talks to a media server directly. It goes through
//! the [`Catalog`] trait, which exposes exactly the reads and writes the
//! reconciliation needs:
//!
//! - enumerate sections, entries, seasons and episodes
//! - split and merge entries
//! - find, create and extend collections
//! - upload posters and set collection sort titles
//!
//! Two implementations are provided:
//!
//! - [`PlexCatalog`] talks to a Plex Media Server over its HTTP API
//! - [`MemoryCatalog`] keeps everything in process and records every
//!   mutation, which makes reconciliation runs observable in tests
//!
//! ```rust,no_run
//! use curator_catalog::{Catalog, PlexCatalog};
//!
//! let plex = PlexCatalog::new("http://127.0.0.1:32400", "token").unwrap();
//! let section = plex.section("Movies").unwrap();
//! for entry in plex.entries(&section).unwrap() {
//!     println!("{} {:?}", entry.title, entry.locations);
//! }
//! ```

mod catalog;
mod error;
pub mod memory;
mod model;
mod plex;

pub use catalog::Catalog;
pub use error::{CatalogError, Result};
pub use memory::{MemoryCatalog, Mutation};
pub use model::{
    CatalogEntry, CollectionRef, EntryId, EpisodeEntry, SeasonEntry, SectionInfo, SectionKind,
};
pub use plex::PlexCatalog;
