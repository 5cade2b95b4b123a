//! curator - Builds Plex collections and posters from your folder layout.
//!
//! Usage:
//!   curator sync -l <LIBRARY>   Reconcile a library section with its folders
//!   curator sections            List library sections
//!   curator tree <PATH>         Show the directory tree curator would use
//!   curator --help              Show help

mod config;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result, bail, eyre};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use curator_catalog::{Catalog, PlexCatalog};
use curator_reconcile::{Reconciler, SyncOptions, SyncOutcome};
use curator_scan::{ScanConfig, TreeScanner};

use crate::config::FileConfig;

#[derive(Parser)]
#[command(
    name = "curator",
    version,
    about = "Builds Plex collections and posters from the folder layout of your media",
    long_about = "curator maps the folders of a Plex library section to the movies, shows \
                  and seasons in the catalog.\n\n\
                  Entries sharing a folder are merged, top-level folders become \
                  collections, and artwork files found on disk become posters."
)]
struct Cli {
    /// Log debug details and dump the annotated directory tree
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to <config dir>/curator/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct ServerArgs {
    /// Plex server URL
    #[arg(long, env = "CURATOR_PLEX_URL")]
    url: Option<String>,

    /// Plex authentication token
    #[arg(long, env = "CURATOR_PLEX_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Reconcile a library section with its folders
    Sync {
        /// Name of the Plex library to update
        #[arg(short, long)]
        library: String,

        /// Artwork base file name (default: artwork)
        #[arg(short, long)]
        artwork: Option<String>,

        /// Give collections a sort title that lists them first
        #[arg(long)]
        prioritize_collections: bool,

        /// Skip unreadable directories instead of failing
        #[arg(long)]
        skip_unreadable: bool,

        #[command(flatten)]
        server: ServerArgs,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// List library sections
    Sections {
        #[command(flatten)]
        server: ServerArgs,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Build and print the directory tree of a path without contacting Plex
    Tree {
        /// Library location to scan
        path: PathBuf,

        /// Artwork base file name (default: artwork)
        #[arg(short, long)]
        artwork: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let file = FileConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Sync {
            library,
            artwork,
            prioritize_collections,
            skip_unreadable,
            server,
            format,
        } => {
            if library.trim().is_empty() {
                bail!("Please provide a valid Plex library name");
            }
            let options = sync_options(
                &file,
                artwork,
                prioritize_collections,
                skip_unreadable,
                cli.verbose,
            )?;
            let catalog = connect(&file, server)?;
            run_sync(&catalog, &library, options, format)?;
        }
        Command::Sections { server, format } => {
            let catalog = connect(&file, server)?;
            run_sections(&catalog, format)?;
        }
        Command::Tree {
            path,
            artwork,
            format,
        } => {
            run_tree(&file, &path, artwork, format)?;
        }
    }

    Ok(())
}

/// Install the log subscriber. `RUST_LOG` takes precedence over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Merge config file values with command-line flags.
fn sync_options(
    file: &FileConfig,
    artwork: Option<String>,
    prioritize_collections: bool,
    skip_unreadable: bool,
    verbose: bool,
) -> Result<SyncOptions> {
    let library = &file.library;
    let mut builder = SyncOptions::builder();
    builder
        .verbose(verbose)
        .prioritize_collections(
            prioritize_collections || library.prioritize_collections.unwrap_or(false),
        )
        .skip_unreadable(skip_unreadable || library.skip_unreadable.unwrap_or(false));
    if let Some(name) = artwork.or_else(|| library.artwork_name.clone()) {
        builder.artwork_name(name);
    }
    if let Some(extensions) = &library.video_extensions {
        builder.video_extensions(extensions.clone());
    }
    if let Some(prefix) = &library.collection_sort_prefix {
        builder.collection_sort_prefix(prefix.clone());
    }
    builder.build().wrap_err("Invalid sync options")
}

/// Connect to the Plex server named by flags, environment or config file.
fn connect(file: &FileConfig, server: ServerArgs) -> Result<PlexCatalog> {
    let url = server
        .url
        .or_else(|| file.server.url.clone())
        .ok_or_else(|| eyre!("No Plex server URL configured (use --url or CURATOR_PLEX_URL)"))?;
    let token = server
        .token
        .or_else(|| file.server.token.clone())
        .ok_or_else(|| eyre!("No Plex token configured (use --token or CURATOR_PLEX_TOKEN)"))?;
    let catalog = PlexCatalog::new(&url, &token).wrap_err("Failed to create Plex client")?;
    debug!(server = %catalog.base_url(), "using Plex server");
    Ok(catalog)
}

/// Reconcile one library section.
fn run_sync(
    catalog: &dyn Catalog,
    library: &str,
    options: SyncOptions,
    format: OutputFormat,
) -> Result<()> {
    let verbose = options.verbose;
    let reconciler = Reconciler::new(catalog, options);
    let outcome = reconciler
        .sync(library)
        .wrap_err_with(|| format!("Failed to update library '{library}'"))?;

    if verbose {
        eprintln!("{}", outcome.render_trees());
    }

    match format {
        OutputFormat::Text => print_report(&outcome),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&outcome.report)
                .wrap_err("Failed to serialize report")?;
            println!("{json}");
        }
    }

    info!(section = %outcome.report.section, "sync complete");
    Ok(())
}

fn print_report(outcome: &SyncOutcome) {
    let report = &outcome.report;
    println!();
    println!("{}", "─".repeat(60));
    println!(" {} ({})", report.section, report.kind);
    println!(
        " {} items and {} seasons mapped",
        report.mapped_items, report.mapped_seasons
    );
    println!(
        " {} splits, {} merges",
        report.splits.len(),
        report.merges.len()
    );
    println!(
        " {} collections created, {} updated, {} posters uploaded",
        report.collections_created.len(),
        report.collections_updated.len(),
        report.posters_uploaded
    );
    println!("{}", "─".repeat(60));

    if report.has_ambiguities() {
        println!();
        println!("Skipped as ambiguous:");
        for ambiguity in &report.ambiguities {
            let directories: Vec<String> = ambiguity
                .directories
                .iter()
                .map(|d| d.display().to_string())
                .collect();
            println!(
                "  {:?}: {} [{}]",
                ambiguity.kind,
                ambiguity.candidates.join(", "),
                directories.join(", ")
            );
        }
    }

    if report.scan_warnings > 0 {
        println!();
        println!("{} warning(s) while building trees", report.scan_warnings);
    }
}

/// List the sections of the server.
fn run_sections(catalog: &dyn Catalog, format: OutputFormat) -> Result<()> {
    let sections = catalog.sections().wrap_err("Failed to list library sections")?;

    match format {
        OutputFormat::Text => {
            for section in &sections {
                println!("{:<30} {:<8} {}", section.title, section.kind, section.id);
                for location in &section.locations {
                    println!("    {}", location.display());
                }
            }
        }
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&sections).wrap_err("Failed to serialize sections")?;
            println!("{json}");
        }
    }
    Ok(())
}

/// Build a tree offline and print it.
fn run_tree(
    file: &FileConfig,
    path: &Path,
    artwork: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let mut builder = ScanConfig::builder();
    builder.root(path);
    if let Some(name) = artwork.or_else(|| file.library.artwork_name.clone()) {
        builder.artwork_name(name);
    }
    if let Some(extensions) = &file.library.video_extensions {
        builder.video_extensions(extensions.clone());
    }
    if let Some(skip) = file.library.skip_unreadable {
        builder.skip_unreadable(skip);
    }
    let config = builder.build().wrap_err("Invalid scan configuration")?;

    let tree = TreeScanner::new()
        .scan(&config)
        .wrap_err_with(|| format!("Failed to build tree for {}", path.display()))?;

    match format {
        OutputFormat::Text => {
            println!("{}", tree.render(|_| None));
            println!();
            println!(
                "{} directories, {} media files, {} artwork files",
                tree.stats.total_dirs, tree.stats.total_media, tree.stats.total_artwork
            );
            if tree.has_warnings() {
                println!("{} warning(s) during scan", tree.warnings.len());
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&tree).wrap_err("Failed to serialize tree")?;
            println!("{json}");
        }
    }
    Ok(())
}
