use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use plex_ratings_sync::catalog::plex::PlexCatalog;
use plex_ratings_sync::config::{self, AppConfig};
use plex_ratings_sync::lock::{self, ProcessLock};
use plex_ratings_sync::logging;
use plex_ratings_sync::sync::{RatingSync, RunOptions, SyncMode, SyncSummary};
use plex_ratings_sync::tags::LoftyTags;

#[derive(Parser)]
#[command(
    name = "plex-ratings-sync",
    version,
    about = "Sync track ratings between Plex and audio file tags"
)]
struct Cli {
    /// Verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Two-way sync; Plex wins when both sides are rated differently
    Sync {
        /// Report what would change without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Copy ratings from audio files into Plex
    Import {
        /// Report what would change without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Copy ratings from Plex into audio files
    Export {
        /// Report what would change without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Show version and where config and logs live
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let options = match cli.command {
        Commands::Sync { dry_run } => RunOptions { mode: SyncMode::Sync, dry_run },
        Commands::Import { dry_run } => RunOptions { mode: SyncMode::Import, dry_run },
        Commands::Export { dry_run } => RunOptions { mode: SyncMode::Export, dry_run },
        Commands::Info => {
            print_info();
            return Ok(());
        }
    };

    let lock_path = lock::default_lock_path();
    let _lock = ProcessLock::acquire(&lock_path).context("Failed to acquire process lock")?;

    logging::init(cli.quiet, cli.verbose, config::log_file_path().as_deref());
    log::info!("{} v{}", plex_ratings_sync::APP_NAME, env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load().context("Failed to load config")?;

    let label = options.mode.label();
    if let Err(e) = ctrlc::set_handler(move || {
        log::warn!("{label} interrupted by user");
        std::process::exit(130);
    }) {
        log::error!("Failed to install Ctrl-C handler: {e}");
    }

    let catalog = PlexCatalog::connect(&config.plex)
        .with_context(|| format!("Failed to connect to Plex at {}", config.plex.url))?;
    log::info!("Connected to Plex server: {}", catalog.friendly_name());

    catalog
        .ensure_libraries(&config.plex.libraries)
        .context("Library check failed")?;

    if options.dry_run {
        log::warn!("DRY RUN - no changes will be written to Plex or audio files");
    }

    let summary = RatingSync::new(&catalog, &LoftyTags).run(&config.plex.libraries, &options);
    print_summary(&options, &summary);

    Ok(())
}

fn print_summary(options: &RunOptions, summary: &SyncSummary) {
    println!();
    println!(
        "{} complete: {} tracks in {}",
        options.mode.label(),
        summary.processed,
        plex_ratings_sync::timing::format_elapsed(summary.elapsed)
    );
    println!(
        "  {} Plex updates, {} file updates, {} unchanged, {} skipped, {} failed",
        summary.catalog_updates,
        summary.file_updates,
        summary.unchanged,
        summary.skipped,
        summary.failed
    );
    if options.dry_run && summary.catalog_updates + summary.file_updates > 0 {
        println!("(dry run - re-run without --dry-run to write changes)");
    }
}

fn print_info() {
    let show = |path: Option<std::path::PathBuf>| {
        path.map_or_else(|| "(unavailable)".to_string(), |p| p.display().to_string())
    };
    println!("{} v{}", plex_ratings_sync::APP_NAME, env!("CARGO_PKG_VERSION"));
    println!("Config dir:  {}", show(config::config_dir()));
    println!("Config file: {}", show(config::config_file_path()));
    println!("Log dir:     {}", show(config::log_dir()));
    println!("Log file:    {}", show(config::log_file_path()));
}
