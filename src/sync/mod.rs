pub mod policy;

use std::path::Path;
use std::time::{Duration, Instant};

pub use policy::{Decision, SyncMode, decide};

use crate::catalog::{Catalog, CatalogItem, CatalogTrack, Container, ContainerKind};
use crate::tags::{AudioFormat, FileTags, RatingRead};
use crate::timing::format_elapsed;

/// Options fixed for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub mode: SyncMode,
    /// Decide and report, but never write to either store.
    pub dry_run: bool,
}

/// How a single track ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackOutcome {
    /// No usable file; nothing was read.
    Skipped,
    Unchanged,
    /// Plex was rated (or would have been, in a dry run).
    CatalogUpdated,
    /// The file was tagged (or would have been, in a dry run).
    FileUpdated,
    /// The write failed.
    Failed,
}

/// Counts for the end-of-run report.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncSummary {
    /// Every track visited, skipped ones included.
    pub processed: u64,
    pub catalog_updates: u64,
    pub file_updates: u64,
    pub unchanged: u64,
    pub skipped: u64,
    pub failed: u64,
    pub elapsed: Duration,
}

impl SyncSummary {
    fn record(&mut self, outcome: TrackOutcome) {
        self.processed += 1;
        match outcome {
            TrackOutcome::Skipped => self.skipped += 1,
            TrackOutcome::Unchanged => self.unchanged += 1,
            TrackOutcome::CatalogUpdated => self.catalog_updates += 1,
            TrackOutcome::FileUpdated => self.file_updates += 1,
            TrackOutcome::Failed => self.failed += 1,
        }
    }
}

/// Reconciles ratings between a catalog and the audio files it points at.
///
/// Tracks are handled one at a time in catalog order: library list order,
/// then artist, album and track order as the catalog returns them.
pub struct RatingSync<'a, C, T> {
    catalog: &'a C,
    tags: &'a T,
}

impl<'a, C: Catalog, T: FileTags> RatingSync<'a, C, T> {
    pub fn new(catalog: &'a C, tags: &'a T) -> Self {
        Self { catalog, tags }
    }

    /// Process every track of the given libraries.
    pub fn run(&self, libraries: &[String], options: &RunOptions) -> SyncSummary {
        let start = Instant::now();
        let mut summary = SyncSummary::default();

        log::info!("{} started: {}", options.mode.label(), options.mode.direction());

        for library in libraries {
            log::info!("Processing Plex library: {library}");

            let items = match self.catalog.library_items(library) {
                Ok(items) => items,
                Err(e) => {
                    log::error!("Failed to list library {library}: {e}");
                    continue;
                }
            };

            if items.is_empty() {
                log::warn!("No items found in library: {library}");
                continue;
            }

            self.walk(&items, options, &mut summary);
        }

        summary.elapsed = start.elapsed();
        log::info!(
            "Processed {} tracks in {}",
            summary.processed,
            format_elapsed(summary.elapsed)
        );
        log::info!("{} completed: {}", options.mode.label(), options.mode.direction());

        summary
    }

    fn walk(&self, items: &[CatalogItem], options: &RunOptions, summary: &mut SyncSummary) {
        for item in items {
            match item {
                CatalogItem::Track(track) => {
                    let outcome = self.process_track(track, options);
                    summary.record(outcome);
                }
                CatalogItem::Container(container) => {
                    let children = match self.catalog.children(container) {
                        Ok(children) => children,
                        Err(e) => {
                            log::error!("Failed to list \"{}\": {e}", container.title);
                            continue;
                        }
                    };
                    log_container(container, &children);
                    self.walk(&children, options, summary);
                }
            }
        }
    }

    /// Resolve, read, decide and (maybe) write one track.
    pub fn process_track(&self, track: &CatalogTrack, options: &RunOptions) -> TrackOutcome {
        let start = Instant::now();
        log_track(track);

        let Some(path) = track.file.as_deref() else {
            log::warn!("        No file reported by Plex");
            return TrackOutcome::Skipped;
        };
        if !path.exists() {
            log::warn!("        File not found on disk");
            return TrackOutcome::Skipped;
        }
        let Some(format) = AudioFormat::from_path(path) else {
            log::warn!("        Skipping unsupported file type");
            return TrackOutcome::Skipped;
        };

        let catalog_rating = match self.catalog.read_rating(track) {
            RatingRead::Failed(reason) => {
                log::error!("        Failed to read Plex rating: {reason}");
                None
            }
            read => read.rating(),
        };
        match catalog_rating {
            Some(rating) => log::debug!("        Read Plex rating: {rating}"),
            None => log::debug!("        No rating found in Plex"),
        }
        let file_rating = self.tags.read_rating(path, format).rating();

        let decision = decide(options.mode, catalog_rating, file_rating);
        let outcome = self.apply(track, path, format, decision, options.dry_run);

        log::debug!("        Processed in {}", format_elapsed(start.elapsed()));
        outcome
    }

    fn apply(
        &self,
        track: &CatalogTrack,
        path: &Path,
        format: AudioFormat,
        decision: Decision,
        dry_run: bool,
    ) -> TrackOutcome {
        match decision {
            Decision::WriteCatalog(rating) => {
                if dry_run {
                    log::info!("        [dry-run] Would have rated Plex track: {rating}");
                    return TrackOutcome::CatalogUpdated;
                }
                match self.catalog.write_rating(track, rating) {
                    Ok(()) => {
                        log::info!("        Rated Plex track: {rating}");
                        TrackOutcome::CatalogUpdated
                    }
                    Err(e) => {
                        log::error!("        Failed to rate Plex track: {e}");
                        TrackOutcome::Failed
                    }
                }
            }
            Decision::WriteFile(rating) => {
                let change = format!("{rating} => {}", format.encoded(rating));
                if dry_run {
                    log::info!("        [dry-run] Would have rated {} file: {change}", format.name());
                    return TrackOutcome::FileUpdated;
                }
                match self.tags.write_rating(path, format, rating) {
                    Ok(()) => {
                        log::info!("        Rated {} file: {change}", format.name());
                        TrackOutcome::FileUpdated
                    }
                    Err(e) => {
                        log::error!("        Failed to write rating to {} file: {e}", format.name());
                        TrackOutcome::Failed
                    }
                }
            }
            Decision::AlreadyMatching => {
                log::debug!("        Ratings already match");
                TrackOutcome::Unchanged
            }
            Decision::NothingToCopy => {
                log::debug!("        No rating to copy");
                TrackOutcome::Unchanged
            }
        }
    }
}

fn log_container(container: &Container, children: &[CatalogItem]) {
    match container.kind {
        ContainerKind::Artist => log::info!("  Artist: {}", container.title),
        ContainerKind::Album => {
            // Plex has no album path; use the first track's directory
            let dir = children.iter().find_map(|item| match item {
                CatalogItem::Track(t) => t.file.as_deref().and_then(Path::parent),
                CatalogItem::Container(_) => None,
            });
            match dir {
                Some(dir) => log::info!("    Album: {} ({})", container.title, dir.display()),
                None => log::info!("    Album: {}", container.title),
            }
        }
    }
}

fn log_track(track: &CatalogTrack) {
    let file_name = track
        .file
        .as_deref()
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match track.index {
        Some(index) => log::info!("      Track: {index:02}. {} ({file_name})", track.title),
        None => log::info!("      Track: {} ({file_name})", track.title),
    }
}
