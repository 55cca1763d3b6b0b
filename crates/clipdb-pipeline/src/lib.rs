//! Drives one export through split -> parse -> group -> dedupe -> append.

use std::collections::HashMap;
use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, Span};

use clipdb_core::{ClippingRecord, Error, Result, RunReport, RunStats, TextCodec};
use clipdb_dedup::dedupe;
use clipdb_parse::{parse, split, ChunkError, RECORD_DELIMITER};
use clipdb_store::BookStore;

/// Records for one book, in stream order.
struct BookGroup {
    title: String,
    records: Vec<ClippingRecord>,
}

pub struct Orchestrator {
    span: Span,
    show_progress: bool,
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new(tracing::info_span!("clipdb_run"))
    }
}

impl Orchestrator {
    /// Every event of a run is emitted inside `span`.
    pub fn new(span: Span) -> Self {
        Self { span, show_progress: false }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Organise the export at `source_path` into one text file per book
    /// under `destination`, returning the files created or grown.
    pub fn run(
        &self,
        source_path: &Path,
        destination: &Path,
        encoding: &str,
        include_metadata: bool,
    ) -> Result<RunReport> {
        let _entered = self.span.enter();
        info!(source = %source_path.display(), "processing clippings export");
        if !source_path.is_file() {
            return Err(Error::SourceNotFound(source_path.to_path_buf()));
        }

        let codec = TextCodec::for_label(encoding)?;
        let mut store = BookStore::new(destination, codec)?;
        let raw = codec.read_file(source_path)?;

        let mut stats = RunStats::default();
        let groups = self.collect_groups(&raw, &store, &mut stats);

        for (stem, BookGroup { title, records }) in groups {
            let before = records.len();
            let book = store.open_or_create(&stem)?;
            if !book.path.exists() {
                info!(book = %title, "new highlights recognised from the book");
            }
            let outcome = dedupe(&book.existing_text, records);
            info!(
                book = %title,
                initial = before,
                kept = outcome.kept.len(),
                "clippings after removing repeated and similar notes"
            );

            stats.duplicates_exact += outcome.duplicates_exact;
            stats.duplicates_fuzzy += outcome.duplicates_fuzzy;
            stats.records_written += outcome.kept.len();
            store.append(&stem, &outcome.kept, include_metadata)?;
        }

        let files = store.touched_paths();
        stats.books_touched = files.len();
        info!(?stats, "clippings run complete");
        Ok(RunReport { files, stats })
    }

    /// Split and parse the export, grouping records by file stem in order of
    /// first appearance.
    fn collect_groups(
        &self,
        raw: &str,
        store: &BookStore,
        stats: &mut RunStats,
    ) -> Vec<(String, BookGroup)> {
        let total = raw.matches(RECORD_DELIMITER).count() + 1;
        info!(chunks = total, "highlights identified");
        let progress = progress_bar(total as u64, self.show_progress);

        let mut groups: Vec<(String, BookGroup)> = Vec::new();
        let mut slots: HashMap<String, usize> = HashMap::new();
        let mut chunks = split(raw);
        for chunk in chunks.by_ref() {
            progress.set_position(chunk.index as u64 + 1);
            let parsed = match parse(&chunk) {
                Ok(parsed) => parsed,
                Err(ChunkError::Malformed { index }) => {
                    debug!(index, "skipping malformed chunk");
                    stats.chunks_malformed += 1;
                    continue;
                }
                Err(e @ ChunkError::Metadata { .. }) => {
                    debug!(error = %e, "rejecting chunk");
                    stats.records_rejected += 1;
                    continue;
                }
            };
            stats.records_parsed += 1;
            if let Some(e) = &parsed.timestamp_error {
                debug!(index = chunk.index, error = %e, "keeping clipping without a timestamp");
                stats.metadata_errors += 1;
            }

            let record = parsed.record;
            let stem = store.stem_for(&record.title);
            let slot = *slots.entry(stem.clone()).or_insert_with(|| {
                groups.push((stem, BookGroup { title: record.title.clone(), records: Vec::new() }));
                groups.len() - 1
            });
            groups[slot].1.records.push(record);
        }
        stats.chunks_seen = chunks.seen();
        stats.chunks_malformed += chunks.skipped();
        progress.finish_and_clear();
        groups
    }
}

/// Run with a fresh per-run span and no progress bar.
pub fn run(
    source_path: &Path,
    destination: &Path,
    encoding: &str,
    include_metadata: bool,
) -> Result<RunReport> {
    Orchestrator::default().run(source_path, destination, encoding, include_metadata)
}

fn progress_bar(len: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%)",
    ) {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}
