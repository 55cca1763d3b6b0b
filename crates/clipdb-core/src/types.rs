//! Domain types passed between the splitter, parser, dedup engine and book store.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// One delimiter-separated block of the export.
///
/// `text` is the block with the delimiter residue line already removed, so
/// its first line is the book title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawChunk {
    pub index: usize,
    pub text: String,
}

impl RawChunk {
    pub fn lines(&self) -> std::str::Split<'_, char> {
        self.text.split('\n')
    }
}

/// A parsed highlight or note. Immutable once built by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClippingRecord {
    pub title: String,
    pub metadata_line: String,
    pub body: String,
    pub added_at: Option<NaiveDateTime>,
    pub source_index: usize,
}

/// On-disk accumulation for one book.
///
/// `existing_text` holds everything known to be in the file: what was there
/// when the book was first opened in this run plus every entry appended since.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookFile {
    pub sanitized_title: String,
    pub path: PathBuf,
    pub existing_text: String,
    pub bytes_appended: u64,
}

impl BookFile {
    pub fn touched(&self) -> bool {
        self.bytes_appended > 0
    }
}

/// Per-run diagnostics counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub chunks_seen: usize,
    pub chunks_malformed: usize,
    pub records_parsed: usize,
    pub records_rejected: usize,
    pub metadata_errors: usize,
    pub duplicates_exact: usize,
    pub duplicates_fuzzy: usize,
    pub records_written: usize,
    pub books_touched: usize,
}

/// Result of one orchestrator run: the book files created or grown, and counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub files: BTreeSet<PathBuf>,
    pub stats: RunStats,
}
