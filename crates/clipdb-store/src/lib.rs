//! Per-book text files under a destination directory.
//!
//! Each book is loaded at most once per run; its text is kept in memory and
//! grown with every append so it can serve as the containment oracle for
//! later records. Files are only ever appended to.

use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use clipdb_core::sanitize::{sanitize, MAX_STEM_LEN};
use clipdb_core::{BookFile, ClippingRecord, Error, Result, TextCodec};

pub const BOOK_EXTENSION: &str = "txt";
pub const ENTRY_SEPARATOR: &str = "\n...\n\n";
/// Stem used when a title sanitizes to nothing.
pub const UNTITLED: &str = "Untitled";
/// Shortest stem budget a destination may leave. Deeper destinations are
/// refused, since every title would truncate to nothing and share one file.
pub const MIN_STEM_BUDGET: usize = 32;

pub struct BookStore {
    root: PathBuf,
    codec: TextCodec,
    reserved: usize,
    books: HashMap<String, BookFile>,
}

impl BookStore {
    /// Open a store rooted at `root`, creating the directory and its parents.
    ///
    /// Fails with [`Error::InvalidConfig`] when the path of `root` is so long
    /// that fewer than [`MIN_STEM_BUDGET`] bytes remain for file stems.
    pub fn new(root: impl Into<PathBuf>, codec: TextCodec) -> Result<Self> {
        let root = root.into();
        let reserved = root.to_string_lossy().len();
        if MAX_STEM_LEN.saturating_sub(reserved) < MIN_STEM_BUDGET {
            return Err(Error::InvalidConfig(format!(
                "destination path is too long to hold book files: {}",
                root.display()
            )));
        }
        fs::create_dir_all(&root).map_err(|e| Error::io(&root, e))?;
        Ok(Self { root, codec, reserved, books: HashMap::new() })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File stem for a raw title, bounded so the full path stays legal.
    pub fn stem_for(&self, raw_title: &str) -> String {
        let stem = sanitize(raw_title, self.reserved);
        if stem.is_empty() {
            UNTITLED.to_string()
        } else {
            stem
        }
    }

    pub fn path_for(&self, sanitized_title: &str) -> PathBuf {
        self.root.join(format!("{sanitized_title}.{BOOK_EXTENSION}"))
    }

    /// The book for `sanitized_title`, reading any existing file the first
    /// time the title is seen.
    pub fn open_or_create(&mut self, sanitized_title: &str) -> Result<&BookFile> {
        self.book_mut(sanitized_title).map(|book| &*book)
    }

    /// Append `records` to the book in order. Returns the number of bytes written.
    ///
    /// The file is created on the first non-empty append.
    pub fn append(
        &mut self,
        sanitized_title: &str,
        records: &[ClippingRecord],
        include_metadata: bool,
    ) -> Result<usize> {
        let codec = self.codec;
        let book = self.book_mut(sanitized_title)?;
        if records.is_empty() {
            return Ok(0);
        }

        let text: String = records.iter().map(|r| format_entry(r, include_metadata)).collect();
        let bytes = codec.encode(&text);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&book.path)
            .map_err(|e| Error::io(&book.path, e))?;
        file.write_all(&bytes).map_err(|e| Error::io(&book.path, e))?;

        book.existing_text.push_str(&text);
        book.bytes_appended += bytes.len() as u64;
        tracing::debug!(
            book = %book.sanitized_title,
            entries = records.len(),
            bytes = bytes.len(),
            "appended entries"
        );
        Ok(bytes.len())
    }

    /// Paths of every book created or grown since this store was opened.
    pub fn touched_paths(&self) -> BTreeSet<PathBuf> {
        self.books.values().filter(|b| b.touched()).map(|b| b.path.clone()).collect()
    }

    fn book_mut(&mut self, sanitized_title: &str) -> Result<&mut BookFile> {
        let path = self.path_for(sanitized_title);
        let codec = self.codec;
        match self.books.entry(sanitized_title.to_string()) {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(e) => {
                let existing_text = if path.is_file() {
                    codec.read_file(&path)?
                } else {
                    String::new()
                };
                tracing::debug!(path = %path.display(), bytes = existing_text.len(), "opened book");
                Ok(e.insert(BookFile {
                    sanitized_title: sanitized_title.to_string(),
                    path,
                    existing_text,
                    bytes_appended: 0,
                }))
            }
        }
    }
}

/// `<body>\n[<metadata>\n]\n...\n\n`
pub fn format_entry(record: &ClippingRecord, include_metadata: bool) -> String {
    let capacity = record.body.len() + record.metadata_line.len() + ENTRY_SEPARATOR.len() + 2;
    let mut entry = String::with_capacity(capacity);
    entry.push_str(&record.body);
    entry.push('\n');
    if include_metadata {
        entry.push_str(&record.metadata_line);
        entry.push('\n');
    }
    entry.push_str(ENTRY_SEPARATOR);
    entry
}
