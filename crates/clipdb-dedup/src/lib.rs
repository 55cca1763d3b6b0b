//! clipdb-dedup
//!
//! Drops clippings that are already on disk and collapses highlights the
//! device re-emitted moments after the selection was extended.

pub mod similarity;

use chrono::NaiveDateTime;
use clipdb_core::ClippingRecord;

pub use similarity::{is_near_duplicate, near_duplicate_window, similarity, SIMILARITY_THRESHOLD};

/// What the near-duplicate pass needs to know about an entry.
pub trait Clipping {
    fn body(&self) -> &str;
    fn added_at(&self) -> Option<NaiveDateTime>;
}

impl Clipping for ClippingRecord {
    fn body(&self) -> &str {
        &self.body
    }

    fn added_at(&self) -> Option<NaiveDateTime> {
        self.added_at
    }
}

/// Surviving records for one book, in input order, and why the rest went.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DedupOutcome {
    pub kept: Vec<ClippingRecord>,
    pub duplicates_exact: usize,
    pub duplicates_fuzzy: usize,
}

/// One flag per entry: `true` when the entry is superseded by its successor.
///
/// A single adjacent-pair scan; the last entry is never redundant.
pub fn redundant_marks<T: Clipping>(items: &[T]) -> Vec<bool> {
    items
        .windows(2)
        .map(|pair| is_near_duplicate(&pair[0], &pair[1]))
        .chain(std::iter::once(false))
        .take(items.len())
        .collect()
}

/// Remove every entry superseded by its successor, preserving order.
pub fn collapse_near_duplicates<T: Clipping>(items: Vec<T>) -> Vec<T> {
    let marks = redundant_marks(&items);
    items
        .into_iter()
        .zip(marks)
        .filter_map(|(item, redundant)| (!redundant).then_some(item))
        .collect()
}

/// Deduplicate one book's records from this run against its persisted text.
///
/// A record whose body already appears in `existing_text`, or in a body kept
/// earlier in this call, is an exact duplicate. Otherwise it is dropped when
/// it is a near-duplicate of the record that follows it in `records`.
/// Adjacency is judged on `records` as given, before anything is removed, so
/// a rerun over the same export reaches the same verdicts.
pub fn dedupe(existing_text: &str, records: Vec<ClippingRecord>) -> DedupOutcome {
    let marks = redundant_marks(&records);
    let mut oracle = existing_text.to_string();
    let mut outcome = DedupOutcome::default();

    for (record, redundant) in records.into_iter().zip(marks) {
        if oracle.contains(record.body.as_str()) {
            outcome.duplicates_exact += 1;
        } else if redundant {
            outcome.duplicates_fuzzy += 1;
        } else {
            oracle.push_str(&record.body);
            oracle.push('\n');
            outcome.kept.push(record);
        }
    }

    tracing::debug!(
        kept = outcome.kept.len(),
        exact = outcome.duplicates_exact,
        fuzzy = outcome.duplicates_fuzzy,
        "deduplicated book records"
    );
    outcome
}
