use std::path::Path;

use clipdb_core::TextCodec;
use clipdb_dedup::collapse_near_duplicates;
use clipdb_parse::parse::METADATA_LINE;
use clipdb_parse::parse_added_on;

use crate::document::Highlight;

const SEPARATOR_LINE: &str = "...";

/// Read a book file back into highlights.
///
/// Separator and blank lines are dropped; a metadata line attaches to the
/// body before it. Near-duplicates are collapsed again, since older book
/// files may predate that pass.
pub fn read_book(path: &Path, codec: &TextCodec) -> clipdb_core::Result<Vec<Highlight>> {
    let text = codec.read_file(path)?;
    Ok(parse_book_text(&text))
}

pub fn parse_book_text(text: &str) -> Vec<Highlight> {
    let mut highlights: Vec<Highlight> = Vec::new();
    for line in text.lines().filter(|l| !l.is_empty() && *l != SEPARATOR_LINE) {
        if METADATA_LINE.is_match(line) {
            // orphaned metadata (no body before it) is dropped
            if let Some(last) = highlights.last_mut().filter(|h| h.metadata.is_none()) {
                last.added_at = parse_added_on(line).ok();
                last.metadata = Some(line.to_string());
            }
        } else {
            highlights.push(Highlight::new(line));
        }
    }
    collapse_near_duplicates(highlights)
}
