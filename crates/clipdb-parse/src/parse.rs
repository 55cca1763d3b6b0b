use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use clipdb_core::{ClippingRecord, MetadataParseError, RawChunk};

const BOM: char = '\u{feff}';
const ADDED_ON: &str = "Added on ";

/// Recognises a clipping header such as
/// `- Your Highlight on page 12 | Location 170-171 | Added on ...`.
pub static METADATA_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Your.*\| Added on").expect("metadata pattern"));

/// Accepted timestamp layouts, tried in order. The first is the device's
/// international layout, the second its US layout.
const TIMESTAMP_FORMATS: [&str; 2] = ["%d %B %Y %H:%M:%S", "%B %d, %Y %I:%M:%S %p"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChunkError {
    #[error("chunk {index} has too few lines or an empty body")]
    Malformed { index: usize },

    #[error("chunk {index}: {source}")]
    Metadata {
        index: usize,
        #[source]
        source: MetadataParseError,
    },
}

/// A parsed record plus the timestamp failure, if any, that it was built with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedClipping {
    pub record: ClippingRecord,
    pub timestamp_error: Option<MetadataParseError>,
}

/// Parse one chunk.
///
/// A chunk whose metadata line is not a clipping header is rejected. A chunk
/// whose timestamp cannot be read still yields a record, with `added_at`
/// unset and the failure reported alongside.
pub fn parse(chunk: &RawChunk) -> Result<ParsedClipping, ChunkError> {
    let mut lines = chunk.lines();
    let (Some(title), Some(metadata_line), Some(_), Some(body)) =
        (lines.next(), lines.next(), lines.next(), lines.next())
    else {
        return Err(ChunkError::Malformed { index: chunk.index });
    };
    if body.trim().is_empty() {
        return Err(ChunkError::Malformed { index: chunk.index });
    }
    if !METADATA_LINE.is_match(metadata_line) {
        return Err(ChunkError::Metadata {
            index: chunk.index,
            source: MetadataParseError::UnrecognizedMetadata,
        });
    }

    let (added_at, timestamp_error) = match parse_added_on(metadata_line) {
        Ok(ts) => (Some(ts), None),
        Err(e) => (None, Some(e)),
    };

    Ok(ParsedClipping {
        record: ClippingRecord {
            title: title.strip_prefix(BOM).unwrap_or(title).to_string(),
            metadata_line: metadata_line.to_string(),
            body: body.to_string(),
            added_at,
            source_index: chunk.index,
        },
        timestamp_error,
    })
}

/// Read the `Added on ...` timestamp from a metadata line.
///
/// Everything after `"Added on "` is taken; a leading weekday (anything up to
/// the first `", "`) is skipped.
pub fn parse_added_on(metadata_line: &str) -> Result<NaiveDateTime, MetadataParseError> {
    let (_, rest) = metadata_line.split_once(ADDED_ON).ok_or(MetadataParseError::MissingAddedOn)?;
    let rest = rest.trim();
    let tail = rest.split_once(", ").map_or(rest, |(_, tail)| tail.trim());

    [tail, rest]
        .into_iter()
        .flat_map(|candidate| TIMESTAMP_FORMATS.iter().map(move |fmt| (candidate, *fmt)))
        .find_map(|(candidate, fmt)| NaiveDateTime::parse_from_str(candidate, fmt).ok())
        .ok_or_else(|| MetadataParseError::InvalidTimestamp(rest.to_string()))
}
