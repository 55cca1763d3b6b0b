use clipdb_core::RawChunk;

pub const RECORD_DELIMITER: &str = "==========";

/// Minimum lines a chunk must carry: title, metadata, blank, body.
const MIN_LINES: usize = 4;

/// Split an export into its well-formed chunks, in stream order.
///
/// Every piece between delimiters starts with the residue of the delimiter
/// line, which is dropped. The first piece has no delimiter in front of it and
/// is taken whole. Pieces left with fewer than four lines, or with a blank
/// body line, are skipped here and only counted.
pub fn split(raw_text: &str) -> Chunks<'_> {
    Chunks { pieces: raw_text.split(RECORD_DELIMITER), index: 0, skipped: 0 }
}

#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    pieces: std::str::Split<'a, &'static str>,
    index: usize,
    skipped: usize,
}

impl Chunks<'_> {
    /// Pieces consumed so far, well-formed or not.
    pub fn seen(&self) -> usize {
        self.index
    }

    /// Pieces consumed so far that were not emitted.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl Iterator for Chunks<'_> {
    type Item = RawChunk;

    fn next(&mut self) -> Option<RawChunk> {
        loop {
            let piece = self.pieces.next()?;
            let index = self.index;
            self.index += 1;

            let text = if index == 0 {
                piece
            } else {
                piece.split_once('\n').map_or("", |(_, rest)| rest)
            };
            if is_well_formed(text) {
                return Some(RawChunk { index, text: text.to_string() });
            }
            self.skipped += 1;
        }
    }
}

fn is_well_formed(text: &str) -> bool {
    text.split('\n').nth(MIN_LINES - 1).is_some_and(|body| !body.trim().is_empty())
}
