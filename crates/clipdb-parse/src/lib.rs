//! clipdb-parse
//!
//! Turns the raw export stream into ordered chunks and chunks into
//! [`ClippingRecord`](clipdb_core::ClippingRecord)s.

pub mod parse;
pub mod split;

pub use parse::{parse, parse_added_on, ChunkError, ParsedClipping};
pub use split::{split, Chunks, RECORD_DELIMITER};
