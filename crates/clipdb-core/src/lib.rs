//! Shared building blocks for the clippings engine: domain types, errors,
//! configuration, the title sanitizer and the text codec.

pub mod codec;
pub mod config;
pub mod error;
pub mod sanitize;
pub mod types;

pub use codec::TextCodec;
pub use error::{Error, MetadataParseError, Result};
pub use types::{BookFile, ClippingRecord, RawChunk, RunReport, RunStats};
