use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot find clippings source: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Unknown text encoding: {0}")]
    UnknownEncoding(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failure to read the structured header of a single clipping.
///
/// Always local to one record: the caller drops or degrades that record and
/// keeps going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataParseError {
    #[error("metadata line has no \"Added on \" marker")]
    MissingAddedOn,

    #[error("metadata line is not a clipping header")]
    UnrecognizedMetadata,

    #[error("unparseable clipping timestamp: {0:?}")]
    InvalidTimestamp(String),
}
