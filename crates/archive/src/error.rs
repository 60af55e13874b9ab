//! Archive error types

use deployer_core::DeployError;
use std::io;
use thiserror::Error;

/// Result type for archive operations
pub type ArchiveResult<T> = std::result::Result<T, ArchiveError>;

/// Errors raised while reading, rewriting or writing an archive
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The input archive could not be read
    #[error("read archive: {0}")]
    Read(#[source] io::Error),

    /// An entry could not be written to the output archive
    #[error("write entry {path}: {source}")]
    Write {
        /// Path of the entry being written
        path: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// An override's content source could not be opened or read
    #[error("cannot read override for {path} from {location}: {source}")]
    Resource {
        /// Target path of the override
        path: String,
        /// Where the content was supposed to come from
        location: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Two entries resolved to the same output path
    #[error("duplicate archive entry: {0}")]
    DuplicateEntry(String),

    /// An input entry is neither a regular file nor a directory
    #[error("unsupported archive entry {path}: {kind}")]
    UnsupportedEntry {
        /// Path of the entry in the input archive
        path: String,
        /// Entry type as found in its header
        kind: String,
    },
}

impl ArchiveError {
    pub(crate) fn write(path: impl Into<String>, source: io::Error) -> Self {
        ArchiveError::Write {
            path: path.into(),
            source,
        }
    }
}

impl From<ArchiveError> for DeployError {
    fn from(e: ArchiveError) -> Self {
        match e {
            ArchiveError::Read(io_err) => DeployError::Io(io_err),
            ArchiveError::Write { path, source } => {
                DeployError::Archive(format!("write entry {}: {}", path, source))
            }
            ArchiveError::Resource {
                path,
                location,
                source,
            } => DeployError::resource(path, format!("{}: {}", location, source)),
            ArchiveError::DuplicateEntry(path) => DeployError::DuplicateEntry(path),
            ArchiveError::UnsupportedEntry { path, kind } => {
                DeployError::Archive(format!("unsupported entry {} ({})", path, kind))
            }
        }
    }
}
