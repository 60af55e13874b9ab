//! Deployment failure taxonomy
//!
//! Every failure a deployment can run into is funneled into [`DeployError`]
//! before it reaches the session's error slot:
//!
//! | Variant | Raised by |
//! |---------|-----------|
//! | `Validation` | Runtime rejected the archive contents as semantically invalid |
//! | `RuntimeCreation` | Any other failure while creating the runtime handle |
//! | `ResourceResolution` | A required override could not be located or opened |
//! | `Io` | Reading entries or writing the temporary archive |
//! | `Archive` | Malformed input archive or failing archive writer |
//! | `DuplicateEntry` | Two input entries remap onto the same output path |

use std::io;
use thiserror::Error;

/// Result type for deployer operations
pub type Result<T> = std::result::Result<T, DeployError>;

/// A failed deployment step
#[derive(Debug, Error)]
pub enum DeployError {
    /// The runtime rejected the archive as semantically invalid
    #[error("validation failed: {message}")]
    Validation {
        /// Message reported by the runtime
        message: String,
    },

    /// The runtime could not be created for any reason other than validation
    #[error("runtime creation failed: {message}")]
    RuntimeCreation {
        /// Message reported by the runtime
        message: String,
        /// Underlying cause, when the runtime reported one
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },

    /// A required override could not be located or opened
    #[error("cannot resolve resource {path}: {reason}")]
    ResourceResolution {
        /// Archive path (or catalog path) that failed to resolve
        path: String,
        /// Why resolution failed
        reason: String,
    },

    /// I/O error while reading entries or persisting the archive
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed archive or archive writer failure
    #[error("archive error: {0}")]
    Archive(String),

    /// Two entries resolved to the same output path
    #[error("duplicate archive entry: {0}")]
    DuplicateEntry(String),
}

impl DeployError {
    /// Create a validation failure
    pub fn validation(message: impl Into<String>) -> Self {
        DeployError::Validation {
            message: message.into(),
        }
    }

    /// Create a resource resolution failure
    pub fn resource(path: impl Into<String>, reason: impl Into<String>) -> Self {
        DeployError::ResourceResolution {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Check if the runtime rejected the archive contents
    pub fn is_validation(&self) -> bool {
        matches!(self, DeployError::Validation { .. })
    }

    /// Check if the failure happened before the runtime was ever called
    ///
    /// Rewrite failures (resources, I/O, archive format) abort the
    /// deployment before a runtime handle is requested.
    pub fn is_rewrite_failure(&self) -> bool {
        matches!(
            self,
            DeployError::ResourceResolution { .. }
                | DeployError::Io(_)
                | DeployError::Archive(_)
                | DeployError::DuplicateEntry(_)
        )
    }
}
