//! Unified error types for the deployer.
//!
//! [`Error`] covers failures of the deployer's own plumbing (catalog
//! loading, setup). Deployment failures never surface as `Error`: they are
//! captured by the session and handed to the harness as a
//! [`DeploymentException`].

use deployer_core::DeployError;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// All deployer errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Deployment step failed
    #[error(transparent)]
    Deploy(#[from] DeployError),

    /// Descriptor catalog is malformed
    #[error("catalog error: {0}")]
    Catalog(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type for deployer operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

/// Harness-level report of a failed deployment.
///
/// Wraps the error captured by the session; the original error is available
/// through [`std::error::Error::source`] and [`DeploymentException::cause`].
#[derive(Debug, Clone)]
pub struct DeploymentException {
    message: String,
    cause: Arc<DeployError>,
}

impl DeploymentException {
    /// Wrap a captured deployment error
    pub fn new(cause: Arc<DeployError>) -> Self {
        DeploymentException {
            message: cause.to_string(),
            cause,
        }
    }

    /// Failure message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The captured error
    pub fn cause(&self) -> &DeployError {
        &self.cause
    }

    /// Check if the runtime rejected the archive contents.
    pub fn is_validation(&self) -> bool {
        self.cause.is_validation()
    }
}

impl fmt::Display for DeploymentException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "deployment failed: {}", self.message)
    }
}

impl std::error::Error for DeploymentException {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.cause.as_ref())
    }
}
