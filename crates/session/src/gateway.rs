//! Runtime gateway boundary
//!
//! The embeddable container runtime is an external collaborator. The session
//! only needs three things from it: create a runtime from a staged archive,
//! destroy whatever state a previous runtime left behind, and (optionally)
//! describe what it assembled.

use deployer_core::DeployError;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Failure reported by the runtime
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The archive contents were rejected as semantically invalid
    #[error("validation failed: {0}")]
    Validation(String),

    /// Generic runtime failure, possibly wrapping a more specific cause
    #[error("{message}")]
    Runtime {
        /// Failure message
        message: String,
        /// Wrapped cause
        #[source]
        cause: Option<Box<GatewayError>>,
    },

    /// I/O failure inside the runtime
    #[error("runtime I/O error: {0}")]
    Io(#[from] io::Error),
}

impl GatewayError {
    /// Generic runtime failure without a cause
    pub fn runtime(message: impl Into<String>) -> Self {
        GatewayError::Runtime {
            message: message.into(),
            cause: None,
        }
    }

    /// Generic runtime failure wrapping `cause`
    pub fn wrapping(message: impl Into<String>, cause: GatewayError) -> Self {
        GatewayError::Runtime {
            message: message.into(),
            cause: Some(Box::new(cause)),
        }
    }
}

impl From<GatewayError> for DeployError {
    /// A validation failure directly inside a generic runtime failure is
    /// unwrapped; everything else is a runtime creation failure.
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::Validation(message) => DeployError::Validation { message },
            GatewayError::Runtime {
                cause: Some(cause),
                message,
            } => match *cause {
                GatewayError::Validation(inner) => DeployError::Validation { message: inner },
                other => DeployError::RuntimeCreation {
                    message: message.clone(),
                    source: Some(Box::new(GatewayError::Runtime {
                        message,
                        cause: Some(Box::new(other)),
                    })),
                },
            },
            other => DeployError::RuntimeCreation {
                message: other.to_string(),
                source: Some(Box::new(other)),
            },
        }
    }
}

/// Size of one named collection inside a live runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSummary {
    /// Collection name (e.g. "beans", "interceptors")
    pub name: String,
    /// Number of elements
    pub size: usize,
}

impl CollectionSummary {
    /// Create a summary
    pub fn new(name: impl Into<String>, size: usize) -> Self {
        CollectionSummary {
            name: name.into(),
            size,
        }
    }
}

/// A live runtime created from a staged archive
pub trait RuntimeHandle: Send {
    /// Shut the runtime down
    fn close(self: Box<Self>) -> Result<(), GatewayError>;
}

/// The embeddable container runtime
pub trait RuntimeGateway: Send {
    /// Boot a runtime from the archive at `module` under `app_name`
    fn create(
        &mut self,
        module: &Path,
        app_name: &str,
    ) -> Result<Box<dyn RuntimeHandle>, GatewayError>;

    /// Destroy retained runtime state and detach the thread-scoped context
    ///
    /// Called before every deployment; must be a no-op when nothing is
    /// assembled.
    fn teardown(&mut self) {}

    /// Describe the collections of the most recently created runtime
    fn inventory(&self) -> Vec<CollectionSummary> {
        Vec::new()
    }
}
