//! Deployment session for the TCK deployer
//!
//! This crate drives one deployment at a time against an embeddable runtime:
//! - [`DeploymentSession`]: state machine owning the live handle and error slot
//! - [`RuntimeGateway`] / [`RuntimeHandle`]: boundary to the container runtime
//! - [`context`]: the thread-scoped execution context swapped during a deployment

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod gateway;
mod session;
mod staging;

pub use context::ExecutionContext;
pub use gateway::{CollectionSummary, GatewayError, RuntimeGateway, RuntimeHandle};
pub use session::{DeploymentInfo, DeploymentSession, SessionOptions, SessionState};
