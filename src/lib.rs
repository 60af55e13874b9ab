//! # TCK Deployer
//!
//! Deployment adapter letting a compatibility test harness deploy test
//! archives into an embeddable container runtime.
//!
//! Each deployment rewrites the incoming archive (descriptor overrides,
//! web-layout remapping, optional default component descriptor), stages it
//! on disk, swaps the thread's execution context, and asks the runtime to
//! create itself from the staged file.
//!
//! ## Quick Start
//!
//! ```ignore
//! use tck_deployer::prelude::*;
//!
//! let catalog = DescriptorCatalog::load("tck/catalog.json")?;
//! let containers = ContainersImpl::new(MyGateway::new(), catalog, DeployerConfig::from_env());
//!
//! containers.setup()?;
//! if !containers.deploy(&mut archive, "org.example.tck.BeanTest.war") {
//!     let failure = containers.deployment_exception();
//! }
//! containers.undeploy("org.example.tck.BeanTest.war");
//! containers.cleanup()?;
//! ```
//!
//! ## Crates
//!
//! - [`deployer_core`] - entries, archive kinds, overrides, [`DeployError`]
//! - [`deployer_archive`] - tar reading, writing, rewriting
//! - [`deployer_session`] - execution context, runtime gateway, session state machine

#![warn(missing_docs)]
#![warn(clippy::all)]

mod catalog;
mod config;
mod containers;
mod error;
mod logging;

pub mod prelude;

pub use catalog::{ArtifactDescriptors, DescriptorCatalog, ResourceMapping};
pub use config::{DeployerConfig, FORCE_DEPLOYMENT_ENV, STAGING_DIR_ENV};
pub use containers::{Containers, ContainersImpl};
pub use error::{DeploymentException, Error, Result};
pub use logging::{init_logging, init_logging_with};

pub use deployer_archive::{write_entries, ArchiveReader, ArchiveRewriter, RewriteStats};
pub use deployer_core::Result as DeployResult;
pub use deployer_core::{
    paths, ArchiveEntry, ArchiveKind, BytesSource, ContentSource, DeployError, DeploymentId,
    FileSource, NoOverrides, OverrideResolver, ResourceOverrideMap,
};
pub use deployer_session::{
    context, CollectionSummary, DeploymentInfo, DeploymentSession, ExecutionContext, GatewayError,
    RuntimeGateway, RuntimeHandle, SessionOptions, SessionState,
};
