//! Core types for the TCK deployer
//!
//! This crate defines the vocabulary shared by the archive rewriter and the
//! deployment session:
//! - [`ArchiveEntry`] and [`ArchiveKind`]: what an archive holds and how its
//!   paths are remapped
//! - [`ResourceOverrideMap`] and [`ContentSource`]: caller-supplied
//!   replacements and additions applied while rewriting
//! - [`DeploymentRequest`] and [`DeploymentId`]: one deploy call
//! - [`OverrideResolver`]: the boundary to whatever decides which overrides
//!   apply to an artifact
//! - [`DeployError`]: the failure taxonomy captured by a session

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod overrides;
pub mod resolver;
pub mod types;

pub use error::{DeployError, Result};
pub use overrides::{BytesSource, ContentSource, FileSource, ResourceOverrideMap};
pub use resolver::{NoOverrides, OverrideResolver};
pub use types::{paths, ArchiveEntry, ArchiveKind, DeploymentId, DeploymentRequest};
