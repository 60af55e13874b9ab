//! Convenient imports for harness integrations.
//!
//! ```ignore
//! use tck_deployer::prelude::*;
//!
//! let containers = ContainersImpl::without_overrides(gateway, DeployerConfig::from_env());
//! ```

// Harness surface
pub use crate::containers::{Containers, ContainersImpl};
pub use crate::config::DeployerConfig;
pub use crate::catalog::DescriptorCatalog;

// Error handling
pub use crate::error::{DeploymentException, Error, Result};

// Runtime boundary
pub use deployer_session::{GatewayError, RuntimeGateway, RuntimeHandle};

// Override resolution
pub use deployer_core::{BytesSource, FileSource, OverrideResolver, ResourceOverrideMap};
