//! Boundary to the metadata that decides which overrides apply
//!
//! The deployer never inspects test artifacts itself. Whatever knows which
//! descriptors belong to an artifact implements [`OverrideResolver`] and
//! hands back a fresh [`ResourceOverrideMap`] per deployment.

use crate::error::Result;
use crate::overrides::ResourceOverrideMap;

/// Produce the override map for a logical deployment name
pub trait OverrideResolver: Send + Sync {
    /// Resolve overrides for `name`
    ///
    /// A mandatory override that cannot be located must fail with
    /// [`DeployError::ResourceResolution`](crate::DeployError::ResourceResolution)
    /// rather than be left out.
    fn resolve(&self, name: &str) -> Result<ResourceOverrideMap>;
}

impl<F> OverrideResolver for F
where
    F: Fn(&str) -> Result<ResourceOverrideMap> + Send + Sync,
{
    fn resolve(&self, name: &str) -> Result<ResourceOverrideMap> {
        self(name)
    }
}

/// Resolver that never overrides anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOverrides;

impl OverrideResolver for NoOverrides {
    fn resolve(&self, _name: &str) -> Result<ResourceOverrideMap> {
        Ok(ResourceOverrideMap::new())
    }
}
