//! Harness-facing deployment surface.
//!
//! The TCK harness drives a deployer through [`Containers`]:
//!
//! ```text
//! setup()
//!   deploy(archive, name) ──false──> deployment_exception()
//!   undeploy(name)
//!   ... repeated per test artifact ...
//! cleanup()
//! ```
//!
//! [`ContainersImpl`] adapts a [`DeploymentSession`] to that surface.

use crate::config::DeployerConfig;
use crate::error::{DeploymentException, Result};
use deployer_core::{DeploymentRequest, NoOverrides, OverrideResolver};
use deployer_session::{DeploymentSession, RuntimeGateway};
use std::io::Read;
use tracing::debug;

/// Deployment capability the harness calls into
pub trait Containers {
    /// Called once before any deployment
    fn setup(&self) -> Result<()>;

    /// Deploy `archive` under `name`; `false` means the runtime rejected it
    fn deploy(&self, archive: &mut dyn Read, name: &str) -> bool;

    /// Failure of the last deploy, if it returned `false`
    fn deployment_exception(&self) -> Option<DeploymentException>;

    /// Tear down the deployment named `name`; never fails
    fn undeploy(&self, name: &str);

    /// Called once after all deployments
    fn cleanup(&self) -> Result<()>;
}

/// [`Containers`] backed by a deployment session and an override resolver
pub struct ContainersImpl<G: RuntimeGateway, R: OverrideResolver = NoOverrides> {
    session: DeploymentSession<G>,
    resolver: R,
}

impl<G: RuntimeGateway> ContainersImpl<G, NoOverrides> {
    /// Deployer that applies no resource overrides
    pub fn without_overrides(gateway: G, config: DeployerConfig) -> Self {
        Self::new(gateway, NoOverrides, config)
    }
}

impl<G: RuntimeGateway, R: OverrideResolver> ContainersImpl<G, R> {
    /// Create a deployer
    pub fn new(gateway: G, resolver: R, config: DeployerConfig) -> Self {
        debug!(config = ?config, "creating deployer");
        ContainersImpl {
            session: DeploymentSession::with_options(gateway, config.session_options()),
            resolver,
        }
    }

    /// Underlying session
    pub fn session(&self) -> &DeploymentSession<G> {
        &self.session
    }
}

impl<G: RuntimeGateway, R: OverrideResolver> Containers for ContainersImpl<G, R> {
    fn setup(&self) -> Result<()> {
        debug!("deployer setup");
        Ok(())
    }

    fn deploy(&self, archive: &mut dyn Read, name: &str) -> bool {
        self.session
            .deploy(DeploymentRequest::new(archive, name), &self.resolver)
    }

    fn deployment_exception(&self) -> Option<DeploymentException> {
        self.session.deployment_error().map(DeploymentException::new)
    }

    fn undeploy(&self, name: &str) {
        self.session.undeploy(name);
    }

    fn cleanup(&self) -> Result<()> {
        debug!("deployer cleanup");
        Ok(())
    }
}
