//! Deployer configuration.
//!
//! Settings come from defaults, the process environment, or explicit
//! builder calls, in that order of precedence (later wins).
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `TCK_FORCE_DEPLOYMENT` | Synthesize `META-INF/beans.xml` when an archive lacks one |
//! | `TCK_STAGING_DIR` | Directory for staged archives |

use deployer_session::SessionOptions;
use std::path::PathBuf;

/// Environment variable enabling forced deployment
pub const FORCE_DEPLOYMENT_ENV: &str = "TCK_FORCE_DEPLOYMENT";

/// Environment variable selecting the staging directory
pub const STAGING_DIR_ENV: &str = "TCK_STAGING_DIR";

/// Deployer configuration.
///
/// # Example
///
/// ```ignore
/// let config = DeployerConfig::from_env()
///     .force_deployment(true)
///     .staging_dir("/tmp/tck");
/// ```
#[derive(Debug, Clone)]
pub struct DeployerConfig {
    /// Synthesize a default component descriptor when an archive has none
    pub force_deployment: bool,
    /// Where staged archives are written (system temp dir when `None`)
    pub staging_dir: Option<PathBuf>,
    /// Restore the execution context immediately when a deploy fails
    pub rollback_context_on_failure: bool,
}

impl Default for DeployerConfig {
    fn default() -> Self {
        DeployerConfig {
            force_deployment: false,
            staging_dir: None,
            rollback_context_on_failure: true,
        }
    }
}

impl DeployerConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup
    ///
    /// `TCK_FORCE_DEPLOYMENT` is on when set to anything except an empty
    /// string, `0` or `false`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(value) = lookup(FORCE_DEPLOYMENT_ENV) {
            config.force_deployment = is_enabled(&value);
        }
        if let Some(dir) = lookup(STAGING_DIR_ENV).filter(|d| !d.is_empty()) {
            config.staging_dir = Some(PathBuf::from(dir));
        }
        config
    }

    /// Set the forced-deployment toggle
    pub fn force_deployment(mut self, enabled: bool) -> Self {
        self.force_deployment = enabled;
        self
    }

    /// Set the staging directory
    pub fn staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = Some(dir.into());
        self
    }

    /// Keep the swapped execution context installed after a failed deploy
    /// until `undeploy` is called
    pub fn keep_context_on_failure(mut self) -> Self {
        self.rollback_context_on_failure = false;
        self
    }

    pub(crate) fn session_options(&self) -> SessionOptions {
        SessionOptions {
            inject_default_descriptor: self.force_deployment,
            staging_dir: self.staging_dir.clone(),
            rollback_context_on_failure: self.rollback_context_on_failure,
        }
    }
}

fn is_enabled(value: &str) -> bool {
    let value = value.trim();
    !(value.is_empty() || value == "0" || value.eq_ignore_ascii_case("false"))
}
