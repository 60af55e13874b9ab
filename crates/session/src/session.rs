//! Deployment session state machine
//!
//! A [`DeploymentSession`] owns the single outstanding deployment: the live
//! runtime handle, the execution context that was current before the deploy,
//! and a single error slot.
//!
//! ## States
//!
//! ```text
//! Idle ──deploy──> Deploying ──ok──> Deployed ──undeploy──> Undeploying ──> Idle
//!                      │
//!                      └──err──> Failed ──undeploy──> Undeploying ──> Idle
//! ```
//!
//! ## Deploy Sequence
//!
//! ```text
//! 1. Clear the error slot
//! 2. Tear down previous runtime state (leftover handle, context, gateway state)
//! 3. Resolve overrides and rewrite the archive
//! 4. Stage the rewritten archive in a temporary file
//! 5. Swap the execution context to one rooted at the staged archive
//! 6. gateway.create(staged path, name)
//! 7. ok: keep the handle | err: restore the context, fill the error slot
//! ```
//!
//! `deploy` and `undeploy` never fail; every failure lands in the error slot
//! or in the log.

use crate::context::{ExecutionContext, RestoreOnDrop, SavedContext};
use crate::gateway::{RuntimeGateway, RuntimeHandle};
use crate::staging::stage_archive;
use chrono::{DateTime, Utc};
use deployer_archive::ArchiveRewriter;
use deployer_core::{
    ArchiveKind, DeployError, DeploymentId, DeploymentRequest, OverrideResolver, Result,
};
use parking_lot::{Mutex, MutexGuard};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempPath;
use tracing::{debug, info, info_span, warn};

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing deployed
    Idle,
    /// A deploy call is in progress
    Deploying,
    /// A runtime handle is live
    Deployed,
    /// The last deploy failed; the error slot is filled
    Failed,
    /// An undeploy call is in progress
    Undeploying,
}

/// Session behavior switches
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Synthesize a default component descriptor when the archive has none
    pub inject_default_descriptor: bool,
    /// Directory for staged archives (system temp dir when `None`)
    pub staging_dir: Option<PathBuf>,
    /// Restore the execution context as soon as a deploy fails
    ///
    /// When off, the swapped context stays installed until `undeploy`.
    pub rollback_context_on_failure: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        SessionOptions {
            inject_default_descriptor: false,
            staging_dir: None,
            rollback_context_on_failure: true,
        }
    }
}

/// Description of the live deployment
#[derive(Debug, Clone)]
pub struct DeploymentInfo {
    /// Deploy attempt identifier
    pub id: DeploymentId,
    /// Logical name
    pub name: String,
    /// Archive kind derived from the name
    pub kind: ArchiveKind,
    /// Staged archive handed to the runtime
    pub archive_path: PathBuf,
    /// When the runtime accepted the archive
    pub deployed_at: DateTime<Utc>,
}

struct SessionInner<G> {
    gateway: G,
    state: SessionState,
    handle: Option<Box<dyn RuntimeHandle>>,
    saved_context: Option<SavedContext>,
    error: Option<Arc<DeployError>>,
    staged: Option<TempPath>,
    current: Option<DeploymentInfo>,
}

/// The single outstanding deployment
///
/// # Thread Safety
///
/// A session serves one caller at a time. Every operation takes the session
/// lock with `try_lock`; finding it held means two deploy/undeploy calls
/// overlap, which is a programming error and panics instead of corrupting
/// the session.
pub struct DeploymentSession<G: RuntimeGateway> {
    inner: Mutex<SessionInner<G>>,
    options: SessionOptions,
    rewriter: ArchiveRewriter,
}

impl<G: RuntimeGateway> DeploymentSession<G> {
    /// Create a session with default options
    pub fn new(gateway: G) -> Self {
        Self::with_options(gateway, SessionOptions::default())
    }

    /// Create a session with explicit options
    pub fn with_options(gateway: G, options: SessionOptions) -> Self {
        DeploymentSession {
            inner: Mutex::new(SessionInner {
                gateway,
                state: SessionState::Idle,
                handle: None,
                saved_context: None,
                error: None,
                staged: None,
                current: None,
            }),
            options,
            rewriter: ArchiveRewriter::new(),
        }
    }

    /// Deploy `request`, returning whether the runtime accepted it
    ///
    /// On `false` the cause is available from [`deployment_error`](Self::deployment_error).
    pub fn deploy(&self, mut request: DeploymentRequest<'_>, resolver: &dyn OverrideResolver) -> bool {
        let mut inner = self.lock("deploy");
        let id = DeploymentId::new();
        let span = info_span!("deploy", deployment = %id, name = request.name());
        let _enter = span.enter();

        inner.error = None;
        inner.teardown();
        inner.state = SessionState::Deploying;

        match inner.try_deploy(&self.options, &self.rewriter, id, &mut request, resolver) {
            Ok(()) => {
                inner.state = SessionState::Deployed;
                info!(kind = %request.kind(), "deployed");
                true
            }
            Err(e) => {
                warn!(error = %e, "deployment failed");
                inner.error = Some(Arc::new(e));
                inner.state = SessionState::Failed;
                false
            }
        }
    }

    /// Tear down the live deployment, if any
    ///
    /// Close failures are logged. The context saved at deploy time is
    /// restored on every path, including when no handle exists.
    pub fn undeploy(&self, name: &str) {
        let mut inner = self.lock("undeploy");
        let span = info_span!("undeploy", app = name);
        let _enter = span.enter();

        inner.state = SessionState::Undeploying;
        let restore = RestoreOnDrop::new(inner.saved_context.take());

        if let Some(current) = inner.current.take() {
            if current.name != name {
                debug!(deployed = %current.name, "undeploy name differs from live deployment");
            }
        }
        if let Some(handle) = inner.handle.take() {
            close_handle(handle);
            info!("undeployed");
        }

        drop(restore);
        inner.state = SessionState::Idle;
    }

    /// Error captured by the last deploy, if it failed
    pub fn deployment_error(&self) -> Option<Arc<DeployError>> {
        self.lock("deployment_error").error.clone()
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.lock("state").state
    }

    /// The live deployment, if any
    pub fn current_deployment(&self) -> Option<DeploymentInfo> {
        self.lock("current_deployment").current.clone()
    }

    fn lock(&self, operation: &str) -> MutexGuard<'_, SessionInner<G>> {
        match self.inner.try_lock() {
            Some(guard) => guard,
            None => panic!(
                "deployment session used concurrently: {} called while another operation is in flight",
                operation
            ),
        }
    }
}

impl<G: RuntimeGateway> SessionInner<G> {
    /// Destroy everything a previous deployment assembled
    fn teardown(&mut self) {
        if let Some(handle) = self.handle.take() {
            let stuck = self.current.as_ref().map(|c| c.name.as_str()).unwrap_or("<unknown>");
            warn!(stuck, "previous deployment was never undeployed; closing it");
            close_handle(handle);
        }
        if let Some(saved) = self.saved_context.take() {
            saved.restore();
        }
        self.gateway.teardown();
        self.current = None;
        self.staged = None;
    }

    fn try_deploy(
        &mut self,
        options: &SessionOptions,
        rewriter: &ArchiveRewriter,
        id: DeploymentId,
        request: &mut DeploymentRequest<'_>,
        resolver: &dyn OverrideResolver,
    ) -> Result<()> {
        let name = request.name().to_string();
        let kind = request.kind();

        let overrides = resolver.resolve(&name)?;
        debug!(overrides = ?overrides, "resolved overrides");

        let bytes = rewriter.rewrite(
            request.archive(),
            kind,
            overrides,
            options.inject_default_descriptor,
        )?;
        let staged = stage_archive(&bytes, &name, options.staging_dir.as_deref())?;
        let archive_path = staged.to_path_buf();
        self.staged = Some(staged);

        let previous = crate::context::current();
        let scope = ExecutionContext::for_archive(&archive_path, previous);
        self.saved_context = Some(SavedContext::swap_in(scope));

        match self.gateway.create(&archive_path, &name) {
            Ok(handle) => {
                self.handle = Some(handle);
                for collection in self.gateway.inventory() {
                    debug!(collection = %collection.name, size = collection.size, "runtime inventory");
                }
                self.current = Some(DeploymentInfo {
                    id,
                    name,
                    kind,
                    archive_path,
                    deployed_at: Utc::now(),
                });
                Ok(())
            }
            Err(e) => {
                if options.rollback_context_on_failure {
                    if let Some(saved) = self.saved_context.take() {
                        saved.restore();
                    }
                }
                Err(e.into())
            }
        }
    }
}

impl<G> Drop for SessionInner<G> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            close_handle(handle);
        }
    }
}

fn close_handle(handle: Box<dyn RuntimeHandle>) {
    if let Err(e) = handle.close() {
        warn!(error = %e, "failed to close runtime handle");
    }
}
