//! Thread-scoped execution context
//!
//! While a deployment is live, code running on the deploying thread resolves
//! resources through an [`ExecutionContext`] rooted at the staged archive.
//! Contexts chain to a parent: a name not found in the archive is looked up
//! in the context that was current before the deployment.
//!
//! The current context is a thread-local. Deploy and undeploy must run on the
//! same thread for the restore to reach the context that was swapped.

use deployer_archive::ArchiveReader;
use deployer_core::Result;
use std::cell::RefCell;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

thread_local! {
    static CURRENT: RefCell<Option<Arc<ExecutionContext>>> = const { RefCell::new(None) };
}

/// A resource resolution scope
pub struct ExecutionContext {
    label: String,
    archive: Option<PathBuf>,
    parent: Option<Arc<ExecutionContext>>,
}

impl ExecutionContext {
    /// A context that resolves nothing by itself
    pub fn root(label: impl Into<String>) -> Arc<Self> {
        Arc::new(ExecutionContext {
            label: label.into(),
            archive: None,
            parent: None,
        })
    }

    /// A context scoped to the archive at `path`, falling back to `parent`
    pub fn for_archive(path: impl Into<PathBuf>, parent: Option<Arc<ExecutionContext>>) -> Arc<Self> {
        let path = path.into();
        Arc::new(ExecutionContext {
            label: path.display().to_string(),
            archive: Some(path),
            parent,
        })
    }

    /// Human-readable label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Archive this context is rooted at, if any
    pub fn archive(&self) -> Option<&Path> {
        self.archive.as_deref()
    }

    /// Parent context
    pub fn parent(&self) -> Option<&Arc<ExecutionContext>> {
        self.parent.as_ref()
    }

    /// Resolve a resource by archive path
    ///
    /// The own archive is searched first, then the parent chain.
    pub fn resolve(&self, name: &str) -> Result<Option<Vec<u8>>> {
        if let Some(path) = &self.archive {
            let file = File::open(path)?;
            if let Some(data) = ArchiveReader::read_file(BufReader::new(file), name)? {
                return Ok(Some(data));
            }
        }
        match &self.parent {
            Some(parent) => parent.resolve(name),
            None => Ok(None),
        }
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("label", &self.label)
            .field("parent", &self.parent.as_ref().map(|p| p.label()))
            .finish()
    }
}

/// Context currently installed on this thread
pub fn current() -> Option<Arc<ExecutionContext>> {
    CURRENT.with(|c| c.borrow().clone())
}

/// Install `context` on this thread, returning the one it replaces
pub fn replace(context: Option<Arc<ExecutionContext>>) -> Option<Arc<ExecutionContext>> {
    CURRENT.with(|c| std::mem::replace(&mut *c.borrow_mut(), context))
}

/// A context saved before a swap
#[derive(Debug)]
pub(crate) struct SavedContext {
    previous: Option<Arc<ExecutionContext>>,
}

impl SavedContext {
    /// Install `context`, remembering what was current
    pub(crate) fn swap_in(context: Arc<ExecutionContext>) -> Self {
        SavedContext {
            previous: replace(Some(context)),
        }
    }

    /// Put the saved context back
    pub(crate) fn restore(self) {
        replace(self.previous);
    }
}

/// Restores a saved context when dropped, on every exit path
pub(crate) struct RestoreOnDrop(Option<SavedContext>);

impl RestoreOnDrop {
    pub(crate) fn new(saved: Option<SavedContext>) -> Self {
        RestoreOnDrop(saved)
    }
}

impl Drop for RestoreOnDrop {
    fn drop(&mut self) {
        if let Some(saved) = self.0.take() {
            saved.restore();
        }
    }
}
