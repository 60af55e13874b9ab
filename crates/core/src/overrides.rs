//! Resource overrides applied while rewriting an archive
//!
//! A [`ResourceOverrideMap`] maps a target archive path to a
//! [`ContentSource`]. During a rewrite every input entry whose path matches a
//! key takes its content from the source instead, and the key is consumed.
//! Whatever is left once the input is exhausted is appended as new entries.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::PathBuf;
use tracing::debug;

/// A readable origin for override content
///
/// Opening is deferred until the rewriter actually needs the bytes, so a
/// source that cannot be opened fails the rewrite at that point.
pub trait ContentSource: Send + Sync {
    /// Open a fresh reader over the content
    fn open(&self) -> io::Result<Box<dyn Read + '_>>;

    /// Human-readable location, used in logs and errors
    fn describe(&self) -> String;
}

/// Content read from a file on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Create a source for `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSource { path: path.into() }
    }
}

impl ContentSource for FileSource {
    fn open(&self) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(File::open(&self.path)?))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Content held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BytesSource {
    data: Vec<u8>,
}

impl BytesSource {
    /// Create a source over `data`
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        BytesSource { data: data.into() }
    }
}

impl ContentSource for BytesSource {
    fn open(&self) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(Cursor::new(self.data.as_slice())))
    }

    fn describe(&self) -> String {
        format!("<{} bytes in memory>", self.data.len())
    }
}

/// Mapping from target archive path to override content
///
/// Keys are exact, case-sensitive archive paths. Iteration order of the
/// leftovers is ascending by path so that rewrites are deterministic.
#[derive(Default)]
pub struct ResourceOverrideMap {
    entries: BTreeMap<String, Box<dyn ContentSource>>,
}

impl ResourceOverrideMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `source` as the content for `path`
    ///
    /// A later registration for the same path replaces the earlier one.
    pub fn insert(&mut self, path: impl Into<String>, source: impl ContentSource + 'static) {
        let path = path.into();
        if let Some(previous) = self.entries.insert(path.clone(), Box::new(source)) {
            debug!(path = %path, previous = %previous.describe(), "override replaced");
        }
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, path: impl Into<String>, source: impl ContentSource + 'static) -> Self {
        self.insert(path, source);
        self
    }

    /// Remove and return the override for `path`, if any
    pub fn take(&mut self, path: &str) -> Option<Box<dyn ContentSource>> {
        self.entries.remove(path)
    }

    /// Check whether an override targets `path`
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Number of overrides not yet consumed
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when every override has been consumed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the map, yielding the remaining overrides in ascending path order
    pub fn drain(self) -> impl Iterator<Item = (String, Box<dyn ContentSource>)> {
        self.entries.into_iter()
    }
}

impl fmt::Debug for ResourceOverrideMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| (k, v.describe())))
            .finish()
    }
}
