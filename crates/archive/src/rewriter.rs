//! Archive rewriter
//!
//! Produces the deployable archive from a packaged test archive.
//!
//! ## Rewrite Sequence
//!
//! ```text
//! 1. for each input entry, in file order:
//!      links, devices, fifos: fail the rewrite
//!      effective = kind.effective_path(entry.path)
//!      directory: copy once per effective path, later copies are skipped
//!      file, IF override exists for effective: take it (consumed), write its content
//!      file, ELSE: copy the entry bytes unchanged
//! 2. append every override that matched nothing
//! 3. IF inject_default_descriptor AND no META-INF/beans.xml written yet:
//!      write the minimal descriptor
//! 4. finish the archive and return the bytes
//! ```
//!
//! Any failure aborts the rewrite; no partial archive is ever returned.

use crate::error::{ArchiveError, ArchiveResult};
use crate::reader::entry_path;
use crate::writer::ArchiveWriter;
use deployer_core::{paths, ArchiveKind, ContentSource, ResourceOverrideMap};
use std::collections::HashSet;
use std::io::Read;
use tar::Archive;
use tracing::{debug, info};

/// Counters describing what a rewrite did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteStats {
    /// Input entries (files and directories) copied unchanged
    pub copied: usize,
    /// Input entries whose content came from an override
    pub replaced: usize,
    /// Overrides added as new entries
    pub appended: usize,
    /// Input entries dropped: archive-wide metadata headers, entries with
    /// an empty effective path, and directories already written
    pub skipped: usize,
    /// Whether the default component descriptor was synthesized
    pub synthesized_descriptor: bool,
}

impl RewriteStats {
    /// Total number of entries in the produced archive
    pub fn total_written(&self) -> usize {
        self.copied + self.replaced + self.appended + usize::from(self.synthesized_descriptor)
    }
}

/// Stateless archive rewriter
///
/// Safe to reuse across calls; every rewrite owns its override map and
/// output buffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveRewriter;

impl ArchiveRewriter {
    /// Create a rewriter
    pub fn new() -> Self {
        ArchiveRewriter
    }

    /// Rewrite `input` and return the new archive bytes
    pub fn rewrite<R: Read>(
        &self,
        input: R,
        kind: ArchiveKind,
        overrides: ResourceOverrideMap,
        inject_default_descriptor: bool,
    ) -> ArchiveResult<Vec<u8>> {
        self.rewrite_with_stats(input, kind, overrides, inject_default_descriptor)
            .map(|(bytes, _)| bytes)
    }

    /// Rewrite `input`, also reporting what was done
    pub fn rewrite_with_stats<R: Read>(
        &self,
        input: R,
        kind: ArchiveKind,
        mut overrides: ResourceOverrideMap,
        inject_default_descriptor: bool,
    ) -> ArchiveResult<(Vec<u8>, RewriteStats)> {
        let mut archive = Archive::new(input);
        let mut writer = ArchiveWriter::new();
        let mut written: HashSet<String> = HashSet::new();
        let mut directories: HashSet<String> = HashSet::new();
        let mut stats = RewriteStats::default();

        for entry in archive.entries().map_err(ArchiveError::Read)? {
            let mut entry = entry.map_err(ArchiveError::Read)?;
            let original = entry_path(&entry)?;

            let entry_type = entry.header().entry_type();
            if entry_type.is_pax_global_extensions() {
                debug!(path = %original, "skipping archive-wide metadata header");
                stats.skipped += 1;
                continue;
            }
            if !entry_type.is_file() && !entry_type.is_dir() {
                return Err(ArchiveError::UnsupportedEntry {
                    path: original,
                    kind: format!("{:?}", entry_type),
                });
            }

            let effective = kind.effective_path(&original).to_string();
            if effective.is_empty() {
                debug!(path = %original, "dropping entry with empty effective path");
                stats.skipped += 1;
                continue;
            }

            // Remapped directories routinely coincide with existing ones
            // (`WEB-INF/classes/META-INF/` and `META-INF/`); one copy is enough.
            if entry_type.is_dir() {
                if !directories.insert(effective.trim_end_matches('/').to_string()) {
                    debug!(path = %original, "directory already written");
                    stats.skipped += 1;
                    continue;
                }
                let header = entry.header().clone();
                writer.append_copy(&header, &effective, &mut entry)?;
                stats.copied += 1;
                continue;
            }

            if !written.insert(effective.clone()) {
                return Err(ArchiveError::DuplicateEntry(effective));
            }

            match overrides.take(&effective) {
                Some(source) => {
                    let data = read_source(&effective, source.as_ref())?;
                    debug!(path = %effective, source = %source.describe(), "replacing entry");
                    writer.append_bytes(&effective, &data)?;
                    stats.replaced += 1;
                }
                None => {
                    let header = entry.header().clone();
                    writer.append_copy(&header, &effective, &mut entry)?;
                    stats.copied += 1;
                }
            }
        }

        for (path, source) in overrides.drain() {
            if !written.insert(path.clone()) {
                return Err(ArchiveError::DuplicateEntry(path));
            }
            let data = read_source(&path, source.as_ref())?;
            debug!(path = %path, source = %source.describe(), "adding entry");
            writer.append_bytes(&path, &data)?;
            stats.appended += 1;
        }

        if inject_default_descriptor && !written.contains(paths::COMPONENT_DESCRIPTOR) {
            debug!(path = paths::COMPONENT_DESCRIPTOR, "synthesizing default descriptor");
            writer.append_bytes(paths::COMPONENT_DESCRIPTOR, paths::DEFAULT_DESCRIPTOR_CONTENT)?;
            stats.synthesized_descriptor = true;
        }

        let bytes = writer.finish()?;

        info!(
            %kind,
            copied = stats.copied,
            replaced = stats.replaced,
            appended = stats.appended,
            skipped = stats.skipped,
            synthesized = stats.synthesized_descriptor,
            bytes = bytes.len(),
            "archive rewritten"
        );

        Ok((bytes, stats))
    }
}

fn read_source(path: &str, source: &dyn ContentSource) -> ArchiveResult<Vec<u8>> {
    let resource_error = |e| ArchiveError::Resource {
        path: path.to_string(),
        location: source.describe(),
        source: e,
    };

    let mut reader = source.open().map_err(resource_error)?;
    let mut data = Vec::new();
    reader.read_to_end(&mut data).map_err(resource_error)?;
    Ok(data)
}
