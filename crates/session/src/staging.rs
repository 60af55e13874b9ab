//! Staging of rewritten archives on disk
//!
//! The runtime loads modules by path, so every deployment persists its
//! rewritten archive to a fresh temporary file. The file is removed when its
//! [`TempPath`] is dropped, which happens when the next deployment replaces
//! it or the session goes away.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use tempfile::{Builder, TempPath};
use tracing::debug;

/// Prefix of every staged archive file name
const STAGED_PREFIX: &str = "deploy";

/// Persist `bytes` to a new temporary file named after `name`
///
/// Write failures are returned; the final flush to disk is best-effort.
pub(crate) fn stage_archive(bytes: &[u8], name: &str, dir: Option<&Path>) -> io::Result<TempPath> {
    let suffix = format!("-{}", file_name_safe(name));
    let mut builder = Builder::new();
    builder.prefix(STAGED_PREFIX).suffix(&suffix);

    let mut file = match dir {
        Some(dir) => builder.tempfile_in(dir)?,
        None => builder.tempfile()?,
    };
    file.write_all(bytes)?;
    sync_quietly(file.as_file());

    let path = file.into_temp_path();
    debug!(path = %path.display(), bytes = bytes.len(), "staged archive");
    Ok(path)
}

/// Flush file contents to disk, logging instead of failing
pub(crate) fn sync_quietly(file: &File) {
    if let Err(e) = file.sync_all() {
        debug!(error = %e, "best-effort sync failed");
    }
}

fn file_name_safe(name: &str) -> String {
    name.chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect()
}
