//! Archive reader
//!
//! Sequential access to tar archives: every function walks the entries in
//! file order and never seeks.

use crate::error::{ArchiveError, ArchiveResult};
use deployer_core::ArchiveEntry;
use std::io::Read;
use tar::Archive;

/// Reader for deployable archives
pub struct ArchiveReader;

impl ArchiveReader {
    /// Read every file and directory entry, in archive order
    ///
    /// Directory entries carry an empty payload. Other entry kinds (links,
    /// devices) are not part of a deployable archive and are left out.
    pub fn read_entries<R: Read>(input: R) -> ArchiveResult<Vec<ArchiveEntry>> {
        let mut archive = Archive::new(input);
        let mut entries = Vec::new();

        for entry in archive.entries().map_err(ArchiveError::Read)? {
            let mut entry = entry.map_err(ArchiveError::Read)?;
            let entry_type = entry.header().entry_type();
            if !entry_type.is_file() && !entry_type.is_dir() {
                continue;
            }
            let path = entry_path(&entry)?;
            let mut data = Vec::new();
            entry.read_to_end(&mut data).map_err(ArchiveError::Read)?;
            entries.push(ArchiveEntry { path, data });
        }

        Ok(entries)
    }

    /// Extract a single file's contents
    ///
    /// Returns `Ok(None)` when no entry has exactly this path.
    pub fn read_file<R: Read>(input: R, file_name: &str) -> ArchiveResult<Option<Vec<u8>>> {
        let mut archive = Archive::new(input);

        for entry in archive.entries().map_err(ArchiveError::Read)? {
            let mut entry = entry.map_err(ArchiveError::Read)?;
            if !entry.header().entry_type().is_file() {
                continue;
            }
            if entry_path(&entry)? == file_name {
                let mut data = Vec::new();
                entry.read_to_end(&mut data).map_err(ArchiveError::Read)?;
                return Ok(Some(data));
            }
        }

        Ok(None)
    }
}

pub(crate) fn entry_path<R: Read>(entry: &tar::Entry<'_, R>) -> ArchiveResult<String> {
    Ok(entry
        .path()
        .map_err(ArchiveError::Read)?
        .to_string_lossy()
        .into_owned())
}
