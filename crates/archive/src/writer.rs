//! Archive writer
//!
//! Thin layer over [`tar::Builder`] that writes into memory. New entries get
//! a normalized header (GNU format, mode 0644, mtime 0, uid/gid 0) so that
//! the same input always produces the same bytes; copied entries keep the
//! header they had in the input archive.

use crate::error::{ArchiveError, ArchiveResult};
use deployer_core::ArchiveEntry;
use std::io::Read;
use tar::{Builder, EntryType, Header};

/// Initial output buffer size
const OUTPUT_CAPACITY: usize = 512 * 1024;

/// In-memory archive writer
pub struct ArchiveWriter {
    builder: Builder<Vec<u8>>,
}

impl ArchiveWriter {
    /// Create an empty writer
    pub fn new() -> Self {
        ArchiveWriter {
            builder: Builder::new(Vec::with_capacity(OUTPUT_CAPACITY)),
        }
    }

    /// Append a regular file with a normalized header
    pub fn append_bytes(&mut self, path: &str, data: &[u8]) -> ArchiveResult<()> {
        let mut header = Header::new_gnu();
        header.set_entry_type(EntryType::Regular);
        header.set_mode(0o644);
        header.set_mtime(0);
        header.set_uid(0);
        header.set_gid(0);
        header.set_size(data.len() as u64);
        self.builder
            .append_data(&mut header, path, data)
            .map_err(|e| ArchiveError::write(path, e))
    }

    /// Append an entry copied from another archive under a (possibly new) path
    ///
    /// `header` is the input entry's header; its metadata is kept and only the
    /// path is rewritten. `data` must yield exactly `header.size()` bytes.
    pub fn append_copy<R: Read>(
        &mut self,
        header: &Header,
        path: &str,
        data: R,
    ) -> ArchiveResult<()> {
        let mut header = header.clone();
        self.builder
            .append_data(&mut header, path, data)
            .map_err(|e| ArchiveError::write(path, e))
    }

    /// Finish the archive and return its bytes
    pub fn finish(self) -> ArchiveResult<Vec<u8>> {
        self.builder
            .into_inner()
            .map_err(|e| ArchiveError::write("<end of archive>", e))
    }
}

impl Default for ArchiveWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Write `entries` as regular files, in order
pub fn write_entries(entries: &[ArchiveEntry]) -> ArchiveResult<Vec<u8>> {
    let mut writer = ArchiveWriter::new();
    for entry in entries {
        writer.append_bytes(&entry.path, &entry.data)?;
    }
    writer.finish()
}
