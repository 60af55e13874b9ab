//! Archive rewriting for deployable test artifacts
//!
//! This crate turns a packaged test archive into the archive that is handed
//! to the runtime: entries are streamed one at a time from the input, remapped
//! according to the [`ArchiveKind`](deployer_core::ArchiveKind), merged with a
//! [`ResourceOverrideMap`](deployer_core::ResourceOverrideMap), and written to
//! a fresh in-memory archive.
//!
//! ## Archive Format
//!
//! Archives are tar streams. Input is consumed through a sequential entry
//! cursor (no random access), so large archives are never materialized as a
//! whole on the input side.
//!
//! ## Usage
//!
//! ```ignore
//! let rewriter = ArchiveRewriter::new();
//! let bytes = rewriter.rewrite(input, ArchiveKind::Web, overrides, false)?;
//! let entries = ArchiveReader::read_entries(bytes.as_slice())?;
//! ```
//!
//! ## Merge Rules
//!
//! - **Remap**: web archives lift `WEB-INF/classes/` to the root
//! - **Replace**: an override matching an entry's effective path wins
//! - **Append**: overrides that matched nothing are added after the input
//! - **Synthesize**: optionally add a default component descriptor when none exists

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod reader;
mod rewriter;
mod writer;

pub use error::{ArchiveError, ArchiveResult};
pub use reader::ArchiveReader;
pub use rewriter::{ArchiveRewriter, RewriteStats};
pub use writer::{write_entries, ArchiveWriter};
