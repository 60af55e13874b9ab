//! Archive and deployment types
//!
//! - [`ArchiveEntry`]: one named payload inside an archive
//! - [`ArchiveKind`]: class-path vs web archive, derived from the logical name
//! - [`DeploymentId`]: unique identifier for one deploy attempt
//! - [`DeploymentRequest`]: the input to a single deploy call

use std::fmt;
use std::io::Read;
use uuid::Uuid;

/// Fixed archive paths and name suffixes
pub mod paths {
    /// Directory holding compiled classes inside a web archive
    pub const WEB_CLASSES_PREFIX: &str = "WEB-INF/classes/";
    /// Component descriptor that may be synthesized when absent
    pub const COMPONENT_DESCRIPTOR: &str = "META-INF/beans.xml";
    /// Minimal content written for a synthesized component descriptor
    pub const DEFAULT_DESCRIPTOR_CONTENT: &[u8] = b"<beans />";
    /// Enterprise bean deployment descriptor
    pub const EJB_JAR_DESCRIPTOR: &str = "META-INF/ejb-jar.xml";
    /// Persistence unit descriptor
    pub const PERSISTENCE_DESCRIPTOR: &str = "META-INF/persistence.xml";
    /// Bean validation descriptor
    pub const VALIDATION_DESCRIPTOR: &str = "META-INF/validation.xml";
    /// Logical-name suffix marking a web archive
    pub const WEB_ARCHIVE_SUFFIX: &str = ".war";
    /// Logical-name suffix marking a class-path archive
    pub const JAR_ARCHIVE_SUFFIX: &str = ".jar";
}

/// One entry of an archive: a `/`-separated path and its bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Path inside the archive
    pub path: String,
    /// Entry payload
    pub data: Vec<u8>,
}

impl ArchiveEntry {
    /// Create an entry
    pub fn new(path: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        ArchiveEntry {
            path: path.into(),
            data: data.into(),
        }
    }
}

/// Classification of an archive, driving its path-remapping rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveKind {
    /// Flat class-path archive; paths are kept as-is
    ClassPath,
    /// Web archive; compiled classes are lifted to the archive root
    Web,
}

impl ArchiveKind {
    /// Derive the kind from a logical deployment name
    ///
    /// Only the suffix is inspected, never the archive content.
    pub fn from_name(name: &str) -> Self {
        if name.ends_with(paths::WEB_ARCHIVE_SUFFIX) {
            ArchiveKind::Web
        } else {
            ArchiveKind::ClassPath
        }
    }

    /// Map an input entry path to its path in the rewritten archive
    ///
    /// For web archives a leading [`paths::WEB_CLASSES_PREFIX`] is stripped;
    /// class-path archives keep every path unchanged.
    pub fn effective_path<'a>(&self, path: &'a str) -> &'a str {
        match self {
            ArchiveKind::Web => path
                .strip_prefix(paths::WEB_CLASSES_PREFIX)
                .unwrap_or(path),
            ArchiveKind::ClassPath => path,
        }
    }
}

impl fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchiveKind::ClassPath => write!(f, "class-path"),
            ArchiveKind::Web => write!(f, "web"),
        }
    }
}

/// Unique identifier for a single deploy attempt
///
/// Attached to every log line a deployment emits so that overlapping
/// harness output can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeploymentId(Uuid);

impl DeploymentId {
    /// Create a new random DeploymentId using UUID v4
    pub fn new() -> Self {
        DeploymentId(Uuid::new_v4())
    }
}

impl Default for DeploymentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DeploymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Input to one deploy call
///
/// Holds the packaged archive stream and the logical name it is deployed
/// under. The archive kind is derived from the name when the request is
/// built and never changes afterwards.
pub struct DeploymentRequest<'a> {
    archive: &'a mut dyn Read,
    name: String,
    kind: ArchiveKind,
}

impl<'a> DeploymentRequest<'a> {
    /// Build a request, deriving the archive kind from `name`
    pub fn new(archive: &'a mut dyn Read, name: impl Into<String>) -> Self {
        let name = name.into();
        let kind = ArchiveKind::from_name(&name);
        DeploymentRequest {
            archive,
            name,
            kind,
        }
    }

    /// Logical deployment name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Archive kind derived from the name
    pub fn kind(&self) -> ArchiveKind {
        self.kind
    }

    /// The archive stream to rewrite
    pub fn archive(&mut self) -> &mut dyn Read {
        &mut *self.archive
    }
}

impl fmt::Debug for DeploymentRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeploymentRequest")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
