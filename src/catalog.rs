//! Declarative descriptor catalog.
//!
//! A [`DescriptorCatalog`] lists, per test artifact, which deployment
//! descriptors and extra resources must be placed into its archive. It is the
//! stock [`OverrideResolver`]: given a logical name it produces the override
//! map the rewriter applies.
//!
//! ## Catalog Format
//!
//! ```json
//! {
//!   "resource_root": "resources",
//!   "artifacts": {
//!     "org.example.tck.BeanTest": {
//!       "ejb_jar": "ejb-jar.xml",
//!       "persistence": "persistence.xml",
//!       "validation": "validation.xml",
//!       "resources": [
//!         { "source": "beans.xml", "destination": "WEB-INF/classes/META-INF/beans.xml" }
//!       ]
//!     }
//!   }
//! }
//! ```
//!
//! Resource files are looked up under `resource_root/<package as path>/`,
//! where the package is the artifact key minus its last segment unless an
//! explicit `package` is given.
//!
//! | Field | Archive path | When the file is missing |
//! |-------|--------------|--------------------------|
//! | `ejb_jar` | `META-INF/ejb-jar.xml` | skipped |
//! | `persistence` | `META-INF/persistence.xml` | skipped |
//! | `validation` | `META-INF/validation.xml` | resolution fails |
//! | `resources[].destination` | destination minus first `WEB-INF/classes/` | skipped |

use crate::error::{Error, Result};
use deployer_core::paths::{
    EJB_JAR_DESCRIPTOR, JAR_ARCHIVE_SUFFIX, PERSISTENCE_DESCRIPTOR, VALIDATION_DESCRIPTOR,
    WEB_ARCHIVE_SUFFIX, WEB_CLASSES_PREFIX,
};
use deployer_core::{DeployError, FileSource, OverrideResolver, ResourceOverrideMap};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One extra resource copied into an archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceMapping {
    /// File name relative to the artifact's resource directory
    pub source: String,
    /// Target path inside the archive
    pub destination: String,
}

impl ResourceMapping {
    /// Create a mapping
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        ResourceMapping {
            source: source.into(),
            destination: destination.into(),
        }
    }
}

/// Descriptors declared for one artifact
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactDescriptors {
    /// Dotted package holding the artifact's resources
    pub package: Option<String>,
    /// Enterprise bean descriptor file
    pub ejb_jar: Option<String>,
    /// Persistence descriptor file
    pub persistence: Option<String>,
    /// Bean validation descriptor file (mandatory once declared)
    pub validation: Option<String>,
    /// Extra resources
    pub resources: Vec<ResourceMapping>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    resource_root: Option<PathBuf>,
    #[serde(default)]
    artifacts: BTreeMap<String, ArtifactDescriptors>,
}

/// Resolver backed by a per-artifact descriptor listing
#[derive(Debug, Clone)]
pub struct DescriptorCatalog {
    resource_root: PathBuf,
    artifacts: BTreeMap<String, ArtifactDescriptors>,
}

impl DescriptorCatalog {
    /// Create an empty catalog resolving resources under `resource_root`
    pub fn new(resource_root: impl Into<PathBuf>) -> Self {
        DescriptorCatalog {
            resource_root: resource_root.into(),
            artifacts: BTreeMap::new(),
        }
    }

    /// Add descriptors for the artifact named `key`
    pub fn with_artifact(mut self, key: impl Into<String>, descriptors: ArtifactDescriptors) -> Self {
        self.artifacts.insert(key.into(), descriptors);
        self
    }

    /// Parse a catalog from JSON
    ///
    /// A relative `resource_root` in the document is taken relative to `base`;
    /// without one, `base` itself is the root.
    pub fn from_json(json: &str, base: impl AsRef<Path>) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        let base = base.as_ref();
        let resource_root = match file.resource_root {
            Some(root) if root.is_absolute() => root,
            Some(root) => base.join(root),
            None => base.to_path_buf(),
        };
        for (key, descriptors) in &file.artifacts {
            if package_of(key, descriptors).is_empty() {
                return Err(Error::Catalog(format!(
                    "artifact {} has no package; give a qualified key or an explicit package",
                    key
                )));
            }
        }
        Ok(DescriptorCatalog {
            resource_root,
            artifacts: file.artifacts,
        })
    }

    /// Load a catalog file; relative roots resolve against its directory
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_json(&json, base)
    }

    /// Root directory for resource lookup
    pub fn resource_root(&self) -> &Path {
        &self.resource_root
    }

    /// Descriptors declared for the artifact behind a logical name
    pub fn descriptors(&self, name: &str) -> Option<&ArtifactDescriptors> {
        self.artifacts.get(artifact_key(name))
    }

    fn locate(&self, package: &str, file: &str) -> Option<PathBuf> {
        let mut path = self.resource_root.clone();
        for segment in package.split('.').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path.push(file);
        path.is_file().then_some(path)
    }
}

impl OverrideResolver for DescriptorCatalog {
    fn resolve(&self, name: &str) -> deployer_core::Result<ResourceOverrideMap> {
        let mut overrides = ResourceOverrideMap::new();
        let key = artifact_key(name);
        let Some(descriptors) = self.artifacts.get(key) else {
            debug!(artifact = key, "no descriptors declared");
            return Ok(overrides);
        };
        let package = package_of(key, descriptors);

        if let Some(file) = &descriptors.ejb_jar {
            if let Some(path) = self.locate(package, file) {
                overrides.insert(EJB_JAR_DESCRIPTOR, FileSource::new(path));
            }
        }

        if let Some(file) = &descriptors.persistence {
            if let Some(path) = self.locate(package, file) {
                overrides.insert(PERSISTENCE_DESCRIPTOR, FileSource::new(path));
            }
        }

        if let Some(file) = &descriptors.validation {
            let file = strip_jar_location(file);
            match self.locate(package, file) {
                Some(path) => overrides.insert(VALIDATION_DESCRIPTOR, FileSource::new(path)),
                None => {
                    return Err(DeployError::resource(
                        VALIDATION_DESCRIPTOR,
                        format!("can't find validation descriptor file {}", file),
                    ))
                }
            }
        }

        for resource in &descriptors.resources {
            if let Some(path) = self.locate(package, &resource.source) {
                let destination = resource.destination.replacen(WEB_CLASSES_PREFIX, "", 1);
                overrides.insert(destination, FileSource::new(path));
            } else {
                debug!(source = %resource.source, "resource not found, skipped");
            }
        }

        debug!(artifact = key, count = overrides.len(), "resolved descriptors");
        Ok(overrides)
    }
}

/// Artifact key for a logical name: the name without its archive suffix
fn artifact_key(name: &str) -> &str {
    name.strip_suffix(JAR_ARCHIVE_SUFFIX)
        .or_else(|| name.strip_suffix(WEB_ARCHIVE_SUFFIX))
        .unwrap_or(name)
}

fn package_of<'a>(key: &'a str, descriptors: &'a ArtifactDescriptors) -> &'a str {
    match &descriptors.package {
        Some(package) => package,
        None => key.rsplit_once('.').map(|(package, _)| package).unwrap_or(""),
    }
}

/// `lib/foo.jar!/META-INF/validation.xml` names a file inside a jar;
/// only the in-jar part is looked up
fn strip_jar_location(file: &str) -> &str {
    if !file.contains(JAR_ARCHIVE_SUFFIX) {
        return file;
    }
    match file.find("!/") {
        Some(idx) => &file[idx + 2..],
        None => file,
    }
}
