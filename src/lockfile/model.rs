//! Lock file model.
//!
//! The lock file is produced by the installer's `shrinkwrap` subcommand and
//! is only ever read here.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{MonodepsError, Result};

/// Root of a lock file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockFile {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub dependencies: BTreeMap<String, LockEntry>,
}

/// A resolved dependency, possibly with nested dependencies of its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockEntry {
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies: BTreeMap<String, LockEntry>,
}

impl LockEntry {
    /// Entry resolved at `version` without nested dependencies.
    pub fn at(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..Default::default()
        }
    }
}

impl LockFile {
    /// Load a lock file; `Ok(None)` when it does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| MonodepsError::ManifestParse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }

    /// Root-level entry for `dependency`.
    pub fn root_entry(&self, dependency: &str) -> Option<&LockEntry> {
        self.dependencies.get(dependency)
    }

    /// Entry for `dependency` as seen by `consumer`.
    ///
    /// A copy nested under the consumer's own entry shadows the root-level one.
    pub fn resolve(&self, consumer: &str, dependency: &str) -> Option<&LockEntry> {
        self.dependencies
            .get(consumer)
            .and_then(|c| c.dependencies.get(dependency))
            .or_else(|| self.root_entry(dependency))
    }
}
