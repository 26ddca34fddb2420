//! Configuration schema definitions for monodeps.
//!
//! This module contains the struct definitions that map to the
//! `monodeps.yml` file at the repository root.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Root configuration structure for `monodeps.yml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoConfig {
    /// Common root holding the shared install, relative to the repo root.
    pub common_folder: PathBuf,

    /// Lock file name inside the common root.
    pub lock_file: String,

    /// Scope under which temp projects are named (`@scope/<name>`).
    pub temp_scope: String,

    /// External installer settings.
    pub installer: InstallerSettings,

    /// Versions forced at the common-root level.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub pinned_versions: BTreeMap<String, String>,

    /// Projects participating in the shared install, in declaration order.
    pub projects: Vec<ProjectConfig>,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            common_folder: default_common_folder(),
            lock_file: default_lock_file(),
            temp_scope: default_temp_scope(),
            installer: InstallerSettings::default(),
            pinned_versions: BTreeMap::new(),
            projects: Vec::new(),
        }
    }
}

/// How the external installer is located and invoked.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallerSettings {
    /// Installer executable name (also the package that provides it).
    pub tool: String,

    /// Pinned installer version.
    pub version: String,

    /// Install the pinned version locally instead of using the one on PATH.
    pub provision: bool,

    /// Maximum attempts per installer invocation.
    #[serde(
        default = "default_max_attempts",
        skip_serializing_if = "is_default_max_attempts"
    )]
    pub max_attempts: u32,

    /// Delay between attempts in milliseconds.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub retry_delay_ms: u64,

    /// Per-repo installer cache, relative to the repo root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_folder: Option<PathBuf>,

    /// Installer scratch directory, relative to the repo root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmp_folder: Option<PathBuf>,
}

impl Default for InstallerSettings {
    fn default() -> Self {
        Self {
            tool: default_tool(),
            version: default_tool_version(),
            provision: true,
            max_attempts: default_max_attempts(),
            retry_delay_ms: 0,
            cache_folder: None,
            tmp_folder: None,
        }
    }
}

/// A project entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Package name as declared in the project's `package.json`.
    pub package_name: String,

    /// Project folder relative to the repo root.
    pub project_folder: PathBuf,

    /// Override for the synthesized temp project name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_project_name: Option<String>,
}

fn default_common_folder() -> PathBuf {
    PathBuf::from("common").join("temp")
}

fn default_lock_file() -> String {
    "npm-shrinkwrap.json".to_string()
}

fn default_temp_scope() -> String {
    "@monodeps-temp".to_string()
}

fn default_tool() -> String {
    "npm".to_string()
}

fn default_tool_version() -> String {
    "4.5.0".to_string()
}

fn default_max_attempts() -> u32 {
    5
}

fn is_default_max_attempts(v: &u32) -> bool {
    *v == default_max_attempts()
}

fn is_zero(v: &u64) -> bool {
    *v == 0
}
