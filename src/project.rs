//! Monorepo projects.
//!
//! A [`Project`] combines a configured project entry with the dependencies
//! declared in its `package.json`.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{ProjectConfig, RepoConfig};
use crate::error::{MonodepsError, Result};
use crate::manifest::MANIFEST_FILE;

/// A project participating in the shared install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Package name from `package.json`.
    pub package_name: String,

    /// Package version from `package.json`.
    pub version: String,

    /// Project folder relative to the repo root.
    pub project_folder: PathBuf,

    /// Declared dependency ranges, all sections merged.
    pub declared_dependencies: BTreeMap<String, String>,

    /// Name of the synthesized temp module.
    pub temp_project_name: String,
}

impl Project {
    /// Build a project directly, deriving the temp project name from `temp_scope`.
    pub fn new(
        package_name: impl Into<String>,
        declared_dependencies: BTreeMap<String, String>,
        temp_scope: &str,
    ) -> Self {
        let package_name = package_name.into();
        let temp_project_name = default_temp_project_name(&package_name, temp_scope);
        Self {
            project_folder: PathBuf::from(unscoped(&package_name)),
            package_name,
            version: "0.0.0".to_string(),
            declared_dependencies,
            temp_project_name,
        }
    }
}

/// The subset of `package.json` read from each project.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageJson {
    name: String,

    #[serde(default)]
    version: Option<String>,

    #[serde(default)]
    dependencies: BTreeMap<String, String>,

    #[serde(default)]
    optional_dependencies: BTreeMap<String, String>,

    #[serde(default)]
    dev_dependencies: BTreeMap<String, String>,
}

/// `@scope/name` becomes `name`.
fn unscoped(package_name: &str) -> &str {
    package_name
        .strip_prefix('@')
        .and_then(|rest| rest.split_once('/'))
        .map(|(_, name)| name)
        .unwrap_or(package_name)
}

/// `<temp_scope>/<unscoped package name>`.
pub fn default_temp_project_name(package_name: &str, temp_scope: &str) -> String {
    format!("{}/{}", temp_scope, unscoped(package_name))
}

/// Load every configured project, in configuration order.
pub fn load_projects(repo_root: &Path, config: &RepoConfig) -> Result<Vec<Project>> {
    config
        .projects
        .iter()
        .map(|entry| load_project(repo_root, entry, &config.temp_scope))
        .collect()
}

fn load_project(repo_root: &Path, entry: &ProjectConfig, temp_scope: &str) -> Result<Project> {
    let path = repo_root.join(&entry.project_folder).join(MANIFEST_FILE);
    let content = fs::read_to_string(&path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            MonodepsError::ConfigError {
                message: format!(
                    "project '{}' has no {} at {}",
                    entry.package_name,
                    MANIFEST_FILE,
                    path.display()
                ),
            }
        } else {
            MonodepsError::Io(e)
        }
    })?;
    let package: PackageJson =
        serde_json::from_str(&content).map_err(|e| MonodepsError::ConfigParseError {
            path: path.clone(),
            message: e.to_string(),
        })?;

    if package.name != entry.package_name {
        return Err(MonodepsError::ConfigError {
            message: format!(
                "{} declares name '{}' but monodeps.yml expects '{}'",
                path.display(),
                package.name,
                entry.package_name
            ),
        });
    }

    // First section to declare a dependency wins.
    let mut declared = package.dependencies;
    for (name, range) in package
        .optional_dependencies
        .into_iter()
        .chain(package.dev_dependencies)
    {
        declared.entry(name).or_insert(range);
    }

    let temp_project_name = entry
        .temp_project_name
        .clone()
        .unwrap_or_else(|| default_temp_project_name(&entry.package_name, temp_scope));

    Ok(Project {
        package_name: package.name,
        version: package.version.unwrap_or_else(|| "0.0.0".to_string()),
        project_folder: entry.project_folder.clone(),
        declared_dependencies: declared,
        temp_project_name,
    })
}
