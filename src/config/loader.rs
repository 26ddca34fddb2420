//! Configuration file discovery and loading.
//!
//! The repository root is the nearest ancestor directory containing
//! `monodeps.yml`.

use crate::config::schema::RepoConfig;
use crate::error::{MonodepsError, Result};
use crate::project::default_temp_project_name;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the repository configuration file.
pub const CONFIG_FILE: &str = "monodeps.yml";

/// Find the repository root by walking up from `start`.
///
/// # Returns
///
/// The first directory containing [`CONFIG_FILE`], or None if not found.
pub fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        if current.join(CONFIG_FILE).is_file() {
            return Some(current);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load a config file and parse it into [`RepoConfig`].
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<RepoConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            MonodepsError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            MonodepsError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content into [`RepoConfig`].
///
/// # Arguments
///
/// * `content` - The YAML content to parse
/// * `source_path` - Path for error reporting
pub fn parse_config(content: &str, source_path: &Path) -> Result<RepoConfig> {
    serde_yaml::from_str(content).map_err(|e| MonodepsError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load and validate the configuration of the repository at `repo_root`.
pub fn load_repo_config(repo_root: &Path) -> Result<RepoConfig> {
    let config = load_config_file(&repo_root.join(CONFIG_FILE))?;
    validate(&config)?;
    Ok(config)
}

/// Check invariants serde cannot express.
pub fn validate(config: &RepoConfig) -> Result<()> {
    if config.installer.max_attempts == 0 {
        return Err(invalid("installer.max_attempts must be at least 1"));
    }
    if config.installer.tool.trim().is_empty() {
        return Err(invalid("installer.tool must not be empty"));
    }
    if !config.temp_scope.starts_with('@') || config.temp_scope.contains('/') {
        return Err(invalid(format!(
            "temp_scope must look like '@scope', got '{}'",
            config.temp_scope
        )));
    }
    if config.lock_file.trim().is_empty() {
        return Err(invalid("lock_file must not be empty"));
    }

    let mut seen = HashSet::new();
    for project in &config.projects {
        if project.package_name.trim().is_empty() {
            return Err(invalid(format!(
                "project at {} has an empty package_name",
                project.project_folder.display()
            )));
        }
        if !seen.insert(project.package_name.as_str()) {
            return Err(invalid(format!(
                "project '{}' is declared more than once",
                project.package_name
            )));
        }

        let temp_name = match &project.temp_project_name {
            Some(name) => name.clone(),
            None => default_temp_project_name(&project.package_name, &config.temp_scope),
        };
        if !is_scoped_temp_name(&temp_name, &config.temp_scope) {
            return Err(invalid(format!(
                "temp project name '{}' of '{}' must be '{}/<name>' with a plain folder name",
                temp_name, project.package_name, config.temp_scope
            )));
        }
    }

    Ok(())
}

/// `<temp_scope>/<folder>` with a plain folder name.
fn is_scoped_temp_name(temp_name: &str, temp_scope: &str) -> bool {
    let Some(folder) = temp_name
        .strip_prefix(temp_scope)
        .and_then(|rest| rest.strip_prefix('/'))
    else {
        return false;
    };
    !folder.is_empty()
        && folder != "."
        && folder != ".."
        && !folder.contains(['/', '\\'])
}

fn invalid(message: impl Into<String>) -> MonodepsError {
    MonodepsError::ConfigError {
        message: message.into(),
    }
}
