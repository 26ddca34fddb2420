//! High-level workflows behind the CLI commands.
//!
//! - [`generate`] - regenerate temp modules, reinstall, refresh the lock file
//! - [`install`] - verify temp modules and bring the installed tree up to date
//! - [`status`] - read-only report of the install state

pub mod generate;
pub mod install;
pub mod status;

pub use generate::{GenerateOptions, GenerateOrchestrator, GenerateReport};
pub use install::InstallOrchestrator;
pub use status::{ConsistencyStatus, StatusReport, StatusReporter};

use std::path::{Path, PathBuf};

use crate::config::{find_repo_root, load_repo_config, RepoConfig, RepoLayout, CONFIG_FILE};
use crate::error::{MonodepsError, Result};
use crate::project::{load_projects, Project};
use crate::temp_modules::{GeneratedModules, TempModuleGenerator};

/// A loaded repository: configuration, resolved layout and projects.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub config: RepoConfig,
    pub layout: RepoLayout,
    pub projects: Vec<Project>,
}

impl Workspace {
    /// Load the repository rooted at `repo_root`.
    pub fn load(repo_root: &Path) -> Result<Self> {
        let config = load_repo_config(repo_root)?;
        let layout = RepoLayout::new(repo_root, &config);
        let projects = load_projects(repo_root, &config)?;

        tracing::debug!(
            "Loaded {} project(s) from {}",
            projects.len(),
            repo_root.display()
        );

        Ok(Self {
            config,
            layout,
            projects,
        })
    }

    /// Load the repository containing `start`.
    pub fn discover(start: &Path) -> Result<Self> {
        let root = find_repo_root(start).ok_or_else(|| MonodepsError::ConfigNotFound {
            path: start.join(CONFIG_FILE),
        })?;
        Self::load(&root)
    }

    pub fn repo_root(&self) -> &PathBuf {
        &self.layout.repo_root
    }

    /// What generation would produce for the current projects.
    pub fn expected_modules(&self) -> Result<GeneratedModules> {
        TempModuleGenerator::new(&self.projects, &self.config.pinned_versions).generate()
    }
}
