//! Crash-safe install protocol.
//!
//! The installed tree under the common root moves through four states:
//!
//! - `Clean` - the marker exists and the installed tree is trusted
//! - `Dirty` - the marker is absent; the installed tree, if any, is
//!   indeterminate (never installed, interrupted or failed)
//! - `Installing` - the installer is running (in-process only)
//! - `Installed` - the installer succeeded and the marker was just created
//!
//! Only `Clean` and `Dirty` can be observed on disk. The marker is deleted
//! before anything touches the installed tree and is created only after the
//! installer succeeded, so a crash at any point leaves a dirty tree.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::RepoLayout;
use crate::error::Result;
use crate::lockfile::InstallDecision;
use crate::manifest::temp_module_paths;

use super::disposal::Disposer;
use super::marker::{modified_time, MarkerFile};
use super::tool::Installer;

/// Observable state of the installed tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallState {
    Clean,
    Dirty,
    Installing,
    Installed,
}

impl fmt::Display for InstallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InstallState::Clean => "clean",
            InstallState::Dirty => "dirty",
            InstallState::Installing => "installing",
            InstallState::Installed => "installed",
        };
        write!(f, "{}", s)
    }
}

/// How much existing state to throw away before installing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CleanMode {
    /// Reuse the installed tree when it is current.
    #[default]
    None,

    /// Delete the installed tree.
    Clean,

    /// Delete the installed tree and clear the per-repo installer cache.
    FullClean,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InstallOptions {
    pub clean: CleanMode,
}

/// Outcome of [`InstallStateMachine::run`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallReport {
    pub decision: InstallDecision,

    /// Whether extraneous packages were pruned before installing.
    pub pruned: bool,

    /// Installer attempts used; zero when skipped.
    pub attempts: u32,
}

/// An input file that changed after the last successful install.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewerInput {
    pub path: PathBuf,
    pub modified: DateTime<Utc>,
}

/// Drives the installer through the marker-file protocol.
pub struct InstallStateMachine<'a> {
    layout: &'a RepoLayout,
    installer: &'a Installer<'a>,
    disposer: &'a dyn Disposer,
    marker: MarkerFile,
}

impl<'a> InstallStateMachine<'a> {
    pub fn new(
        layout: &'a RepoLayout,
        installer: &'a Installer<'a>,
        disposer: &'a dyn Disposer,
    ) -> Self {
        Self {
            layout,
            installer,
            disposer,
            marker: MarkerFile::new(layout.marker_file()),
        }
    }

    /// State of the installed tree as found on disk.
    pub fn state(&self) -> InstallState {
        current_state(self.layout)
    }

    /// Bring the installed tree up to date.
    pub fn run(&self, options: &InstallOptions) -> Result<InstallReport> {
        let node_modules = self.layout.node_modules();
        let mut need_install = false;
        let mut skip_prune = false;

        tracing::debug!("Install state before run: {}", self.state());

        match options.clean {
            CleanMode::Clean | CleanMode::FullClean => {
                tracing::info!("Deleting installed dependencies for a clean install");
                self.marker.delete()?;
                remove_dir_if_exists(&node_modules)?;

                if options.clean == CleanMode::FullClean {
                    match &self.layout.cache_dir {
                        Some(cache) => {
                            self.installer.cache_clean(cache)?;
                        }
                        None => tracing::warn!(
                            "No per-repo cache folder configured; the shared installer cache is never cleared"
                        ),
                    }
                }

                need_install = true;
                skip_prune = true;
            }
            CleanMode::None if !self.marker.exists() => {
                if node_modules.exists() {
                    tracing::warn!(
                        "{} exists without a completed install; discarding it",
                        node_modules.display()
                    );
                    self.disposer.dispose(&node_modules)?.wait()?;
                    skip_prune = true;
                }
                need_install = true;
            }
            CleanMode::None => {
                if !node_modules.exists() {
                    tracing::info!("Installed dependencies are missing");
                    need_install = true;
                } else if let Some(newer) = self.newer_inputs()?.first() {
                    tracing::info!(
                        "{} changed after the last install",
                        newer.path.display()
                    );
                    need_install = true;
                }
            }
        }

        if !need_install {
            tracing::info!("Installed dependencies are up to date");
            return Ok(InstallReport {
                decision: InstallDecision::Skip,
                pruned: false,
                attempts: 0,
            });
        }

        self.marker.delete()?;
        tracing::debug!("Install state: {}", InstallState::Dirty);

        let pruned = !skip_prune;
        if pruned {
            self.installer.prune()?;
            self.remove_temp_project_entries()?;
        }

        let attempts = self.install_and_mark()?;
        Ok(InstallReport {
            decision: InstallDecision::FastInstall,
            pruned,
            attempts,
        })
    }

    /// Run the installer and create the marker on success.
    ///
    /// The marker must already be absent. On failure it stays absent.
    pub fn install_and_mark(&self) -> Result<u32> {
        tracing::debug!("Install state: {}", InstallState::Installing);
        let outcome = self
            .installer
            .install(self.layout.cache_dir.as_deref(), self.layout.tmp_dir.as_deref())?;

        self.marker.create()?;
        tracing::debug!("Install state: {}", InstallState::Installed);
        Ok(outcome.attempts)
    }

    /// Remove synthesized temp project entries from the installed tree.
    ///
    /// The installer copies local temp projects rather than linking them, so
    /// stale copies would survive an install otherwise.
    pub fn remove_temp_project_entries(&self) -> Result<()> {
        remove_temp_project_entries(self.layout)
    }

    /// Inputs modified after the marker, oldest first. Empty without a marker.
    pub fn newer_inputs(&self) -> Result<Vec<NewerInput>> {
        newer_inputs(self.layout)
    }
}

/// State of the installed tree under `layout`: `Clean` or `Dirty`.
pub fn current_state(layout: &RepoLayout) -> InstallState {
    if MarkerFile::new(layout.marker_file()).exists() {
        InstallState::Clean
    } else {
        InstallState::Dirty
    }
}

/// Inputs under `layout` modified after the marker.
pub fn newer_inputs(layout: &RepoLayout) -> Result<Vec<NewerInput>> {
    let Some(installed_at) = MarkerFile::new(layout.marker_file()).modified()? else {
        return Ok(Vec::new());
    };

    let mut inputs = vec![layout.common_manifest(), layout.node_modules()];
    inputs.extend(temp_module_paths(&layout.temp_modules_dir())?);

    let mut newer = Vec::new();
    for path in inputs {
        if let Some(modified) = modified_time(&path)? {
            if modified > installed_at {
                newer.push(NewerInput { path, modified });
            }
        }
    }
    newer.sort_by_key(|n| n.modified);
    Ok(newer)
}

/// Delete `node_modules/<temp scope>` under `layout`.
pub fn remove_temp_project_entries(layout: &RepoLayout) -> Result<()> {
    let scope = layout.installed_temp_scope();
    if remove_dir_if_exists(&scope)? {
        tracing::debug!("Removed temp project entries under {}", scope.display());
    }
    Ok(())
}

fn remove_dir_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}
