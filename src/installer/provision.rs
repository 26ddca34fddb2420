//! Installer tool provisioning.
//!
//! Installs the pinned installer version into a private folder under the
//! common root so every machine runs the same installer. The folder uses
//! the same marker-file protocol as the main install: it is trusted only
//! while `installed.flag` exists.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::{InstallerSettings, RepoLayout};
use crate::error::{MonodepsError, Result};
use crate::manifest::{write_manifest, Manifest, MANIFEST_FILE};

use super::marker::MarkerFile;
use super::process::{run_with_retry, Invocation, ProcessRunner, RetryPolicy};

/// Marker certifying a provisioned tool folder.
pub const TOOL_MARKER_FILE: &str = "installed.flag";

/// Resolves the installer binary, installing it first when needed.
pub struct ToolProvisioner<'a> {
    settings: &'a InstallerSettings,
    layout: &'a RepoLayout,
    runner: &'a dyn ProcessRunner,
    policy: RetryPolicy,
}

impl<'a> ToolProvisioner<'a> {
    pub fn new(
        settings: &'a InstallerSettings,
        layout: &'a RepoLayout,
        runner: &'a dyn ProcessRunner,
    ) -> Self {
        Self {
            settings,
            layout,
            runner,
            policy: RetryPolicy::from_settings(settings),
        }
    }

    /// Folder the pinned tool is installed into.
    pub fn tool_folder(&self) -> PathBuf {
        self.layout
            .tools_dir()
            .join(format!("{}-{}", self.settings.tool, self.settings.version))
    }

    /// Path of the provisioned binary.
    pub fn binary_path(&self) -> PathBuf {
        self.tool_folder()
            .join("node_modules")
            .join(".bin")
            .join(binary_name(&self.settings.tool))
    }

    /// Return the installer binary to use.
    pub fn ensure(&self) -> Result<PathBuf> {
        if !self.settings.provision {
            tracing::debug!("Using {} from PATH", self.settings.tool);
            return Ok(PathBuf::from(&self.settings.tool));
        }

        let folder = self.tool_folder();
        let marker = MarkerFile::new(folder.join(TOOL_MARKER_FILE));
        let binary = self.binary_path();

        if marker.exists() && binary.exists() {
            tracing::debug!("{} already provisioned at {}", self.tool_spec(), folder.display());
            return Ok(binary);
        }

        tracing::info!("Provisioning {} into {}", self.tool_spec(), folder.display());
        self.install_into(&folder, &marker)
            .map_err(|e| self.provisioning_error(e.to_string()))?;

        if !binary.exists() {
            marker.delete()?;
            return Err(self.provisioning_error(format!(
                "installer binary not found at {}",
                binary.display()
            )));
        }
        Ok(binary)
    }

    fn install_into(&self, folder: &Path, marker: &MarkerFile) -> Result<()> {
        marker.delete()?;

        // A manifest keeps the bootstrap installer from walking up into the repo.
        let mut dependencies = BTreeMap::new();
        dependencies.insert(self.settings.tool.clone(), self.settings.version.clone());
        let manifest = Manifest::temp_module(
            format!("{}-local-install", self.settings.tool),
            dependencies,
        );
        write_manifest(&folder.join(MANIFEST_FILE), &manifest)?;

        let invocation = Invocation::new(&self.settings.tool, folder)
            .arg("install")
            .arg(self.tool_spec());
        run_with_retry(self.runner, &invocation, &self.policy)?;

        marker.create()
    }

    fn tool_spec(&self) -> String {
        format!("{}@{}", self.settings.tool, self.settings.version)
    }

    fn provisioning_error(&self, message: String) -> MonodepsError {
        MonodepsError::ToolProvisioning {
            tool: self.settings.tool.clone(),
            version: self.settings.version.clone(),
            message,
        }
    }
}

fn binary_name(tool: &str) -> String {
    if cfg!(windows) {
        format!("{}.cmd", tool)
    } else {
        tool.to_string()
    }
}
