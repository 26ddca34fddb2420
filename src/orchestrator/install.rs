//! The `install` workflow.

use crate::error::Result;
use crate::installer::{
    Disposer, InstallOptions, InstallReport, InstallStateMachine, Installer, ProcessRunner,
    RetryPolicy, ToolProvisioner,
};
use crate::manifest::{read_manifest, read_temp_modules};
use crate::temp_modules::ConsistencyChecker;

use super::Workspace;

/// Verifies persisted temp modules, then runs the install protocol.
pub struct InstallOrchestrator<'a> {
    workspace: &'a Workspace,
    runner: &'a dyn ProcessRunner,
    disposer: &'a dyn Disposer,
}

impl<'a> InstallOrchestrator<'a> {
    pub fn new(
        workspace: &'a Workspace,
        runner: &'a dyn ProcessRunner,
        disposer: &'a dyn Disposer,
    ) -> Self {
        Self {
            workspace,
            runner,
            disposer,
        }
    }

    /// # Errors
    ///
    /// Consistency failures (`OrphanedTempModule`, `MissingTempModule`,
    /// `Drift`) are returned before anything on disk is touched.
    pub fn run(&self, options: &InstallOptions) -> Result<InstallReport> {
        let layout = &self.workspace.layout;

        verify_temp_modules(self.workspace)?;

        let settings = &self.workspace.config.installer;
        let binary = ToolProvisioner::new(settings, layout, self.runner).ensure()?;
        let installer = Installer::new(
            binary,
            &layout.common_root,
            self.runner,
            RetryPolicy::from_settings(settings),
        );

        let report = InstallStateMachine::new(layout, &installer, self.disposer).run(options)?;
        tracing::info!(
            "Install finished: {} ({} attempt(s))",
            report.decision,
            report.attempts
        );
        Ok(report)
    }
}

/// Check persisted temp modules against a fresh generation.
pub fn verify_temp_modules(workspace: &Workspace) -> Result<()> {
    let layout = &workspace.layout;
    let expected = workspace.expected_modules()?;
    let persisted = read_temp_modules(&layout.temp_modules_dir())?;

    let common_path = layout.common_manifest();
    let common = if common_path.is_file() {
        Some(read_manifest(&common_path)?)
    } else {
        None
    };

    ConsistencyChecker::new(&workspace.projects, &expected).check(&persisted, common.as_ref())
}
