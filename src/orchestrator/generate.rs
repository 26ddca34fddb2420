//! The `generate` workflow.
//!
//! Rewrites every temp module from the current project manifests, decides
//! whether the existing lock file can be reused, reinstalls and (unless
//! lazy) regenerates the lock file.

use serde::Serialize;
use std::fs;
use std::io;

use crate::error::Result;
use crate::installer::{
    state_machine::remove_temp_project_entries, Disposer, InstallStateMachine, Installer,
    MarkerFile, ProcessRunner, RetryPolicy, ToolProvisioner,
};
use crate::lockfile::{InstallDecision, LockFile, SatisfactionAnalyzer, Unsatisfied};
use crate::manifest::{write_manifest, write_temp_modules};

use super::Workspace;

#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateOptions {
    /// Keep the installed tree and skip lock file regeneration.
    pub lazy: bool,

    /// Discard the lock file even when it still satisfies every range.
    pub force: bool,
}

/// Outcome of [`GenerateOrchestrator::run`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateReport {
    pub decision: InstallDecision,
    pub project_count: usize,
    pub lock_regenerated: bool,

    /// Why the lock file was discarded, when it was.
    pub unsatisfied: Vec<Unsatisfied>,
}

pub struct GenerateOrchestrator<'a> {
    workspace: &'a Workspace,
    runner: &'a dyn ProcessRunner,
    disposer: &'a dyn Disposer,
}

impl<'a> GenerateOrchestrator<'a> {
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

    pub fn run(&self, options: &GenerateOptions) -> Result<GenerateReport> {
        let layout = &self.workspace.layout;
        let generated = self.workspace.expected_modules()?;

        let temp_modules_dir = layout.temp_modules_dir();
        match fs::remove_dir_all(&temp_modules_dir) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e.into()),
            _ => {}
        }
        write_temp_modules(&temp_modules_dir, &generated.temp_modules)?;
        write_manifest(&layout.common_manifest(), &generated.common_manifest)?;
        tracing::info!(
            "Wrote {} temp module(s) to {}",
            generated.temp_modules.len(),
            temp_modules_dir.display()
        );

        let lock_path = layout.lock_file();
        let lock = LockFile::load(&lock_path)?;
        let satisfaction = SatisfactionAnalyzer::new(&generated).analyze(lock.as_ref());
        tracing::info!("Install decision: {}", satisfaction.decision);

        MarkerFile::new(layout.marker_file()).delete()?;
        if options.lazy {
            remove_temp_project_entries(layout)?;
        } else {
            self.disposer.dispose(&layout.node_modules())?.wait()?;
        }

        if satisfaction.decision == InstallDecision::FullReinstall || options.force {
            match fs::remove_file(&lock_path) {
                Ok(()) => tracing::info!("Deleted {}", lock_path.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }

        let settings = &self.workspace.config.installer;
        let binary = ToolProvisioner::new(settings, layout, self.runner).ensure()?;
        let installer = Installer::new(
            binary,
            &layout.common_root,
            self.runner,
            RetryPolicy::from_settings(settings),
        );

        InstallStateMachine::new(layout, &installer, self.disposer).install_and_mark()?;

        let lock_regenerated = !options.lazy;
        if lock_regenerated {
            installer.shrinkwrap()?;
            tracing::info!("Regenerated {}", lock_path.display());
        }

        Ok(GenerateReport {
            decision: satisfaction.decision,
            project_count: self.workspace.projects.len(),
            lock_regenerated,
            unsatisfied: satisfaction.unsatisfied,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::installer::process::testing::ScriptedRunner;
    use crate::installer::Recycler;
    use crate::manifest::{read_manifest, read_temp_modules};
    use crate::orchestrator::testing::{fake_install, fake_shrinkwrap, sample_repo, write_package};

    fn runner() -> ScriptedRunner {
        ScriptedRunner::new()
            .on("install", fake_install)
            .on("shrinkwrap", fake_shrinkwrap)
    }

    fn generate(workspace: &Workspace, runner: &ScriptedRunner, options: GenerateOptions) -> GenerateReport {
        let recycler = Recycler::new(workspace.layout.recycler_dir());
        GenerateOrchestrator::new(workspace, runner, &recycler)
            .run(&options)
            .unwrap()
    }

    #[test]
    fn first_run_writes_modules_and_lock_file() {
        let temp = sample_repo();
        let workspace = Workspace::load(temp.path()).unwrap();
        let runner = runner();

        let report = generate(&workspace, &runner, GenerateOptions::default());
        assert_eq!(report.decision, InstallDecision::FullReinstall);
        assert_eq!(report.project_count, 2);
        assert!(report.lock_regenerated);
        assert_eq!(runner.subcommands(), vec!["install", "shrinkwrap"]);

        let layout = &workspace.layout;
        let modules = read_temp_modules(&layout.temp_modules_dir()).unwrap();
        assert_eq!(modules.len(), 2);
        let common = read_manifest(&layout.common_manifest()).unwrap();
        assert_eq!(common.name, "monodeps-common");
        assert!(layout.lock_file().exists());
        assert!(layout.marker_file().exists());
    }

    #[test]
    fn second_run_reuses_lock_file() {
        let temp = sample_repo();
        let workspace = Workspace::load(temp.path()).unwrap();

        generate(&workspace, &runner(), GenerateOptions::default());
        let report = generate(&workspace, &runner(), GenerateOptions::default());

        assert_eq!(report.decision, InstallDecision::FastInstall);
        assert!(report.unsatisfied.is_empty());
    }

    #[test]
    fn raised_range_discards_lock_file() {
        let temp = sample_repo();
        let workspace = Workspace::load(temp.path()).unwrap();
        generate(&workspace, &runner(), GenerateOptions::default());

        write_package(
            temp.path(),
            "apps/app",
            "@acme/app",
            r#"{"@acme/lib": "^1.0.0", "left-pad": "^1.3.0"}"#,
        );
        let workspace = Workspace::load(temp.path()).unwrap();
        let report = generate(&workspace, &runner(), GenerateOptions::default());

        assert_eq!(report.decision, InstallDecision::FullReinstall);
        assert_eq!(report.unsatisfied[0].dependency, "left-pad");
        assert_eq!(report.unsatisfied[0].found.as_deref(), Some("1.2.0"));
    }

    #[test]
    fn force_deletes_satisfying_lock_file() {
        let temp = sample_repo();
        let workspace = Workspace::load(temp.path()).unwrap();
        generate(&workspace, &runner(), GenerateOptions::default());

        let runner = ScriptedRunner::new().on("install", |invocation: &crate::installer::Invocation| {
            assert!(!invocation.cwd.join("npm-shrinkwrap.json").exists());
        });
        let options = GenerateOptions {
            lazy: true,
            force: true,
        };
        let report = generate(&workspace, &runner, options);

        assert_eq!(report.decision, InstallDecision::FastInstall);
        assert!(!workspace.layout.lock_file().exists());
    }

    #[test]
    fn lazy_run_keeps_installed_tree_and_lock() {
        let temp = sample_repo();
        let workspace = Workspace::load(temp.path()).unwrap();
        generate(&workspace, &runner(), GenerateOptions::default());

        let untouched = workspace.layout.node_modules().join("left-pad");
        std::fs::create_dir_all(&untouched).unwrap();

        let runner = ScriptedRunner::new();
        let options = GenerateOptions {
            lazy: true,
            force: false,
        };
        let report = generate(&workspace, &runner, options);

        assert!(!report.lock_regenerated);
        assert_eq!(runner.subcommands(), vec!["install"]);
        assert!(untouched.exists());
        assert!(!workspace.layout.installed_temp_scope().exists());
        assert!(workspace.layout.lock_file().exists());
    }

    #[test]
    fn stale_temp_modules_are_removed() {
        let temp = sample_repo();
        let workspace = Workspace::load(temp.path()).unwrap();
        let stale = workspace.layout.temp_modules_dir().join("gone/package.json");
        std::fs::create_dir_all(stale.parent().unwrap()).unwrap();
        std::fs::write(&stale, "{}").unwrap();

        generate(&workspace, &runner(), GenerateOptions::default());
        assert!(!stale.exists());
    }

    #[test]
    fn install_failure_leaves_marker_absent() {
        let temp = sample_repo();
        let workspace = Workspace::load(temp.path()).unwrap();
        let runner = ScriptedRunner::new().script("install", &[1]);
        let recycler = Recycler::new(workspace.layout.recycler_dir());

        let err = GenerateOrchestrator::new(&workspace, &runner, &recycler)
            .run(&GenerateOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::MonodepsError::InstallerFailure { .. }
        ));
        assert!(!workspace.layout.marker_file().exists());
        assert!(workspace.layout.temp_modules_dir().exists());
    }
}
