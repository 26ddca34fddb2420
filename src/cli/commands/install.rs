//! Install command implementation.
//!
//! The `monodeps install` command verifies the temp modules and runs the
//! install protocol.

use std::path::{Path, PathBuf};

use crate::cli::args::InstallArgs;
use crate::error::Result;
use crate::installer::{InstallOptions, ProcessRunner, Recycler, SystemRunner};
use crate::lockfile::InstallDecision;
use crate::orchestrator::{InstallOrchestrator, Workspace};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

pub struct InstallCommand {
    start_dir: PathBuf,
    args: InstallArgs,
    runner: Box<dyn ProcessRunner>,
}

impl InstallCommand {
    pub fn new(start_dir: &Path, args: InstallArgs) -> Self {
        Self {
            start_dir: start_dir.to_path_buf(),
            args,
            runner: Box::new(SystemRunner),
        }
    }

    /// Use `runner` instead of spawning real processes.
    pub fn with_runner(mut self, runner: Box<dyn ProcessRunner>) -> Self {
        self.runner = runner;
        self
    }
}

impl Command for InstallCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let workspace = Workspace::discover(&self.start_dir)?;
        ui.show_header("Installing dependencies");

        let options = InstallOptions {
            clean: self.args.clean_mode(),
        };
        if self.args.full_clean && workspace.layout.cache_dir.is_none() {
            ui.warning("No cache_folder configured; the shared installer cache is left alone");
        }

        let recycler = Recycler::new(workspace.layout.recycler_dir());
        let report =
            InstallOrchestrator::new(&workspace, self.runner.as_ref(), &recycler).run(&options)?;

        match report.decision {
            InstallDecision::Skip => ui.success("Installed dependencies are already up to date"),
            _ => {
                if report.pruned {
                    ui.message("Pruned extraneous packages");
                }
                ui.success(&format!(
                    "Installed dependencies ({} attempt(s))",
                    report.attempts
                ));
            }
        }

        Ok(CommandResult::success())
    }
}
