//! Generate command implementation.
//!
//! The `monodeps generate` command rewrites the temp modules and reinstalls.

use std::path::{Path, PathBuf};

use crate::cli::args::GenerateArgs;
use crate::error::Result;
use crate::installer::{ProcessRunner, Recycler, SystemRunner};
use crate::lockfile::InstallDecision;
use crate::orchestrator::{GenerateOrchestrator, Workspace};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

pub struct GenerateCommand {
    start_dir: PathBuf,
    args: GenerateArgs,
    runner: Box<dyn ProcessRunner>,
}

impl GenerateCommand {
    pub fn new(start_dir: &Path, args: GenerateArgs) -> Self {
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

impl Command for GenerateCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let workspace = Workspace::discover(&self.start_dir)?;
        ui.show_header(&format!(
            "Generating temp modules for {} project(s)",
            workspace.projects.len()
        ));

        let recycler = Recycler::new(workspace.layout.recycler_dir());
        let report = GenerateOrchestrator::new(&workspace, self.runner.as_ref(), &recycler)
            .run(&self.args.options())?;

        match report.decision {
            InstallDecision::FullReinstall if report.unsatisfied.is_empty() => {
                ui.message("No lock file found; dependencies were resolved from scratch");
            }
            InstallDecision::FullReinstall => {
                ui.message(&format!(
                    "Lock file no longer satisfies {} requirement(s); dependencies were resolved from scratch",
                    report.unsatisfied.len()
                ));
                let shown = if ui.output_mode().shows_details() {
                    report.unsatisfied.len()
                } else {
                    1
                };
                for unsatisfied in report.unsatisfied.iter().take(shown) {
                    ui.message(&format!("  {}", unsatisfied));
                }
            }
            _ if self.args.force => {
                ui.message("Lock file discarded (--force)");
            }
            _ => ui.message("Existing lock file satisfies every requirement"),
        }

        if report.lock_regenerated {
            ui.success(&format!(
                "Generated {} temp module(s) and refreshed the lock file",
                report.project_count
            ));
        } else {
            ui.success(&format!(
                "Generated {} temp module(s); lock file left unchanged",
                report.project_count
            ));
        }

        Ok(CommandResult::success())
    }
}
