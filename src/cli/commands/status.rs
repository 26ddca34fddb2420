//! Status command implementation.
//!
//! The `monodeps status` command reports the install state without
//! changing anything.

use std::path::{Path, PathBuf};

use crate::cli::args::StatusArgs;
use crate::error::{MonodepsError, Result};
use crate::orchestrator::{ConsistencyStatus, StatusReport, StatusReporter, Workspace};
use crate::ui::{hints, UserInterface};

use super::dispatcher::{Command, CommandResult};

pub struct StatusCommand {
    start_dir: PathBuf,
    args: StatusArgs,
}

impl StatusCommand {
    pub fn new(start_dir: &Path, args: StatusArgs) -> Self {
        Self {
            start_dir: start_dir.to_path_buf(),
            args,
        }
    }

    fn show(&self, report: &StatusReport, ui: &mut dyn UserInterface) {
        ui.show_header("Install status");
        ui.show_field("State", &report.state.to_string());
        ui.show_field(
            "Installed at",
            &report
                .installed_at
                .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                .unwrap_or_else(|| "never".to_string()),
        );

        let consistency = match &report.consistency {
            ConsistencyStatus::Consistent => "consistent".to_string(),
            ConsistencyStatus::NeedsGenerate { reason } => reason.clone(),
        };
        ui.show_field("Temp modules", &consistency);
        ui.show_field(
            "Lock file",
            if report.lock_file_present {
                "present"
            } else {
                "missing"
            },
        );
        ui.show_field("Next generate", &report.lock_decision.to_string());

        if !report.newer_inputs.is_empty() {
            ui.show_field(
                "Changed inputs",
                &report.newer_inputs.len().to_string(),
            );
            if ui.output_mode().shows_details() {
                for input in &report.newer_inputs {
                    ui.message(&format!("  {}", input.path.display()));
                }
            }
        }
        if ui.output_mode().shows_details() {
            for unsatisfied in &report.unsatisfied {
                ui.message(&format!("  {}", unsatisfied));
            }
        }

        if report.is_up_to_date() {
            ui.success("Installed dependencies are up to date");
        } else if matches!(report.consistency, ConsistencyStatus::NeedsGenerate { .. }) {
            ui.show_hint(hints::run_generate());
        } else {
            ui.show_hint(hints::install_needed());
        }
    }
}

impl Command for StatusCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let workspace = Workspace::discover(&self.start_dir)?;
        let report = StatusReporter::new(&workspace).report()?;

        if self.args.json {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| MonodepsError::Other(e.into()))?;
            ui.output(&json);
        } else {
            self.show(&report, ui);
        }

        Ok(CommandResult::success())
    }
}
