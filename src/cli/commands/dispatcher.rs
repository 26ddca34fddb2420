//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands};
use crate::error::{MonodepsError, Result};
use crate::manifest::Manifest;
use crate::ui::{hints, UserInterface};

/// Trait for command implementations.
pub trait Command {
    /// Execute the command.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Exit code for fatal errors.
pub const EXIT_FAILURE: i32 = 1;

/// Exit code when no `monodeps.yml` was found.
pub const EXIT_CONFIG_NOT_FOUND: i32 = 2;

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    start_dir: PathBuf,
}

impl CommandDispatcher {
    /// Create a dispatcher that discovers the repository from `start_dir`.
    pub fn new(start_dir: PathBuf) -> Self {
        Self { start_dir }
    }

    pub fn start_dir(&self) -> &Path {
        &self.start_dir
    }

    /// Dispatch and execute a command.
    ///
    /// Expected failures are reported through `ui` and mapped to an exit
    /// code; anything else is returned to the caller.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let result = match &cli.command {
            Commands::Generate(args) => {
                super::generate::GenerateCommand::new(&self.start_dir, args.clone()).execute(ui)
            }
            Commands::Install(args) => {
                super::install::InstallCommand::new(&self.start_dir, args.clone()).execute(ui)
            }
            Commands::Status(args) => {
                super::status::StatusCommand::new(&self.start_dir, args.clone()).execute(ui)
            }
        };

        match result {
            Ok(result) => Ok(result),
            Err(e) => report_failure(e, ui),
        }
    }
}

fn report_failure(err: MonodepsError, ui: &mut dyn UserInterface) -> Result<CommandResult> {
    match &err {
        MonodepsError::ConfigNotFound { path } => {
            ui.error(&format!("No configuration found ({})", path.display()));
            Ok(CommandResult::failure(EXIT_CONFIG_NOT_FOUND))
        }
        MonodepsError::Drift {
            expected,
            actual,
            changes,
            ..
        } => {
            ui.error(&err.to_string());
            for change in changes {
                ui.message(&format!("  {}", change));
            }
            ui.show_diff(&Manifest::render_diff(expected, actual));
            ui.show_hint(hints::run_generate());
            Ok(CommandResult::failure(EXIT_FAILURE))
        }
        _ if err.requires_regeneration() => {
            ui.error(&err.to_string());
            ui.show_hint(hints::run_generate());
            Ok(CommandResult::failure(EXIT_FAILURE))
        }
        MonodepsError::InstallerFailure { attempts, .. } => {
            ui.error(&err.to_string());
            ui.show_hint(&hints::retry_install(*attempts));
            Ok(CommandResult::failure(EXIT_FAILURE))
        }
        _ => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use std::collections::BTreeMap;

    #[test]
    fn command_result_success() {
        let result = CommandResult::success();
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn command_result_failure() {
        let result = CommandResult::failure(1);
        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
    }

    #[test]
    fn config_not_found_exits_with_two() {
        let mut ui = MockUI::new();
        let err = MonodepsError::ConfigNotFound {
            path: PathBuf::from("/nowhere/monodeps.yml"),
        };

        let result = report_failure(err, &mut ui).unwrap();
        assert_eq!(result.exit_code, EXIT_CONFIG_NOT_FOUND);
        assert!(ui.has_error("No configuration found"));
    }

    #[test]
    fn drift_shows_changes_diff_and_hint() {
        let mut ui = MockUI::new();
        let expected = Manifest::new("@monodeps-temp/app");
        let mut deps = BTreeMap::new();
        deps.insert("left-pad".to_string(), "^1.0.0".to_string());
        let actual = Manifest::temp_module("@monodeps-temp/app", deps);
        let changes = Manifest::diff(&expected, &actual);

        let err = MonodepsError::Drift {
            project: "@acme/app".to_string(),
            expected: Box::new(expected),
            actual: Box::new(actual),
            changes,
        };

        let result = report_failure(err, &mut ui).unwrap();
        assert_eq!(result.exit_code, EXIT_FAILURE);
        assert!(ui.has_error("@acme/app"));
        assert!(ui.has_message("left-pad"));
        assert_eq!(ui.diffs().len(), 1);
        assert!(ui.has_hint("monodeps generate"));
    }

    #[test]
    fn missing_temp_module_suggests_generate() {
        let mut ui = MockUI::new();
        let err = MonodepsError::MissingTempModule {
            project: "@acme/app".to_string(),
        };

        let result = report_failure(err, &mut ui).unwrap();
        assert_eq!(result.exit_code, EXIT_FAILURE);
        assert!(ui.has_hint("monodeps generate"));
    }

    #[test]
    fn installer_failure_suggests_retry() {
        let mut ui = MockUI::new();
        let err = MonodepsError::InstallerFailure {
            command: "npm install".to_string(),
            attempts: 5,
            code: Some(1),
        };

        report_failure(err, &mut ui).unwrap();
        assert!(ui.has_hint("monodeps install"));
    }

    #[test]
    fn unexpected_errors_propagate() {
        let mut ui = MockUI::new();
        let err = MonodepsError::ConfigError {
            message: "bad".to_string(),
        };
        assert!(report_failure(err, &mut ui).is_err());
    }
}
