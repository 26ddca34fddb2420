//! Read-only install status.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::installer::state_machine::{current_state, newer_inputs};
use crate::installer::{InstallState, MarkerFile, NewerInput};
use crate::lockfile::{InstallDecision, LockFile, SatisfactionAnalyzer, Unsatisfied};

use super::install::verify_temp_modules;
use super::Workspace;

/// Result of the temp module consistency check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConsistencyStatus {
    Consistent,
    NeedsGenerate { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub state: InstallState,
    pub installed_at: Option<DateTime<Utc>>,
    pub newer_inputs: Vec<NewerInput>,
    pub consistency: ConsistencyStatus,
    pub lock_file_present: bool,

    /// What `generate` would decide about the lock file.
    pub lock_decision: InstallDecision,
    pub unsatisfied: Vec<Unsatisfied>,
}

impl StatusReport {
    /// Whether `install` would have nothing to do.
    pub fn is_up_to_date(&self) -> bool {
        self.state == InstallState::Clean
            && self.newer_inputs.is_empty()
            && self.consistency == ConsistencyStatus::Consistent
    }
}

pub struct StatusReporter<'a> {
    workspace: &'a Workspace,
}

impl<'a> StatusReporter<'a> {
    pub fn new(workspace: &'a Workspace) -> Self {
        Self { workspace }
    }

    /// Inspect the common root without modifying it.
    pub fn report(&self) -> Result<StatusReport> {
        let layout = &self.workspace.layout;

        let consistency = match verify_temp_modules(self.workspace) {
            Ok(()) => ConsistencyStatus::Consistent,
            Err(e) if e.requires_regeneration() => ConsistencyStatus::NeedsGenerate {
                reason: e.to_string(),
            },
            Err(e) => return Err(e),
        };

        let expected = self.workspace.expected_modules()?;
        let lock = LockFile::load(&layout.lock_file())?;
        let satisfaction = SatisfactionAnalyzer::new(&expected).analyze(lock.as_ref());

        Ok(StatusReport {
            state: current_state(layout),
            installed_at: MarkerFile::new(layout.marker_file()).modified()?,
            newer_inputs: newer_inputs(layout)?,
            consistency,
            lock_file_present: satisfaction.lock_file_present,
            lock_decision: satisfaction.decision,
            unsatisfied: satisfaction.unsatisfied,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::installer::process::testing::ScriptedRunner;
    use crate::installer::Recycler;
    use crate::orchestrator::testing::{fake_install, fake_shrinkwrap, sample_repo, write_package};
    use crate::orchestrator::{GenerateOptions, GenerateOrchestrator};

    #[test]
    fn fresh_repo_status() {
        let temp = sample_repo();
        let workspace = Workspace::load(temp.path()).unwrap();

        let report = StatusReporter::new(&workspace).report().unwrap();
        assert_eq!(report.state, InstallState::Dirty);
        assert!(report.installed_at.is_none());
        assert!(!report.lock_file_present);
        assert_eq!(report.lock_decision, InstallDecision::FullReinstall);
        assert!(matches!(
            report.consistency,
            ConsistencyStatus::NeedsGenerate { .. }
        ));
        assert!(!report.is_up_to_date());
    }

    #[test]
    fn generated_repo_is_up_to_date_until_a_project_changes() {
        let temp = sample_repo();
        let workspace = Workspace::load(temp.path()).unwrap();
        let runner = ScriptedRunner::new()
            .on("install", fake_install)
            .on("shrinkwrap", fake_shrinkwrap);
        let recycler = Recycler::new(workspace.layout.recycler_dir());
        GenerateOrchestrator::new(&workspace, &runner, &recycler)
            .run(&GenerateOptions::default())
            .unwrap();

        let report = StatusReporter::new(&workspace).report().unwrap();
        assert!(report.is_up_to_date());
        assert_eq!(report.lock_decision, InstallDecision::FastInstall);

        write_package(temp.path(), "libs/lib", "@acme/lib", r#"{"left-pad": "^2.0.0"}"#);
        let workspace = Workspace::load(temp.path()).unwrap();
        let report = StatusReporter::new(&workspace).report().unwrap();

        assert!(!report.is_up_to_date());
        assert_eq!(report.state, InstallState::Clean);
        assert_eq!(report.lock_decision, InstallDecision::FullReinstall);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["consistency"]["status"], "needs_generate");
        assert_eq!(json["state"], "clean");
    }
}
