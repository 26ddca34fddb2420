//! Installer process execution and retry.

use std::fmt;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::config::InstallerSettings;
use crate::error::{MonodepsError, Result};

/// A program to run, with its arguments and working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// First argument, used to identify the subcommand in logs and fakes.
    pub fn subcommand(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Result of running an invocation once.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Execution duration.
    pub duration: Duration,

    /// Whether the command exited with 0.
    pub success: bool,
}

impl CommandResult {
    pub fn success(duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            duration,
            success: true,
        }
    }

    pub fn failure(exit_code: Option<i32>, duration: Duration) -> Self {
        Self {
            exit_code,
            duration,
            success: false,
        }
    }
}

/// Runs installer invocations.
///
/// A nonzero exit is reported through [`CommandResult`], not as an error;
/// `Err` means the process could not be started at all.
pub trait ProcessRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandResult>;
}

/// Spawns the program directly with inherited stdio and no timeout.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandResult> {
        let start = Instant::now();

        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| {
                MonodepsError::Other(anyhow::anyhow!(
                    "Failed to start '{}': {}",
                    invocation.program.display(),
                    e
                ))
            })?;

        let duration = start.elapsed();
        if status.success() {
            Ok(CommandResult::success(duration))
        } else {
            Ok(CommandResult::failure(status.code(), duration))
        }
    }
}

/// How often, and how patiently, a failing invocation is repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::ZERO,
        }
    }
}

impl RetryPolicy {
    pub fn from_settings(settings: &InstallerSettings) -> Self {
        Self {
            max_attempts: settings.max_attempts.max(1),
            delay: Duration::from_millis(settings.retry_delay_ms),
        }
    }
}

/// Successful outcome of [`run_with_retry`].
#[derive(Debug, Clone)]
pub struct RetryOutcome {
    pub result: CommandResult,
    pub attempts: u32,
}

/// Run `invocation` until it exits 0 or `policy.max_attempts` is reached.
pub fn run_with_retry(
    runner: &dyn ProcessRunner,
    invocation: &Invocation,
    policy: &RetryPolicy,
) -> Result<RetryOutcome> {
    let max_attempts = policy.max_attempts.max(1);
    let mut last_code = None;

    for attempt in 1..=max_attempts {
        tracing::debug!("Running '{}' (attempt {}/{})", invocation, attempt, max_attempts);

        let result = runner.run(invocation)?;
        if result.success {
            return Ok(RetryOutcome {
                result,
                attempts: attempt,
            });
        }

        last_code = result.exit_code;
        tracing::warn!(
            "'{}' failed with exit code {:?} on attempt {}/{}",
            invocation,
            result.exit_code,
            attempt,
            max_attempts
        );

        if attempt < max_attempts && !policy.delay.is_zero() {
            thread::sleep(policy.delay);
        }
    }

    Err(MonodepsError::InstallerFailure {
        command: invocation.to_string(),
        attempts: max_attempts,
        code: last_code,
    })
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedRunner;
    use super::*;

    fn install() -> Invocation {
        Invocation::new("npm", "/repo/common/temp").arg("install")
    }

    #[test]
    fn invocation_display_joins_args() {
        let inv = Invocation::new("npm", "/tmp")
            .arg("cache")
            .arg("clean")
            .arg("/cache");
        assert_eq!(inv.to_string(), "npm cache clean /cache");
        assert_eq!(inv.subcommand(), Some("cache"));
    }

    #[test]
    fn succeeds_on_first_attempt() {
        let runner = ScriptedRunner::new();
        let outcome = run_with_retry(&runner, &install(), &RetryPolicy::default()).unwrap();
        assert_eq!(outcome.attempts, 1);
        assert!(outcome.result.success);
    }

    #[test]
    fn succeeds_on_later_attempt() {
        let runner = ScriptedRunner::new().script("install", &[1, 1, 0]);
        let outcome = run_with_retry(&runner, &install(), &RetryPolicy::default()).unwrap();
        assert_eq!(outcome.attempts, 3);
        assert_eq!(runner.calls.borrow().len(), 3);
    }

    #[test]
    fn exhausted_retries_report_last_code() {
        let runner = ScriptedRunner::new().script("install", &[1, 1, 7]);
        let policy = RetryPolicy {
            max_attempts: 3,
            delay: Duration::ZERO,
        };

        let err = run_with_retry(&runner, &install(), &policy).unwrap_err();
        match err {
            MonodepsError::InstallerFailure {
                command,
                attempts,
                code,
            } => {
                assert_eq!(command, "npm install");
                assert_eq!(attempts, 3);
                assert_eq!(code, Some(7));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn zero_max_attempts_still_runs_once() {
        let runner = ScriptedRunner::new();
        let policy = RetryPolicy {
            max_attempts: 0,
            delay: Duration::ZERO,
        };
        let outcome = run_with_retry(&runner, &install(), &policy).unwrap();
        assert_eq!(outcome.attempts, 1);
    }

    #[test]
    fn policy_from_settings() {
        let settings = InstallerSettings {
            max_attempts: 3,
            retry_delay_ms: 250,
            ..Default::default()
        };
        let policy = RetryPolicy::from_settings(&settings);
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay, Duration::from_millis(250));
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_reports_exit_code() {
        let temp = tempfile::TempDir::new().unwrap();
        let ok = SystemRunner
            .run(&Invocation::new("true", temp.path()))
            .unwrap();
        assert!(ok.success);

        let failed = SystemRunner
            .run(&Invocation::new("false", temp.path()))
            .unwrap();
        assert!(!failed.success);
        assert_eq!(failed.exit_code, Some(1));
    }

    #[test]
    fn system_runner_errors_when_program_missing() {
        let temp = tempfile::TempDir::new().unwrap();
        let result = SystemRunner.run(&Invocation::new(
            "definitely-not-a-real-installer-binary",
            temp.path(),
        ));
        assert!(result.is_err());
    }
}
