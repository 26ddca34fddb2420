//! Lock file satisfaction analysis.
//!
//! Decides whether the dependency closure recorded in the lock file already
//! covers every range the generated manifests require. The analysis only
//! looks for additions and changes: a dependency removed from a manifest is
//! never a reason to reinstall, so cleaning those up needs an explicit
//! `--force` from the caller.

use serde::Serialize;
use std::fmt;

use crate::manifest::Manifest;
use crate::temp_modules::GeneratedModules;

use super::range::satisfies;
use super::LockFile;

/// What an install run has to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallDecision {
    /// Installed state is current; nothing to do.
    Skip,

    /// The lock file satisfies every range; install from it.
    FastInstall,

    /// The lock file is missing or stale; resolve everything again.
    FullReinstall,
}

impl fmt::Display for InstallDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InstallDecision::Skip => "skip",
            InstallDecision::FastInstall => "fast install",
            InstallDecision::FullReinstall => "full reinstall",
        };
        write!(f, "{}", s)
    }
}

/// A required range the lock file does not cover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Unsatisfied {
    /// Manifest that declares the requirement.
    pub consumer: String,

    /// Required dependency.
    pub dependency: String,

    /// Required range or local reference.
    pub required: String,

    /// Version found in the lock file, if any.
    pub found: Option<String>,
}

impl fmt::Display for Unsatisfied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.found {
            Some(found) => write!(
                f,
                "{} requires {}@{} but the lock file resolves {}",
                self.consumer, self.dependency, self.required, found
            ),
            None => write!(
                f,
                "{} requires {}@{} which the lock file does not contain",
                self.consumer, self.dependency, self.required
            ),
        }
    }
}

/// Outcome of [`SatisfactionAnalyzer::analyze`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SatisfactionReport {
    pub decision: InstallDecision,

    /// Whether a lock file existed at all.
    pub lock_file_present: bool,

    /// Every uncovered requirement, in manifest order.
    pub unsatisfied: Vec<Unsatisfied>,
}

/// Checks generated manifests against a lock file.
pub struct SatisfactionAnalyzer<'a> {
    generated: &'a GeneratedModules,
}

impl<'a> SatisfactionAnalyzer<'a> {
    pub fn new(generated: &'a GeneratedModules) -> Self {
        Self { generated }
    }

    /// Decide between [`InstallDecision::FastInstall`] and
    /// [`InstallDecision::FullReinstall`].
    ///
    /// Temp module requirements are looked up under the consumer's own lock
    /// entry first, then at the lock root. Common-root requirements (temp
    /// projects and pinned versions) are looked up at the root only.
    pub fn analyze(&self, lock: Option<&LockFile>) -> SatisfactionReport {
        let Some(lock) = lock else {
            tracing::info!("No lock file found; a full reinstall is required");
            return SatisfactionReport {
                decision: InstallDecision::FullReinstall,
                lock_file_present: false,
                unsatisfied: Vec::new(),
            };
        };

        let mut unsatisfied = Vec::new();

        let common = &self.generated.common_manifest;
        for (dependency, required) in &common.dependencies {
            let entry = lock.root_entry(dependency);
            check(&mut unsatisfied, common, dependency, required, entry);
        }

        for module in self.generated.temp_modules.values() {
            for (dependency, required) in &module.dependencies {
                let entry = lock.resolve(&module.name, dependency);
                check(&mut unsatisfied, module, dependency, required, entry);
            }
        }

        let decision = if unsatisfied.is_empty() {
            InstallDecision::FastInstall
        } else {
            tracing::info!(
                "Lock file does not satisfy {} requirement(s); first: {}",
                unsatisfied.len(),
                unsatisfied[0]
            );
            InstallDecision::FullReinstall
        };

        SatisfactionReport {
            decision,
            lock_file_present: true,
            unsatisfied,
        }
    }
}

fn check(
    unsatisfied: &mut Vec<Unsatisfied>,
    consumer: &Manifest,
    dependency: &str,
    required: &str,
    entry: Option<&super::LockEntry>,
) {
    // Local references resolve from disk; presence in the lock is enough.
    let ok = match entry {
        Some(_) if is_local_reference(required) => true,
        Some(entry) => satisfies(&entry.version, required),
        None => false,
    };

    if !ok {
        unsatisfied.push(Unsatisfied {
            consumer: consumer.name.clone(),
            dependency: dependency.to_string(),
            required: required.to_string(),
            found: entry.map(|e| e.version.clone()),
        });
    }
}

fn is_local_reference(required: &str) -> bool {
    required.starts_with("file:")
}
