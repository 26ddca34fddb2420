//! Typed wrapper over the installer's subcommands.

use std::path::{Path, PathBuf};

use crate::error::Result;

use super::process::{run_with_retry, Invocation, ProcessRunner, RetryOutcome, RetryPolicy};

/// An installer binary bound to a working directory and retry policy.
pub struct Installer<'a> {
    binary: PathBuf,
    cwd: PathBuf,
    runner: &'a dyn ProcessRunner,
    policy: RetryPolicy,
}

impl<'a> Installer<'a> {
    pub fn new(
        binary: impl Into<PathBuf>,
        cwd: impl Into<PathBuf>,
        runner: &'a dyn ProcessRunner,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            binary: binary.into(),
            cwd: cwd.into(),
            runner,
            policy,
        }
    }

    /// `install [--cache <dir>] [--tmp <dir>]`
    pub fn install_invocation(&self, cache: Option<&Path>, tmp: Option<&Path>) -> Invocation {
        let mut invocation = self.invocation().arg("install");
        if let Some(cache) = cache {
            invocation = invocation
                .arg("--cache")
                .arg(cache.display().to_string());
        }
        if let Some(tmp) = tmp {
            invocation = invocation.arg("--tmp").arg(tmp.display().to_string());
        }
        invocation
    }

    pub fn install(&self, cache: Option<&Path>, tmp: Option<&Path>) -> Result<RetryOutcome> {
        self.run(&self.install_invocation(cache, tmp))
    }

    pub fn prune(&self) -> Result<RetryOutcome> {
        self.run(&self.invocation().arg("prune"))
    }

    /// Clear the installer cache at `dir`; never called without a directory.
    pub fn cache_clean(&self, dir: &Path) -> Result<RetryOutcome> {
        let invocation = self
            .invocation()
            .arg("cache")
            .arg("clean")
            .arg(dir.display().to_string());
        self.run(&invocation)
    }

    /// Regenerate the lock file from the installed tree.
    pub fn shrinkwrap(&self) -> Result<RetryOutcome> {
        self.run(&self.invocation().arg("shrinkwrap"))
    }

    fn invocation(&self) -> Invocation {
        Invocation::new(&self.binary, &self.cwd)
    }

    fn run(&self, invocation: &Invocation) -> Result<RetryOutcome> {
        run_with_retry(self.runner, invocation, &self.policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::installer::process::testing::ScriptedRunner;

    #[test]
    fn install_passes_cache_and_tmp() {
        let runner = ScriptedRunner::new();
        let installer = Installer::new("npm", "/common", &runner, RetryPolicy::default());

        let inv = installer.install_invocation(Some(Path::new("/cache")), Some(Path::new("/tmp")));
        assert_eq!(inv.args, vec!["install", "--cache", "/cache", "--tmp", "/tmp"]);
        assert_eq!(inv.cwd, PathBuf::from("/common"));

        let bare = installer.install_invocation(None, None);
        assert_eq!(bare.args, vec!["install"]);
    }

    #[test]
    fn subcommands_run_in_common_root() {
        let runner = ScriptedRunner::new();
        let installer = Installer::new("/tools/npm", "/common", &runner, RetryPolicy::default());

        installer.prune().unwrap();
        installer.cache_clean(Path::new("/cache")).unwrap();
        installer.shrinkwrap().unwrap();

        let calls = runner.calls.borrow();
        assert_eq!(calls[0].args, vec!["prune"]);
        assert_eq!(calls[1].args, vec!["cache", "clean", "/cache"]);
        assert_eq!(calls[2].args, vec!["shrinkwrap"]);
        assert!(calls
            .iter()
            .all(|c| c.program == Path::new("/tools/npm") && c.cwd == Path::new("/common")));
    }

    #[test]
    fn prune_is_retried() {
        let runner = ScriptedRunner::new().script("prune", &[1, 0]);
        let installer = Installer::new("npm", "/common", &runner, RetryPolicy::default());

        assert_eq!(installer.prune().unwrap().attempts, 2);
    }
}
