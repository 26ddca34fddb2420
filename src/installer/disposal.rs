//! Disposal of large directory trees.
//!
//! Deleting an installed-dependency directory can take a long time. The
//! [`Recycler`] moves it out of the way with a single rename and deletes it
//! on a background thread, so the path is free again immediately.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use crate::error::{MonodepsError, Result};

/// Removes directories, possibly asynchronously.
pub trait Disposer {
    /// Make `path` disappear. The path no longer exists once this returns;
    /// the returned handle tracks any remaining cleanup.
    fn dispose(&self, path: &Path) -> Result<DisposalHandle>;
}

/// Completion handle for a disposal. Dropping it detaches the cleanup.
#[derive(Debug)]
pub struct DisposalHandle {
    worker: Option<JoinHandle<io::Result<()>>>,
}

impl DisposalHandle {
    /// A disposal that already finished.
    pub fn completed() -> Self {
        Self { worker: None }
    }

    /// Block until the deletion finished.
    pub fn wait(mut self) -> Result<()> {
        match self.worker.take() {
            None => Ok(()),
            Some(worker) => match worker.join() {
                Ok(result) => result.map_err(MonodepsError::from),
                Err(_) => Err(MonodepsError::Other(anyhow::anyhow!(
                    "Disposal thread panicked"
                ))),
            },
        }
    }
}

/// Renames into `<common root>/recycler/<n>` and deletes in the background.
#[derive(Debug, Clone)]
pub struct Recycler {
    dir: PathBuf,
}

impl Recycler {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn leftovers(&self) -> io::Result<Vec<PathBuf>> {
        match fs::read_dir(&self.dir) {
            Ok(entries) => entries.map(|e| e.map(|e| e.path())).collect(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    fn next_slot(&self, taken: &[PathBuf]) -> PathBuf {
        let next = taken
            .iter()
            .filter_map(|p| p.file_name()?.to_str()?.parse::<u64>().ok())
            .max()
            .map_or(0, |n| n.saturating_add(1));
        self.dir.join(next.to_string())
    }
}

impl Disposer for Recycler {
    fn dispose(&self, path: &Path) -> Result<DisposalHandle> {
        if !path.exists() {
            return Ok(DisposalHandle::completed());
        }

        fs::create_dir_all(&self.dir)?;
        let mut doomed = self.leftovers()?;
        if !doomed.is_empty() {
            tracing::debug!("Sweeping {} leftover recycler entries", doomed.len());
        }

        let slot = self.next_slot(&doomed);
        match fs::rename(path, &slot) {
            Ok(()) => {
                tracing::debug!("Moved {} to {}", path.display(), slot.display());
                doomed.push(slot);
            }
            Err(e) => {
                tracing::warn!(
                    "Could not move {} into the recycler ({}); deleting in place",
                    path.display(),
                    e
                );
                fs::remove_dir_all(path)?;
            }
        }
        if doomed.is_empty() {
            return Ok(DisposalHandle::completed());
        }

        let worker = thread::spawn(move || {
            for entry in doomed {
                remove_any(&entry)?;
            }
            Ok(())
        });

        Ok(DisposalHandle {
            worker: Some(worker),
        })
    }
}

fn remove_any(path: &Path) -> io::Result<()> {
    let result = if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    match result {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
