//! Install-complete marker file.
//!
//! The marker is zero bytes; only its existence and modification time
//! carry meaning. It is removed before any mutation of the installed tree
//! and recreated only after a successful install.

use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::Result;

#[derive(Debug, Clone)]
pub struct MarkerFile {
    path: PathBuf,
}

impl MarkerFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Create (or recreate) the marker with a fresh modification time.
    pub fn create(&self) -> Result<()> {
        self.delete()?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::File::create(&self.path)?;
        tracing::debug!("Created marker {}", self.path.display());
        Ok(())
    }

    /// Remove the marker; a missing marker is not an error.
    pub fn delete(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!("Deleted marker {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn modified(&self) -> Result<Option<DateTime<Utc>>> {
        modified_time(&self.path)
    }
}

/// Modification time of `path`, or `None` when it does not exist.
pub fn modified_time(path: &Path) -> Result<Option<DateTime<Utc>>> {
    match fs::metadata(path) {
        Ok(meta) => Ok(Some(DateTime::<Utc>::from(meta.modified()?))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
