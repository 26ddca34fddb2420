//! On-disk persistence of temp modules and the common-root manifest.
//!
//! Layout: every temp module lives in `<temp_modules>/<folder>/package.json`,
//! where `<folder>` is the unscoped temp project name.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{MonodepsError, Result};

use super::Manifest;

/// File name of every persisted manifest.
pub const MANIFEST_FILE: &str = "package.json";

/// A temp module read back from disk.
#[derive(Debug, Clone)]
pub struct PersistedTempModule {
    /// Path of the manifest file.
    pub path: PathBuf,

    /// Parsed manifest.
    pub manifest: Manifest,
}

/// Folder name for a temp project: its name without the `@scope/` prefix.
pub fn temp_module_folder(temp_project_name: &str) -> &str {
    temp_project_name
        .rsplit_once('/')
        .map(|(_, name)| name)
        .unwrap_or(temp_project_name)
}

/// Read a manifest file.
pub fn read_manifest(path: &Path) -> Result<Manifest> {
    let content = fs::read_to_string(path)?;
    Manifest::from_json(&content).map_err(|e| MonodepsError::ManifestParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Write a manifest in canonical form, creating parent directories.
pub fn write_manifest(path: &Path, manifest: &Manifest) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, manifest.to_canonical_json())?;
    Ok(())
}

/// Persist every temp module under `dir`.
///
/// Returns the written manifest paths in the same order as `modules`.
pub fn write_temp_modules(
    dir: &Path,
    modules: &BTreeMap<String, Manifest>,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(modules.len());
    for manifest in modules.values() {
        let path = dir
            .join(temp_module_folder(&manifest.name))
            .join(MANIFEST_FILE);
        write_manifest(&path, manifest)?;
        tracing::debug!("Wrote temp module {}", path.display());
        written.push(path);
    }
    Ok(written)
}

/// Paths of the persisted temp module manifests under `dir`, sorted.
pub fn temp_module_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path().join(MANIFEST_FILE);
        if entry.file_type()?.is_dir() && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Enumerate persisted temp modules, sorted by path.
///
/// A missing directory yields an empty list. Sub-directories without a
/// manifest file are ignored.
pub fn read_temp_modules(dir: &Path) -> Result<Vec<PersistedTempModule>> {
    temp_module_paths(dir)?
        .into_iter()
        .map(|path| {
            let manifest = read_manifest(&path)?;
            Ok(PersistedTempModule { path, manifest })
        })
        .collect()
}
