//! Resolved filesystem layout of a repository.
//!
//! [`RepoLayout`] turns the relative paths of a [`RepoConfig`] into absolute
//! paths once, so every component receives the same immutable view.

use std::path::{Path, PathBuf};

use super::schema::RepoConfig;

/// Common-root manifest name.
pub const COMMON_MANIFEST_NAME: &str = "monodeps-common";

/// Folder under the common root holding temp modules.
pub const TEMP_MODULES_FOLDER: &str = "temp_modules";

/// Marker file certifying the last install completed.
pub const MARKER_FILE: &str = "install-complete.flag";

/// Absolute paths used by generation and installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLayout {
    /// Repository root (directory of `monodeps.yml`).
    pub repo_root: PathBuf,

    /// Shared installation root.
    pub common_root: PathBuf,

    /// Scope of synthesized temp projects, e.g. `@monodeps-temp`.
    pub temp_scope: String,

    /// Per-repo installer cache.
    pub cache_dir: Option<PathBuf>,

    /// Installer scratch directory.
    pub tmp_dir: Option<PathBuf>,

    lock_file_name: String,
}

impl RepoLayout {
    /// Resolve the layout of `config` for the repository at `repo_root`.
    pub fn new(repo_root: &Path, config: &RepoConfig) -> Self {
        let resolve = |p: &Path| {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                repo_root.join(p)
            }
        };

        Self {
            repo_root: repo_root.to_path_buf(),
            common_root: resolve(&config.common_folder),
            temp_scope: config.temp_scope.clone(),
            cache_dir: config.installer.cache_folder.as_deref().map(resolve),
            tmp_dir: config.installer.tmp_folder.as_deref().map(resolve),
            lock_file_name: config.lock_file.clone(),
        }
    }

    /// Directory holding one folder per temp module.
    pub fn temp_modules_dir(&self) -> PathBuf {
        self.common_root.join(TEMP_MODULES_FOLDER)
    }

    /// The common-root manifest.
    pub fn common_manifest(&self) -> PathBuf {
        self.common_root.join(crate::manifest::MANIFEST_FILE)
    }

    /// The lock file written by the installer.
    pub fn lock_file(&self) -> PathBuf {
        self.common_root.join(&self.lock_file_name)
    }

    /// The install-complete marker.
    pub fn marker_file(&self) -> PathBuf {
        self.common_root.join(MARKER_FILE)
    }

    /// The installed-dependency directory.
    pub fn node_modules(&self) -> PathBuf {
        self.common_root.join("node_modules")
    }

    /// Where synthesized temp projects land inside the installed directory.
    pub fn installed_temp_scope(&self) -> PathBuf {
        self.node_modules().join(&self.temp_scope)
    }

    /// Staging area for directories being disposed of.
    pub fn recycler_dir(&self) -> PathBuf {
        self.common_root.join("recycler")
    }

    /// Where provisioned installer tools live.
    pub fn tools_dir(&self) -> PathBuf {
        self.common_root.join("tools")
    }
}
