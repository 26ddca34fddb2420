//! Configuration loading, parsing, and validation for monodeps.
//!
//! This module handles all aspects of configuration:
//! - Schema definitions in [`schema`]
//! - File discovery, loading and validation in [`loader`]
//! - Resolved absolute paths in [`layout`]
//!
//! # Example
//!
//! ```
//! use monodeps::config::{load_repo_config, RepoLayout};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(temp.path().join("monodeps.yml"), "common_folder: shared").unwrap();
//!
//! let config = load_repo_config(temp.path()).unwrap();
//! let layout = RepoLayout::new(temp.path(), &config);
//! assert_eq!(layout.common_root, temp.path().join("shared"));
//! ```

pub mod layout;
pub mod loader;
pub mod schema;

pub use layout::{RepoLayout, COMMON_MANIFEST_NAME, MARKER_FILE, TEMP_MODULES_FOLDER};
pub use loader::{
    find_repo_root, load_config_file, load_repo_config, parse_config, validate, CONFIG_FILE,
};
pub use schema::{InstallerSettings, ProjectConfig, RepoConfig};
