//! Error types for monodeps operations.
//!
//! This module defines [`MonodepsError`], the primary error type used
//! throughout the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Consistency failures (orphaned, missing, drifted temp modules) are fatal
//!   and are never repaired automatically; the operator re-runs `generate`
//! - Installer failures leave the marker file absent so the next run starts
//!   from a known-dirty state
//! - Use `anyhow::Error` (via `MonodepsError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

use crate::manifest::{Manifest, ManifestChange};

/// Core error type for monodeps operations.
#[derive(Debug, Error)]
pub enum MonodepsError {
    /// Repository configuration not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse a configuration input.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigError { message: String },

    /// A persisted manifest or lock file could not be read.
    #[error("Failed to parse manifest at {path}: {message}")]
    ManifestParse { path: PathBuf, message: String },

    /// A temp module exists on disk that no project authored.
    #[error("Orphaned temp module {file} has no matching project")]
    OrphanedTempModule { file: PathBuf },

    /// A project has no persisted temp module.
    #[error("Project '{project}' has no temp module")]
    MissingTempModule { project: String },

    /// A persisted temp module differs from what would be generated now.
    #[error("Temp module for '{project}' is out of date ({} change(s))", changes.len())]
    Drift {
        project: String,
        expected: Box<Manifest>,
        actual: Box<Manifest>,
        changes: Vec<ManifestChange>,
    },

    /// The installer kept failing until the retry policy was exhausted.
    #[error("Installer command failed after {attempts} attempt(s) (exit code {code:?}): {command}")]
    InstallerFailure {
        command: String,
        attempts: u32,
        code: Option<i32>,
    },

    /// The pinned installer tool could not be materialized.
    #[error("Failed to provision {tool}@{version}: {message}")]
    ToolProvisioning {
        tool: String,
        version: String,
        message: String,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MonodepsError {
    /// Whether the operator must re-run `monodeps generate` to recover.
    pub fn requires_regeneration(&self) -> bool {
        matches!(
            self,
            Self::OrphanedTempModule { .. } | Self::MissingTempModule { .. } | Self::Drift { .. }
        )
    }
}

/// Result type alias for monodeps operations.
pub type Result<T> = std::result::Result<T, MonodepsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_not_found_displays_path() {
        let err = MonodepsError::ConfigNotFound {
            path: PathBuf::from("/repo/monodeps.yml"),
        };
        assert!(err.to_string().contains("/repo/monodeps.yml"));
    }

    #[test]
    fn config_error_displays_message() {
        let err = MonodepsError::ConfigError {
            message: "duplicate temp project name".into(),
        };
        assert!(err.to_string().contains("duplicate temp project name"));
    }

    #[test]
    fn orphaned_temp_module_names_file() {
        let err = MonodepsError::OrphanedTempModule {
            file: PathBuf::from("temp_modules/gone/package.json"),
        };
        assert!(err.to_string().contains("temp_modules/gone/package.json"));
        assert!(err.requires_regeneration());
    }

    #[test]
    fn missing_temp_module_names_project() {
        let err = MonodepsError::MissingTempModule {
            project: "@acme/widgets".into(),
        };
        assert!(err.to_string().contains("@acme/widgets"));
        assert!(err.requires_regeneration());
    }

    #[test]
    fn drift_counts_changes() {
        let expected = Manifest::new("@monodeps-temp/a");
        let mut actual = expected.clone();
        actual
            .dependencies
            .insert("left-pad".into(), "^1.0.0".into());
        let changes = Manifest::diff(&expected, &actual);
        let err = MonodepsError::Drift {
            project: "a".into(),
            expected: Box::new(expected),
            actual: Box::new(actual),
            changes,
        };
        let msg = err.to_string();
        assert!(msg.contains("'a'"));
        assert!(msg.contains("1 change(s)"));
    }

    #[test]
    fn installer_failure_displays_attempts_and_code() {
        let err = MonodepsError::InstallerFailure {
            command: "npm install".into(),
            attempts: 5,
            code: Some(1),
        };
        let msg = err.to_string();
        assert!(msg.contains("npm install"));
        assert!(msg.contains("5 attempt(s)"));
        assert!(!err.requires_regeneration());
    }

    #[test]
    fn tool_provisioning_displays_tool_and_version() {
        let err = MonodepsError::ToolProvisioning {
            tool: "npm".into(),
            version: "4.5.0".into(),
            message: "bootstrap failed".into(),
        };
        assert!(err.to_string().contains("npm@4.5.0"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: MonodepsError = io_err.into();
        assert!(matches!(err, MonodepsError::Io(_)));
    }
}
