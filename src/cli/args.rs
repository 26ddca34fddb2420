//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::installer::CleanMode;
use crate::orchestrator::GenerateOptions;

/// Monodeps - shared dependency installation for monorepos.
#[derive(Debug, Parser)]
#[command(name = "monodeps")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Repository root or any directory below it (overrides current directory)
    #[arg(short, long, global = true, env = "MONODEPS_REPO")]
    pub repo: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Regenerate temp modules from project manifests and reinstall
    Generate(GenerateArgs),

    /// Verify temp modules and bring installed dependencies up to date
    Install(InstallArgs),

    /// Show install state without changing anything
    Status(StatusArgs),
}

/// Arguments for the `generate` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct GenerateArgs {
    /// Keep installed dependencies and skip lock file regeneration
    #[arg(long)]
    pub lazy: bool,

    /// Discard the lock file even if it still satisfies every range
    #[arg(long)]
    pub force: bool,
}

impl GenerateArgs {
    pub fn options(&self) -> GenerateOptions {
        GenerateOptions {
            lazy: self.lazy,
            force: self.force,
        }
    }
}

/// Arguments for the `install` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InstallArgs {
    /// Delete installed dependencies before installing
    #[arg(long)]
    pub clean: bool,

    /// Like --clean, and also clear the per-repo installer cache
    #[arg(long, conflicts_with = "clean")]
    pub full_clean: bool,
}

impl InstallArgs {
    pub fn clean_mode(&self) -> CleanMode {
        if self.full_clean {
            CleanMode::FullClean
        } else if self.clean {
            CleanMode::Clean
        } else {
            CleanMode::None
        }
    }
}

/// Arguments for the `status` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_generate_flags() {
        let cli = Cli::parse_from(["monodeps", "generate", "--lazy", "--force"]);
        match cli.command {
            Commands::Generate(args) => {
                let options = args.options();
                assert!(options.lazy);
                assert!(options.force);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn install_clean_modes() {
        let cli = Cli::parse_from(["monodeps", "install", "--full-clean"]);
        let Commands::Install(args) = cli.command else {
            panic!("expected install");
        };
        assert_eq!(args.clean_mode(), CleanMode::FullClean);

        assert_eq!(InstallArgs::default().clean_mode(), CleanMode::None);
        let clean = InstallArgs {
            clean: true,
            full_clean: false,
        };
        assert_eq!(clean.clean_mode(), CleanMode::Clean);
    }

    #[test]
    fn clean_and_full_clean_conflict() {
        let result = Cli::try_parse_from(["monodeps", "install", "--clean", "--full-clean"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "monodeps", "status", "--json", "--repo", "/repo", "--quiet", "--debug",
        ]);
        assert_eq!(cli.repo, Some(PathBuf::from("/repo")));
        assert!(cli.quiet);
        assert!(cli.debug);
        assert!(matches!(cli.command, Commands::Status(StatusArgs { json: true })));
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["monodeps"]).is_err());
    }
}
