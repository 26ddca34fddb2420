//! Command-line interface for monodeps.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, GenerateArgs, InstallArgs, StatusArgs};
pub use commands::{Command, CommandDispatcher, CommandResult};
