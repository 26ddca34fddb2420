//! External installer integration.
//!
//! - [`process`] - process execution and retry
//! - [`tool`] - typed installer subcommands
//! - [`provision`] - pinned installer provisioning
//! - [`marker`] - the install-complete marker
//! - [`disposal`] - background deletion of large trees
//! - [`state_machine`] - the crash-safe install protocol

pub mod disposal;
pub mod marker;
pub mod process;
pub mod provision;
pub mod state_machine;
pub mod tool;

pub use disposal::{DisposalHandle, Disposer, Recycler};
pub use marker::MarkerFile;
pub use process::{
    run_with_retry, CommandResult, Invocation, ProcessRunner, RetryOutcome, RetryPolicy,
    SystemRunner,
};
pub use provision::ToolProvisioner;
pub use state_machine::{
    CleanMode, InstallOptions, InstallReport, InstallState, InstallStateMachine, NewerInput,
};
pub use tool::Installer;
