//! Lock file reading and satisfaction analysis.
//!
//! - [`model`] - the recursive lock file structure
//! - [`range`] - npm-style range matching on top of `semver`
//! - [`satisfaction`] - decides between a fast install and a full reinstall

pub mod model;
pub mod range;
pub mod satisfaction;

pub use model::{LockEntry, LockFile};
pub use range::satisfies;
pub use satisfaction::{InstallDecision, SatisfactionAnalyzer, SatisfactionReport, Unsatisfied};
