//! Temp module synthesis and verification.
//!
//! - [`generator`] - builds one temp module per project plus the common-root manifest
//! - [`consistency`] - checks persisted temp modules against a fresh generation

pub mod consistency;
pub mod generator;

pub use consistency::ConsistencyChecker;
pub use generator::{GeneratedModules, TempModuleGenerator};
