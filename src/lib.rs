//! Monodeps - shared dependency installation for monorepos.
//!
//! Monodeps installs the external dependencies of every project in a
//! monorepo into one shared folder. Each project is represented there by a
//! synthesized *temp module*; the installer runs once over all of them and
//! a marker file certifies that the installed tree is complete.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - `monodeps.yml` loading, validation and path layout
//! - [`error`] - Error types and result aliases
//! - [`installer`] - Installer processes, provisioning and the install protocol
//! - [`lockfile`] - Lock file model and satisfaction analysis
//! - [`manifest`] - Canonical manifests and their on-disk form
//! - [`orchestrator`] - The `generate`, `install` and `status` workflows
//! - [`project`] - Project discovery
//! - [`temp_modules`] - Temp module generation and consistency checks
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```
//! use monodeps::project::Project;
//! use monodeps::temp_modules::TempModuleGenerator;
//! use std::collections::BTreeMap;
//!
//! let mut deps = BTreeMap::new();
//! deps.insert("@acme/core".to_string(), "^1.0.0".to_string());
//! deps.insert("left-pad".to_string(), "^1.3.0".to_string());
//! let projects = vec![
//!     Project::new("@acme/core", BTreeMap::new(), "@monodeps-temp"),
//!     Project::new("@acme/app", deps, "@monodeps-temp"),
//! ];
//!
//! let generated = TempModuleGenerator::new(&projects, &BTreeMap::new())
//!     .generate()
//!     .unwrap();
//! let app = &generated.temp_modules["@acme/app"];
//! assert_eq!(app.dependencies["@monodeps-temp/core"], "file:../core");
//! assert_eq!(app.dependencies["left-pad"], "^1.3.0");
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod installer;
pub mod lockfile;
pub mod manifest;
pub mod orchestrator;
pub mod project;
pub mod temp_modules;
pub mod ui;

pub use error::{MonodepsError, Result};
