//! Dependency manifests: the canonical model and its on-disk form.

pub mod model;
pub mod store;

pub use model::{Manifest, ManifestChange, SYNTHETIC_VERSION};
pub use store::{
    read_manifest, read_temp_modules, temp_module_folder, temp_module_paths, write_manifest,
    write_temp_modules, PersistedTempModule, MANIFEST_FILE,
};
