//! Temp module synthesis.
//!
//! For every project the generator produces a private manifest named after
//! the project's temp project name. Dependencies on other projects of the
//! monorepo are rewritten into `file:` references to the sibling temp module,
//! while external ranges are kept verbatim. The common-root manifest depends
//! on every temp module plus the pinned versions.
//!
//! Generation is a pure function of its inputs: the manifests are ordered
//! maps, so the same projects always produce byte-identical output.

use std::collections::{BTreeMap, HashMap};

use crate::config::{COMMON_MANIFEST_NAME, TEMP_MODULES_FOLDER};
use crate::error::{MonodepsError, Result};
use crate::manifest::{temp_module_folder, Manifest};
use crate::project::Project;

/// Output of a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedModules {
    /// Temp module per project, keyed by package name.
    pub temp_modules: BTreeMap<String, Manifest>,

    /// Manifest at the common root.
    pub common_manifest: Manifest,
}

/// Builds temp modules from the monorepo's projects.
pub struct TempModuleGenerator<'a> {
    projects: &'a [Project],
    pinned_versions: &'a BTreeMap<String, String>,
}

impl<'a> TempModuleGenerator<'a> {
    /// Create a generator over `projects` with common-root `pinned_versions`.
    pub fn new(projects: &'a [Project], pinned_versions: &'a BTreeMap<String, String>) -> Self {
        Self {
            projects,
            pinned_versions,
        }
    }

    /// Generate every temp module and the common-root manifest.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when two projects share a package name or a
    /// temp project name, or when a pinned version names a temp project.
    pub fn generate(&self) -> Result<GeneratedModules> {
        let by_package = self.index_projects()?;

        let mut temp_modules = BTreeMap::new();
        for project in self.projects {
            let dependencies = project
                .declared_dependencies
                .iter()
                .map(|(name, range)| match by_package.get(name.as_str()) {
                    Some(local) => (
                        local.temp_project_name.clone(),
                        format!("file:../{}", temp_module_folder(&local.temp_project_name)),
                    ),
                    None => (name.clone(), range.clone()),
                })
                .collect();

            temp_modules.insert(
                project.package_name.clone(),
                Manifest::temp_module(project.temp_project_name.clone(), dependencies),
            );
        }

        let mut common_manifest = Manifest::new(COMMON_MANIFEST_NAME);
        for project in self.projects {
            common_manifest.dependencies.insert(
                project.temp_project_name.clone(),
                format!(
                    "file:./{}/{}",
                    TEMP_MODULES_FOLDER,
                    temp_module_folder(&project.temp_project_name)
                ),
            );
        }
        for (name, version) in self.pinned_versions {
            common_manifest
                .dependencies
                .insert(name.clone(), version.clone());
        }

        tracing::debug!(
            "Generated {} temp module(s), {} pinned version(s)",
            temp_modules.len(),
            self.pinned_versions.len()
        );

        Ok(GeneratedModules {
            temp_modules,
            common_manifest,
        })
    }

    fn index_projects(&self) -> Result<HashMap<&'a str, &'a Project>> {
        let mut by_package = HashMap::new();
        let mut by_temp_name: HashMap<&str, &str> = HashMap::new();
        let mut by_folder: HashMap<&str, &str> = HashMap::new();

        for project in self.projects {
            if by_package
                .insert(project.package_name.as_str(), project)
                .is_some()
            {
                return Err(collision(format!(
                    "package name '{}' is used by more than one project",
                    project.package_name
                )));
            }
            if let Some(other) =
                by_temp_name.insert(&project.temp_project_name, &project.package_name)
            {
                return Err(collision(format!(
                    "projects '{}' and '{}' both map to temp project '{}'",
                    other, project.package_name, project.temp_project_name
                )));
            }
            let folder = temp_module_folder(&project.temp_project_name);
            if let Some(other) = by_folder.insert(folder, &project.package_name) {
                return Err(collision(format!(
                    "projects '{}' and '{}' both map to temp module folder '{}'",
                    other, project.package_name, folder
                )));
            }
        }

        for name in self.pinned_versions.keys() {
            if by_temp_name.contains_key(name.as_str()) {
                return Err(collision(format!(
                    "pinned version '{}' collides with a temp project name",
                    name
                )));
            }
        }

        Ok(by_package)
    }
}

fn collision(message: String) -> MonodepsError {
    MonodepsError::ConfigError { message }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCOPE: &str = "@monodeps-temp";

    fn deps(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn sample_projects() -> Vec<Project> {
        vec![
            Project::new(
                "@acme/widgets",
                deps(&[("@acme/core", "^1.0.0"), ("left-pad", "^1.0.0")]),
                SCOPE,
            ),
            Project::new("@acme/core", deps(&[("lodash", "~4.17.0")]), SCOPE),
        ]
    }

    #[test]
    fn rewrites_intra_repo_references() {
        let projects = sample_projects();
        let pinned = BTreeMap::new();
        let out = TempModuleGenerator::new(&projects, &pinned)
            .generate()
            .unwrap();

        let widgets = &out.temp_modules["@acme/widgets"];
        assert_eq!(widgets.name, "@monodeps-temp/widgets");
        assert_eq!(
            widgets.dependencies,
            deps(&[
                ("@monodeps-temp/core", "file:../core"),
                ("left-pad", "^1.0.0")
            ])
        );
        assert!(widgets.private);
        assert_eq!(widgets.version, "0.0.0");
    }

    #[test]
    fn keeps_external_ranges_verbatim() {
        let projects = sample_projects();
        let pinned = BTreeMap::new();
        let out = TempModuleGenerator::new(&projects, &pinned)
            .generate()
            .unwrap();

        assert_eq!(
            out.temp_modules["@acme/core"].dependencies,
            deps(&[("lodash", "~4.17.0")])
        );
    }

    #[test]
    fn common_manifest_lists_temp_modules_and_pins() {
        let projects = sample_projects();
        let pinned = deps(&[("typescript", "2.1.0")]);
        let out = TempModuleGenerator::new(&projects, &pinned)
            .generate()
            .unwrap();

        assert_eq!(out.common_manifest.name, COMMON_MANIFEST_NAME);
        assert_eq!(
            out.common_manifest.dependencies,
            deps(&[
                ("@monodeps-temp/core", "file:./temp_modules/core"),
                ("@monodeps-temp/widgets", "file:./temp_modules/widgets"),
                ("typescript", "2.1.0"),
            ])
        );
    }

    #[test]
    fn pinned_versions_stay_out_of_temp_modules() {
        let projects = sample_projects();
        let pinned = deps(&[("left-pad", "1.1.3")]);
        let out = TempModuleGenerator::new(&projects, &pinned)
            .generate()
            .unwrap();

        assert_eq!(
            out.temp_modules["@acme/widgets"].dependencies["left-pad"],
            "^1.0.0"
        );
        assert_eq!(out.common_manifest.dependencies["left-pad"], "1.1.3");
    }

    #[test]
    fn generation_is_deterministic() {
        let projects = sample_projects();
        let pinned = deps(&[("typescript", "2.1.0")]);
        let first = TempModuleGenerator::new(&projects, &pinned)
            .generate()
            .unwrap();
        let second = TempModuleGenerator::new(&projects, &pinned)
            .generate()
            .unwrap();

        assert_eq!(first, second);
        for (key, manifest) in &first.temp_modules {
            assert_eq!(
                manifest.to_canonical_json(),
                second.temp_modules[key].to_canonical_json()
            );
        }
        assert_eq!(
            first.common_manifest.to_canonical_json(),
            second.common_manifest.to_canonical_json()
        );
    }

    #[test]
    fn project_order_does_not_change_output() {
        let mut projects = sample_projects();
        let pinned = BTreeMap::new();
        let forward = TempModuleGenerator::new(&projects, &pinned)
            .generate()
            .unwrap();
        projects.reverse();
        let reversed = TempModuleGenerator::new(&projects, &pinned)
            .generate()
            .unwrap();

        assert_eq!(forward, reversed);
    }

    #[test]
    fn duplicate_temp_project_name_is_config_error() {
        // Same unscoped name under different scopes.
        let projects = vec![
            Project::new("@acme/utils", BTreeMap::new(), SCOPE),
            Project::new("@other/utils", BTreeMap::new(), SCOPE),
        ];
        let pinned = BTreeMap::new();
        let err = TempModuleGenerator::new(&projects, &pinned)
            .generate()
            .unwrap_err();

        assert!(matches!(err, MonodepsError::ConfigError { .. }));
        assert!(err.to_string().contains("@monodeps-temp/utils"));
    }

    #[test]
    fn pinned_version_colliding_with_temp_name_is_config_error() {
        let projects = sample_projects();
        let pinned = deps(&[("@monodeps-temp/core", "1.0.0")]);
        let err = TempModuleGenerator::new(&projects, &pinned)
            .generate()
            .unwrap_err();

        assert!(matches!(err, MonodepsError::ConfigError { .. }));
    }
}
