//! Verification of persisted temp modules against fresh expectations.
//!
//! Every persisted temp module must have exactly one authoring project and
//! every project exactly one persisted temp module, and each pair must be
//! structurally identical to what generation would produce now. Nothing is
//! repaired here; callers surface the error and ask for regeneration.

use std::collections::HashMap;

use crate::config::COMMON_MANIFEST_NAME;
use crate::error::{MonodepsError, Result};
use crate::manifest::{Manifest, PersistedTempModule};
use crate::project::Project;

use super::GeneratedModules;

/// Compares persisted temp modules with generator output.
pub struct ConsistencyChecker<'a> {
    projects: &'a [Project],
    expected: &'a GeneratedModules,
}

impl<'a> ConsistencyChecker<'a> {
    /// Create a checker for `projects`, whose fresh generation is `expected`.
    pub fn new(projects: &'a [Project], expected: &'a GeneratedModules) -> Self {
        Self { projects, expected }
    }

    /// Validate persisted state.
    ///
    /// Checks run in a fixed order and the first failure is returned:
    /// orphaned files, then missing temp modules, then drift, then the
    /// common-root manifest.
    pub fn check(
        &self,
        persisted: &[PersistedTempModule],
        common_manifest: Option<&Manifest>,
    ) -> Result<()> {
        let by_temp_name: HashMap<&str, &Project> = self
            .projects
            .iter()
            .map(|p| (p.temp_project_name.as_str(), p))
            .collect();

        // A temp module name may appear once; later duplicates are orphans.
        let mut matched: HashMap<&str, &PersistedTempModule> = HashMap::new();
        for module in persisted {
            let name = module.manifest.name.as_str();
            if !by_temp_name.contains_key(name) || matched.contains_key(name) {
                return Err(MonodepsError::OrphanedTempModule {
                    file: module.path.clone(),
                });
            }
            matched.insert(name, module);
        }

        for project in self.projects {
            if !matched.contains_key(project.temp_project_name.as_str()) {
                return Err(MonodepsError::MissingTempModule {
                    project: project.package_name.clone(),
                });
            }
        }

        for project in self.projects {
            let actual = &matched[project.temp_project_name.as_str()].manifest;
            let Some(expected) = self.expected.temp_modules.get(&project.package_name) else {
                return Err(MonodepsError::MissingTempModule {
                    project: project.package_name.clone(),
                });
            };
            check_equal(&project.package_name, expected, actual)?;
        }

        match common_manifest {
            None => Err(MonodepsError::MissingTempModule {
                project: COMMON_MANIFEST_NAME.to_string(),
            }),
            Some(actual) => check_equal(
                COMMON_MANIFEST_NAME,
                &self.expected.common_manifest,
                actual,
            ),
        }
    }
}

fn check_equal(project: &str, expected: &Manifest, actual: &Manifest) -> Result<()> {
    let changes = Manifest::diff(expected, actual);
    if changes.is_empty() {
        return Ok(());
    }

    tracing::debug!("Temp module for {} drifted: {:?}", project, changes);
    Err(MonodepsError::Drift {
        project: project.to_string(),
        expected: Box::new(expected.clone()),
        actual: Box::new(actual.clone()),
        changes,
    })
}
