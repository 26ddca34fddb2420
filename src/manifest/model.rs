//! Canonical manifest representation.
//!
//! A [`Manifest`] serializes with a fixed field order and sorted dependency
//! keys, so two equal manifests always produce byte-identical JSON. Drift
//! detection compares manifests field by field through [`Manifest::diff`]
//! instead of comparing raw JSON.

use serde::{Deserialize, Serialize};
use similar::TextDiff;
use std::collections::BTreeMap;
use std::fmt;

/// Version written into every synthesized manifest.
pub const SYNTHETIC_VERSION: &str = "0.0.0";

/// A dependency manifest (`package.json` subset).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub name: String,

    pub version: String,

    #[serde(default)]
    pub private: bool,

    /// Dependency name to version range or local reference.
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
}

/// One structural difference between an expected and an actual manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestChange {
    /// A scalar field differs.
    Field {
        field: &'static str,
        expected: String,
        actual: String,
    },

    /// The actual manifest has a dependency the expected one lacks.
    DependencyAdded { name: String, range: String },

    /// The actual manifest lacks a dependency the expected one has.
    DependencyRemoved { name: String, range: String },

    /// Both declare the dependency with different ranges.
    DependencyChanged {
        name: String,
        expected: String,
        actual: String,
    },
}

impl fmt::Display for ManifestChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field {
                field,
                expected,
                actual,
            } => write!(f, "{}: expected {}, found {}", field, expected, actual),
            Self::DependencyAdded { name, range } => {
                write!(f, "unexpected dependency {}@{}", name, range)
            }
            Self::DependencyRemoved { name, range } => {
                write!(f, "missing dependency {}@{}", name, range)
            }
            Self::DependencyChanged {
                name,
                expected,
                actual,
            } => write!(f, "dependency {}: expected {}, found {}", name, expected, actual),
        }
    }
}

impl Manifest {
    /// Create an empty private manifest with the synthetic version.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: SYNTHETIC_VERSION.to_string(),
            private: true,
            dependencies: BTreeMap::new(),
        }
    }

    /// Create a temp module manifest with the given dependencies.
    pub fn temp_module(name: impl Into<String>, dependencies: BTreeMap<String, String>) -> Self {
        Self {
            dependencies,
            ..Self::new(name)
        }
    }

    /// Serialize to the canonical on-disk form (pretty JSON plus newline).
    pub fn to_canonical_json(&self) -> String {
        // Serializing a struct of strings and a BTreeMap cannot fail.
        let mut json = serde_json::to_string_pretty(self).unwrap_or_default();
        json.push('\n');
        json
    }

    /// Parse a manifest from JSON.
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Structural differences from `expected` to `actual`.
    ///
    /// Returns an empty list exactly when the manifests are equal.
    pub fn diff(expected: &Manifest, actual: &Manifest) -> Vec<ManifestChange> {
        let mut changes = Vec::new();

        if expected.name != actual.name {
            changes.push(ManifestChange::Field {
                field: "name",
                expected: expected.name.clone(),
                actual: actual.name.clone(),
            });
        }
        if expected.version != actual.version {
            changes.push(ManifestChange::Field {
                field: "version",
                expected: expected.version.clone(),
                actual: actual.version.clone(),
            });
        }
        if expected.private != actual.private {
            changes.push(ManifestChange::Field {
                field: "private",
                expected: expected.private.to_string(),
                actual: actual.private.to_string(),
            });
        }

        for (name, range) in &expected.dependencies {
            match actual.dependencies.get(name) {
                None => changes.push(ManifestChange::DependencyRemoved {
                    name: name.clone(),
                    range: range.clone(),
                }),
                Some(found) if found != range => {
                    changes.push(ManifestChange::DependencyChanged {
                        name: name.clone(),
                        expected: range.clone(),
                        actual: found.clone(),
                    })
                }
                Some(_) => {}
            }
        }
        for (name, range) in &actual.dependencies {
            if !expected.dependencies.contains_key(name) {
                changes.push(ManifestChange::DependencyAdded {
                    name: name.clone(),
                    range: range.clone(),
                });
            }
        }

        changes
    }

    /// Unified line diff of the canonical forms, for diagnostics.
    pub fn render_diff(expected: &Manifest, actual: &Manifest) -> String {
        let expected_json = expected.to_canonical_json();
        let actual_json = actual.to_canonical_json();
        let diff = TextDiff::from_lines(&expected_json, &actual_json);
        let rendered = diff
            .unified_diff()
            .context_radius(2)
            .header("expected", "actual")
            .to_string();
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widgets() -> Manifest {
        let mut deps = BTreeMap::new();
        deps.insert("left-pad".to_string(), "^1.0.0".to_string());
        deps.insert(
            "@monodeps-temp/core".to_string(),
            "file:../core".to_string(),
        );
        Manifest::temp_module("@monodeps-temp/widgets", deps)
    }

    #[test]
    fn new_manifest_is_private_and_synthetic() {
        let m = Manifest::new("x");
        assert!(m.private);
        assert_eq!(m.version, SYNTHETIC_VERSION);
        assert!(m.dependencies.is_empty());
    }

    #[test]
    fn canonical_json_has_stable_order() {
        insta::assert_snapshot!(widgets().to_canonical_json().trim_end(), @r#"
        {
          "name": "@monodeps-temp/widgets",
          "version": "0.0.0",
          "private": true,
          "dependencies": {
            "@monodeps-temp/core": "file:../core",
            "left-pad": "^1.0.0"
          }
        }
        "#);
    }

    #[test]
    fn canonical_json_ends_with_newline() {
        assert!(widgets().to_canonical_json().ends_with("}\n"));
    }

    #[test]
    fn from_json_accepts_missing_optional_fields() {
        let m = Manifest::from_json(r#"{"name": "a", "version": "1.0.0"}"#).unwrap();
        assert!(!m.private);
        assert!(m.dependencies.is_empty());
    }

    #[test]
    fn from_json_ignores_unknown_fields() {
        let m = Manifest::from_json(
            r#"{"name": "a", "version": "1.0.0", "scripts": {"build": "tsc"}}"#,
        )
        .unwrap();
        assert_eq!(m.name, "a");
    }

    #[test]
    fn diff_of_equal_manifests_is_empty() {
        assert!(Manifest::diff(&widgets(), &widgets()).is_empty());
    }

    #[test]
    fn diff_reports_changed_dependency() {
        let mut actual = widgets();
        actual
            .dependencies
            .insert("left-pad".to_string(), "^1.1.0".to_string());

        let changes = Manifest::diff(&widgets(), &actual);
        assert_eq!(
            changes,
            vec![ManifestChange::DependencyChanged {
                name: "left-pad".to_string(),
                expected: "^1.0.0".to_string(),
                actual: "^1.1.0".to_string(),
            }]
        );
    }

    #[test]
    fn diff_reports_added_and_removed_dependencies() {
        let mut actual = widgets();
        actual.dependencies.remove("left-pad");
        actual
            .dependencies
            .insert("right-pad".to_string(), "~2.0.0".to_string());

        let changes = Manifest::diff(&widgets(), &actual);
        assert!(changes.contains(&ManifestChange::DependencyRemoved {
            name: "left-pad".to_string(),
            range: "^1.0.0".to_string(),
        }));
        assert!(changes.contains(&ManifestChange::DependencyAdded {
            name: "right-pad".to_string(),
            range: "~2.0.0".to_string(),
        }));
    }

    #[test]
    fn diff_reports_field_changes() {
        let mut actual = widgets();
        actual.private = false;
        actual.version = "1.0.0".to_string();

        let changes = Manifest::diff(&widgets(), &actual);
        assert_eq!(changes.len(), 2);
        assert!(changes
            .iter()
            .all(|c| matches!(c, ManifestChange::Field { .. })));
    }

    #[test]
    fn change_display_is_readable() {
        let change = ManifestChange::DependencyChanged {
            name: "left-pad".to_string(),
            expected: "^1.0.0".to_string(),
            actual: "^1.1.0".to_string(),
        };
        assert_eq!(
            change.to_string(),
            "dependency left-pad: expected ^1.0.0, found ^1.1.0"
        );
    }

    #[test]
    fn render_diff_marks_changed_lines() {
        let mut actual = widgets();
        actual
            .dependencies
            .insert("left-pad".to_string(), "^1.1.0".to_string());

        let rendered = Manifest::render_diff(&widgets(), &actual);
        assert!(rendered.contains("-    \"left-pad\": \"^1.0.0\""));
        assert!(rendered.contains("+    \"left-pad\": \"^1.1.0\""));
    }
}
