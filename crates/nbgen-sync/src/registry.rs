//! Declarative registry of documentation units.
//!
//! The registry is pure data: an ordered list of sections, each an
//! ordered list of `(source, target notebook)` declarations. It lives in
//! a TOML manifest so adding, removing, or reordering units never touches
//! code:
//!
//! ```toml
//! [[section]]
//! name = "Introduction"
//!
//! [[section.unit]]
//! name = "intro"
//! source = "intro_source.md"
//! notebook = "intro.ipynb"
//!
//! [[section.unit]]
//! name = "function_with_gui"
//! object = "fiat_core.function_with_gui"
//! notebook = "function_with_gui.ipynb"
//! ```
//!
//! Each unit names exactly one of `source` (a markdown file) or `object`
//! (an introspectable code-object reference). Relative paths are resolved
//! against the manifest's directory. `update_existing` defaults to true.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Where a unit's documentation content comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnitSource {
    /// A hand-written markdown file.
    Markdown(PathBuf),
    /// A reference to an introspectable code object.
    Object(String),
}

/// One declared documentation unit: source, target, update policy.
///
/// Declared once in the manifest and never mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocUnit {
    /// Stable unit name, used in reports.
    pub name: String,
    /// Content source.
    pub source: UnitSource,
    /// Target notebook path.
    pub notebook: PathBuf,
    /// Whether regeneration merges with the existing target (fingerprint
    /// check, cached-output carryover) rather than overwriting blindly.
    pub update_existing: bool,
}

/// A named, ordered group of units.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    /// Section name (e.g., "Tutorials").
    pub name: String,
    /// Units in declaration order.
    pub units: Vec<DocUnit>,
}

/// The full ordered registry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Registry {
    /// Sections in declaration order.
    pub sections: Vec<Section>,
}

/// Registry manifest error.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Manifest not found.
    #[error("Registry manifest not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("Registry parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Structurally invalid manifest.
    #[error("Invalid registry: {0}")]
    Invalid(String),
}

/// Raw manifest shape as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
struct RegistryRaw {
    #[serde(default, rename = "section")]
    sections: Vec<SectionRaw>,
}

#[derive(Debug, Deserialize)]
struct SectionRaw {
    name: String,
    #[serde(default, rename = "unit")]
    units: Vec<UnitRaw>,
}

#[derive(Debug, Deserialize)]
struct UnitRaw {
    name: String,
    source: Option<String>,
    object: Option<String>,
    notebook: String,
    update_existing: Option<bool>,
}

impl UnitRaw {
    /// Validate and resolve one unit declaration.
    fn resolve(self, base_dir: &Path) -> Result<DocUnit, RegistryError> {
        let source = match (self.source, self.object) {
            (Some(path), None) => UnitSource::Markdown(base_dir.join(path)),
            (None, Some(object)) => UnitSource::Object(object),
            (Some(_), Some(_)) => {
                return Err(RegistryError::Invalid(format!(
                    "unit {} declares both source and object",
                    self.name
                )))
            }
            (None, None) => {
                return Err(RegistryError::Invalid(format!(
                    "unit {} declares neither source nor object",
                    self.name
                )))
            }
        };
        if self.notebook.is_empty() {
            return Err(RegistryError::Invalid(format!(
                "unit {} has an empty notebook path",
                self.name
            )));
        }
        Ok(DocUnit {
            name: self.name,
            source,
            notebook: base_dir.join(self.notebook),
            update_existing: self.update_existing.unwrap_or(true),
        })
    }
}

impl Registry {
    /// Load the registry from a manifest file.
    ///
    /// Relative paths in the manifest are resolved against the manifest's
    /// own directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest is missing, unreadable, or
    /// structurally invalid.
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        if !path.exists() {
            return Err(RegistryError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let base_dir = path.parent().unwrap_or(Path::new("."));
        Self::from_toml(&content, base_dir)
    }

    /// Parse a registry from manifest text.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or a unit declaration is
    /// invalid.
    pub fn from_toml(content: &str, base_dir: &Path) -> Result<Self, RegistryError> {
        let raw: RegistryRaw = toml::from_str(content)?;
        let mut sections = Vec::with_capacity(raw.sections.len());
        for section in raw.sections {
            let mut units = Vec::with_capacity(section.units.len());
            for unit in section.units {
                units.push(unit.resolve(base_dir)?);
            }
            sections.push(Section {
                name: section.name,
                units,
            });
        }
        Ok(Self { sections })
    }

    /// Iterate over all units in declaration order, across sections.
    pub fn units(&self) -> impl Iterator<Item = &DocUnit> {
        self.sections.iter().flat_map(|section| section.units.iter())
    }

    /// Total number of declared units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.iter().map(|s| s.units.len()).sum()
    }

    /// Whether the registry declares no units at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
[[section]]
name = "Introduction"

[[section.unit]]
name = "intro"
source = "intro_source.md"
notebook = "intro.ipynb"

[[section.unit]]
name = "install"
source = "install_source.md"
notebook = "install.ipynb"
update_existing = false

[[section]]
name = "API"

[[section.unit]]
name = "function_with_gui"
object = "fiat_core.function_with_gui"
notebook = "function_with_gui.ipynb"
"#;

    #[test]
    fn test_parse_manifest() {
        let registry = Registry::from_toml(MANIFEST, Path::new("/docs")).unwrap();
        assert_eq!(registry.sections.len(), 2);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.sections[0].name, "Introduction");
        assert_eq!(registry.sections[1].name, "API");
    }

    #[test]
    fn test_paths_resolved_against_base() {
        let registry = Registry::from_toml(MANIFEST, Path::new("/docs")).unwrap();
        let intro = &registry.sections[0].units[0];
        assert_eq!(
            intro.source,
            UnitSource::Markdown(PathBuf::from("/docs/intro_source.md"))
        );
        assert_eq!(intro.notebook, PathBuf::from("/docs/intro.ipynb"));
    }

    #[test]
    fn test_update_existing_defaults_true() {
        let registry = Registry::from_toml(MANIFEST, Path::new("/docs")).unwrap();
        assert!(registry.sections[0].units[0].update_existing);
        assert!(!registry.sections[0].units[1].update_existing);
    }

    #[test]
    fn test_object_unit() {
        let registry = Registry::from_toml(MANIFEST, Path::new("/docs")).unwrap();
        let api = &registry.sections[1].units[0];
        assert_eq!(
            api.source,
            UnitSource::Object("fiat_core.function_with_gui".to_owned())
        );
    }

    #[test]
    fn test_unit_order_is_declaration_order() {
        let registry = Registry::from_toml(MANIFEST, Path::new("/docs")).unwrap();
        let names: Vec<&str> = registry.units().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["intro", "install", "function_with_gui"]);
    }

    #[test]
    fn test_both_source_and_object_rejected() {
        let manifest = r#"
[[section]]
name = "Bad"

[[section.unit]]
name = "both"
source = "a.md"
object = "pkg.obj"
notebook = "a.ipynb"
"#;
        let err = Registry::from_toml(manifest, Path::new("/docs")).unwrap_err();
        assert!(matches!(err, RegistryError::Invalid(_)));
        assert!(err.to_string().contains("both"));
    }

    #[test]
    fn test_neither_source_nor_object_rejected() {
        let manifest = r#"
[[section]]
name = "Bad"

[[section.unit]]
name = "neither"
notebook = "a.ipynb"
"#;
        let err = Registry::from_toml(manifest, Path::new("/docs")).unwrap_err();
        assert!(matches!(err, RegistryError::Invalid(_)));
    }

    #[test]
    fn test_empty_manifest() {
        let registry = Registry::from_toml("", Path::new("/docs")).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_load_missing_manifest() {
        let err = Registry::load(Path::new("/nonexistent/registry.toml")).unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(_)));
    }

    #[test]
    fn test_load_from_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("registry.toml");
        std::fs::write(&path, MANIFEST).unwrap();

        let registry = Registry::load(&path).unwrap();
        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry.sections[0].units[0].notebook,
            tmp.path().join("intro.ipynb")
        );
    }
}
