//! Introspection data sources.

use std::collections::BTreeMap;
use std::path::Path;

use crate::{ExtractionError, ObjectDoc};

/// Source of introspection data for object references.
///
/// Implementations resolve a dotted object reference (e.g.,
/// `fiat_core.function_with_gui`) to its documentation data. The object
/// must carry a name, parameter list, and docstring; anything less is an
/// extraction error.
pub trait Introspector {
    /// Resolve an object reference to its documentation data.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference is unknown or the object lacks a
    /// docstring or signature information.
    fn resolve(&self, object_ref: &str) -> Result<ObjectDoc, ExtractionError>;
}

/// Raw per-object entry as found in the dump, before validation.
///
/// All fields optional so that a missing field is reported as a precise
/// extraction error rather than a generic deserialization failure.
#[derive(Debug, serde::Deserialize)]
struct RawObjectDoc {
    name: Option<String>,
    parameters: Option<Vec<(String, String)>>,
    docstring: Option<String>,
}

impl RawObjectDoc {
    /// Validate the raw entry into an [`ObjectDoc`].
    fn validate(self, object_ref: &str) -> Result<ObjectDoc, ExtractionError> {
        let name = match self.name {
            Some(name) if !name.is_empty() => name,
            _ => {
                return Err(ExtractionError::MissingSignature {
                    object: object_ref.to_owned(),
                    detail: "name is missing".to_owned(),
                })
            }
        };
        let parameters = self
            .parameters
            .ok_or_else(|| ExtractionError::MissingSignature {
                object: object_ref.to_owned(),
                detail: "parameter list is missing".to_owned(),
            })?;
        let docstring = match self.docstring {
            Some(doc) if !doc.trim().is_empty() => doc,
            _ => return Err(ExtractionError::MissingDocstring(object_ref.to_owned())),
        };
        Ok(ObjectDoc {
            name,
            parameters,
            docstring,
        })
    }
}

/// [`Introspector`] backed by a JSON dump file.
///
/// The dump maps object references to `{name, parameters, docstring}`
/// entries, as produced by the external introspection interface.
#[derive(Debug)]
pub struct JsonDumpIntrospector {
    objects: BTreeMap<String, serde_json::Value>,
}

impl JsonDumpIntrospector {
    /// Load a dump from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JSON
    /// object at the top level.
    pub fn load(path: &Path) -> Result<Self, ExtractionError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a dump from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a JSON object at the top level.
    pub fn from_json(content: &str) -> Result<Self, ExtractionError> {
        let objects: BTreeMap<String, serde_json::Value> = serde_json::from_str(content)?;
        Ok(Self { objects })
    }
}

impl Introspector for JsonDumpIntrospector {
    fn resolve(&self, object_ref: &str) -> Result<ObjectDoc, ExtractionError> {
        let value = self
            .objects
            .get(object_ref)
            .ok_or_else(|| ExtractionError::UnknownObject(object_ref.to_owned()))?;
        let raw: RawObjectDoc = serde_json::from_value(value.clone())?;
        raw.validate(object_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = r#"{
        "pkg.documented": {
            "name": "documented",
            "parameters": [["label", "str"], ["count", "int"]],
            "docstring": "Does something useful."
        },
        "pkg.no_doc": {
            "name": "no_doc",
            "parameters": [],
            "docstring": ""
        },
        "pkg.no_params": {
            "name": "no_params",
            "docstring": "Has a docstring but no signature."
        }
    }"#;

    #[test]
    fn test_resolve_documented_object() {
        let introspector = JsonDumpIntrospector::from_json(DUMP).unwrap();
        let doc = introspector.resolve("pkg.documented").unwrap();
        assert_eq!(doc.name, "documented");
        assert_eq!(
            doc.parameters,
            vec![
                ("label".to_owned(), "str".to_owned()),
                ("count".to_owned(), "int".to_owned())
            ]
        );
        assert_eq!(doc.docstring, "Does something useful.");
    }

    #[test]
    fn test_unknown_reference() {
        let introspector = JsonDumpIntrospector::from_json(DUMP).unwrap();
        let err = introspector.resolve("pkg.missing").unwrap_err();
        assert!(matches!(err, ExtractionError::UnknownObject(_)));
    }

    #[test]
    fn test_empty_docstring_is_an_error() {
        let introspector = JsonDumpIntrospector::from_json(DUMP).unwrap();
        let err = introspector.resolve("pkg.no_doc").unwrap_err();
        assert!(matches!(err, ExtractionError::MissingDocstring(_)));
        assert!(err.to_string().contains("pkg.no_doc"));
    }

    #[test]
    fn test_missing_parameters_is_an_error() {
        let introspector = JsonDumpIntrospector::from_json(DUMP).unwrap();
        let err = introspector.resolve("pkg.no_params").unwrap_err();
        assert!(matches!(err, ExtractionError::MissingSignature { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("api.json");
        std::fs::write(&path, DUMP).unwrap();

        let introspector = JsonDumpIntrospector::load(&path).unwrap();
        assert!(introspector.resolve("pkg.documented").is_ok());
    }

    #[test]
    fn test_invalid_dump_json() {
        let err = JsonDumpIntrospector::from_json("not json").unwrap_err();
        assert!(matches!(err, ExtractionError::Json(_)));
    }
}
