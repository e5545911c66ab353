//! Notebook file format.
//!
//! On disk a notebook is a JSON document:
//!
//! ```json
//! {
//!   "cells": [
//!     { "type": "markdown", "text": "# Title" },
//!     { "type": "code", "source": "print(1)", "outputs": [] }
//!   ],
//!   "metadata": { "source_fingerprint": "ab12..." }
//! }
//! ```
//!
//! Unknown metadata keys are preserved across read/write so externally
//! added metadata (kernel specs, language info) survives regeneration.
//! Serialization is pretty-printed with a trailing newline so "unchanged
//! source" is well-defined at the byte level.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::NotebookError;

/// A single notebook cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Cell {
    /// Prose cell holding markdown text.
    Markdown {
        /// Markdown source of the cell.
        text: String,
    },
    /// Executable cell with optionally cached outputs.
    Code {
        /// Code source, verbatim from the fenced block.
        source: String,
        /// Cached execution outputs; empty for never-executed cells.
        #[serde(default)]
        outputs: Vec<serde_json::Value>,
    },
}

impl Cell {
    /// Create a markdown cell.
    #[must_use]
    pub fn markdown(text: impl Into<String>) -> Self {
        Self::Markdown { text: text.into() }
    }

    /// Create a code cell with no cached outputs.
    #[must_use]
    pub fn code(source: impl Into<String>) -> Self {
        Self::Code {
            source: source.into(),
            outputs: Vec::new(),
        }
    }
}

/// Notebook-level metadata.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NotebookMetadata {
    /// Digest of the normalized source this notebook was generated from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_fingerprint: Option<String>,

    /// Passthrough for metadata keys this pipeline does not own.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// An ordered cell document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    /// Cells in source order.
    pub cells: Vec<Cell>,
    /// Notebook-level metadata.
    #[serde(default)]
    pub metadata: NotebookMetadata,
}

impl Notebook {
    /// Create a notebook from cells, with empty metadata.
    #[must_use]
    pub fn new(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            metadata: NotebookMetadata::default(),
        }
    }

    /// Read a notebook from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid
    /// notebook JSON.
    pub fn read(path: &Path) -> Result<Self, NotebookError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write the notebook to a JSON file, overwriting any prior content.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn write(&self, path: &Path) -> Result<(), NotebookError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Serialize to the canonical on-disk representation.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn to_json(&self) -> Result<String, NotebookError> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Iterate over code cells in document order.
    pub fn code_cells(&self) -> impl Iterator<Item = (&str, &[serde_json::Value])> {
        self.cells.iter().filter_map(|cell| match cell {
            Cell::Code { source, outputs } => Some((source.as_str(), outputs.as_slice())),
            Cell::Markdown { .. } => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("doc.ipynb");

        let mut notebook = Notebook::new(vec![
            Cell::markdown("# Title"),
            Cell::code("print(\"hi\")"),
        ]);
        notebook.metadata.source_fingerprint = Some("abc123".to_owned());

        notebook.write(&path).unwrap();
        let read = Notebook::read(&path).unwrap();
        assert_eq!(read, notebook);
    }

    #[test]
    fn test_serialized_cell_shape() {
        let notebook = Notebook::new(vec![Cell::markdown("text"), Cell::code("x = 1")]);
        let json: serde_json::Value = serde_json::from_str(&notebook.to_json().unwrap()).unwrap();

        assert_eq!(json["cells"][0]["type"], "markdown");
        assert_eq!(json["cells"][0]["text"], "text");
        assert_eq!(json["cells"][1]["type"], "code");
        assert_eq!(json["cells"][1]["source"], "x = 1");
        assert_eq!(json["cells"][1]["outputs"], serde_json::json!([]));
    }

    #[test]
    fn test_to_json_has_trailing_newline() {
        let notebook = Notebook::new(vec![]);
        assert!(notebook.to_json().unwrap().ends_with('\n'));
    }

    #[test]
    fn test_metadata_extra_keys_preserved() {
        let json = r#"{
            "cells": [],
            "metadata": {
                "source_fingerprint": "ff00",
                "kernelspec": { "name": "python3" }
            }
        }"#;
        let notebook: Notebook = serde_json::from_str(json).unwrap();
        assert_eq!(
            notebook.metadata.source_fingerprint.as_deref(),
            Some("ff00")
        );
        assert_eq!(
            notebook.metadata.extra["kernelspec"]["name"],
            serde_json::json!("python3")
        );

        // Extra keys survive re-serialization
        let out = notebook.to_json().unwrap();
        assert!(out.contains("kernelspec"));
    }

    #[test]
    fn test_missing_metadata_defaults() {
        let json = r#"{ "cells": [] }"#;
        let notebook: Notebook = serde_json::from_str(json).unwrap();
        assert!(notebook.metadata.source_fingerprint.is_none());
        assert!(notebook.metadata.extra.is_empty());
    }

    #[test]
    fn test_code_cells_iterator() {
        let notebook = Notebook::new(vec![
            Cell::markdown("a"),
            Cell::code("one"),
            Cell::markdown("b"),
            Cell::code("two"),
        ]);
        let sources: Vec<&str> = notebook.code_cells().map(|(src, _)| src).collect();
        assert_eq!(sources, vec!["one", "two"]);
    }
}
