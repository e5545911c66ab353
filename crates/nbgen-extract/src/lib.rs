//! Code-object documentation extraction.
//!
//! API-reference units are not backed by a literal markdown file; their
//! documentation is derived from introspection data for a live function or
//! class: `{name, parameters: [(name, type)], docstring}`.
//!
//! The [`Introspector`] trait is the seam to the external introspection
//! interface. The shipped [`JsonDumpIntrospector`] reads a JSON dump of
//! that data keyed by object reference; tests substitute an in-memory
//! implementation.
//!
//! [`extract`] renders an [`ObjectDoc`] through a fixed markdown template,
//! so repeated extraction from unchanged introspection data is
//! byte-identical. An object missing its docstring or signature is an
//! [`ExtractionError`], never silently empty documentation.

mod introspect;
mod template;

pub use introspect::{Introspector, JsonDumpIntrospector};
pub use template::extract;

use serde::Deserialize;

/// Introspected documentation data for one function-like or class-like
/// object.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ObjectDoc {
    /// Object name (e.g., `function_with_gui`).
    pub name: String,
    /// Ordered `(name, type)` parameter pairs.
    pub parameters: Vec<(String, String)>,
    /// Docstring body, markdown-compatible prose.
    pub docstring: String,
}

/// Error type for documentation extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// The object reference is not present in the introspection data.
    #[error("Unknown object reference: {0}")]
    UnknownObject(String),
    /// The object has no docstring.
    #[error("Object {0} has no docstring")]
    MissingDocstring(String),
    /// The object has no usable signature information.
    #[error("Object {object} is missing signature information: {detail}")]
    MissingSignature {
        /// Object reference.
        object: String,
        /// What was missing or malformed.
        detail: String,
    },
    /// The introspection dump could not be read.
    #[error("I/O error reading introspection dump: {0}")]
    Io(#[from] std::io::Error),
    /// The introspection dump is not valid JSON.
    #[error("Invalid introspection dump: {0}")]
    Json(#[from] serde_json::Error),
}
