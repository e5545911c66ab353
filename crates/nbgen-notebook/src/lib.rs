//! Notebook document model and markdown-to-cell conversion.
//!
//! A [`Notebook`] is an ordered sequence of markdown and code cells stored
//! as a JSON document. Code cells may carry cached execution outputs; the
//! document metadata carries the source fingerprint used by the
//! synchronizer's staleness check.
//!
//! [`markdown_to_cells`] converts markdown text into a cell sequence:
//! fenced code blocks become code cells, thematic breaks (`---`) act as
//! cell boundaries, and everything else becomes markdown cells in source
//! order.

mod convert;
mod document;

pub use convert::markdown_to_cells;
pub use document::{Cell, Notebook, NotebookMetadata};

/// Error type for notebook I/O and parsing.
#[derive(Debug, thiserror::Error)]
pub enum NotebookError {
    /// I/O error reading or writing a notebook file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed notebook JSON.
    #[error("Invalid notebook JSON: {0}")]
    Json(#[from] serde_json::Error),
}
