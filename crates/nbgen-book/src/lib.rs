//! Book build orchestration.
//!
//! Drives the external book renderer over a fully-synchronized notebook
//! tree and manages the build and deployment directory lifecycle. The
//! renderer is reached only through the [`CommandRunner`] seam, so the
//! sequencing, filtering, and directory logic are testable with canned
//! output instead of a real subprocess.
//!
//! A full HTML build is `clean -> build_html -> deploy_html`; the PDF
//! path is `clean -> build_pdf` (a single-file copy replaces directory
//! deployment). Each phase is independently callable.

mod builder;
mod filter;
mod runner;

pub use builder::{BookBuilder, BuildPhase, MARKER_FILENAME};
pub use filter::LogFilter;
pub use runner::{CommandOutput, CommandRunner, ProcessRunner};

use std::path::PathBuf;

/// Error type for book builds.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// I/O error during directory lifecycle or artifact copy.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The external renderer exited non-zero.
    ///
    /// Carries the unfiltered stderr: routine output is normally
    /// filtered, but real errors must be shown in full.
    #[error("Renderer failed with status {status}:\n{stderr}")]
    Renderer {
        /// Process exit status.
        status: i32,
        /// Complete, unfiltered stderr of the renderer.
        stderr: String,
    },
    /// An expected build artifact was not produced.
    #[error("Expected build artifact missing: {}", .0.display())]
    MissingArtifact(PathBuf),
    /// A configured noise pattern is not a valid regex.
    #[error("Invalid noise pattern: {0}")]
    Pattern(#[from] regex::Error),
}
