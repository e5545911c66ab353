//! Documentation registry and notebook synchronization.
//!
//! The [`Registry`] is an ordered, declarative list of documentation
//! units grouped into named sections, loaded from a `registry.toml`
//! manifest. Each unit maps one source (a markdown file or an
//! introspected code object) to one target notebook.
//!
//! The [`Synchronizer`] regenerates a unit's notebook only when the
//! source fingerprint stored in the notebook's metadata no longer matches
//! the current source. An unchanged source never rewrites the target, so
//! manually re-executed output cells and version control stay quiet.
//! Failures are per-unit: one bad unit never stops the rest.

mod fingerprint;
mod registry;
mod synchronizer;

pub use fingerprint::fingerprint;
pub use registry::{DocUnit, Registry, RegistryError, Section, UnitSource};
pub use synchronizer::{SyncError, SyncOutcome, SyncSummary, Synchronizer, UnitReport};
