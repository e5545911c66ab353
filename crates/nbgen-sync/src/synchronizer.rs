//! Notebook synchronization.
//!
//! For each unit the synchronizer resolves the source content, computes
//! its fingerprint, and compares it against the fingerprint stored in the
//! existing target notebook. Matching fingerprints mean the target is not
//! rewritten at all; differing (or absent) fingerprints regenerate the
//! cell sequence, carrying over cached execution outputs for code cells
//! whose source did not change.
//!
//! [`Synchronizer::sync_all`] is a fold over every unit: a failing unit
//! is recorded in the [`SyncSummary`] and synchronization continues with
//! the remaining units.

use std::path::PathBuf;

use nbgen_extract::{extract, ExtractionError, Introspector};
use nbgen_notebook::{markdown_to_cells, Cell, Notebook, NotebookError};

use crate::fingerprint::fingerprint;
use crate::registry::{DocUnit, Registry, UnitSource};

/// What happened to a single unit's target notebook.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Source unchanged; the target was not touched.
    Unchanged,
    /// Target written with freshly converted cells.
    Regenerated,
}

/// Error synchronizing one unit.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The unit's source file could not be read.
    #[error("Cannot read source {}: {source}", path.display())]
    Read {
        /// Source path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The target notebook could not be written or serialized.
    #[error("{0}")]
    Notebook(#[from] NotebookError),
    /// Documentation extraction failed for an object-backed unit.
    #[error("{0}")]
    Extraction(#[from] ExtractionError),
    /// An object-backed unit was declared but no introspection data is
    /// configured.
    #[error("Unit references object {object} but no introspection dump is configured")]
    NoIntrospector {
        /// Object reference from the unit declaration.
        object: String,
    },
}

/// Per-unit synchronization report.
#[derive(Debug)]
pub struct UnitReport {
    /// Unit name from the registry.
    pub unit: String,
    /// Outcome or the error that failed this unit.
    pub result: Result<SyncOutcome, SyncError>,
}

/// Accumulated results of a full synchronization pass.
#[derive(Debug, Default)]
pub struct SyncSummary {
    /// Reports in registry order.
    pub reports: Vec<UnitReport>,
}

impl SyncSummary {
    /// Number of units whose target was left untouched.
    #[must_use]
    pub fn unchanged(&self) -> usize {
        self.count(SyncOutcome::Unchanged)
    }

    /// Number of regenerated targets.
    #[must_use]
    pub fn regenerated(&self) -> usize {
        self.count(SyncOutcome::Regenerated)
    }

    fn count(&self, outcome: SyncOutcome) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r.result, Ok(o) if o == outcome))
            .count()
    }

    /// Iterate over failed units with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &SyncError)> {
        self.reports.iter().filter_map(|r| match &r.result {
            Ok(_) => None,
            Err(err) => Some((r.unit.as_str(), err)),
        })
    }

    /// Whether every unit synchronized without error.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Regenerates target notebooks from registry units.
#[derive(Default)]
pub struct Synchronizer {
    introspector: Option<Box<dyn Introspector>>,
}

impl Synchronizer {
    /// Create a synchronizer for markdown-only registries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a synchronizer that can also resolve object-backed units.
    #[must_use]
    pub fn with_introspector(introspector: Box<dyn Introspector>) -> Self {
        Self {
            introspector: Some(introspector),
        }
    }

    /// Synchronize every unit in the registry.
    ///
    /// Never aborts early: a failed unit is recorded and the pass
    /// continues, maximizing the number of targets regenerated per run.
    pub fn sync_all(&self, registry: &Registry) -> SyncSummary {
        let mut summary = SyncSummary::default();
        for unit in registry.units() {
            let result = self.sync_unit(unit);
            if let Err(err) = &result {
                tracing::warn!(unit = %unit.name, "sync failed: {err}");
            }
            summary.reports.push(UnitReport {
                unit: unit.name.clone(),
                result,
            });
        }
        summary
    }

    /// Synchronize a single unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be resolved or the target
    /// cannot be written. The target is never partially written on a
    /// source resolution failure.
    pub fn sync_unit(&self, unit: &DocUnit) -> Result<SyncOutcome, SyncError> {
        let source_text = self.resolve_source(unit)?;
        let current = fingerprint(&source_text);

        let existing = self.read_existing(unit);
        if let Some(notebook) = &existing {
            if notebook.metadata.source_fingerprint.as_deref() == Some(current.as_str()) {
                tracing::debug!(unit = %unit.name, "source unchanged");
                return Ok(SyncOutcome::Unchanged);
            }
        }

        let mut notebook = Notebook::new(markdown_to_cells(&source_text));
        if let Some(old) = existing {
            // Keep metadata this pipeline does not own (kernel specs etc.)
            // and any still-valid cached outputs.
            notebook.metadata = old.metadata.clone();
            carry_over_outputs(&old, &mut notebook);
        }
        notebook.metadata.source_fingerprint = Some(current);
        notebook.write(&unit.notebook)?;

        tracing::info!(unit = %unit.name, "regenerated {}", unit.notebook.display());
        Ok(SyncOutcome::Regenerated)
    }

    /// Resolve the unit's source into markdown text.
    fn resolve_source(&self, unit: &DocUnit) -> Result<String, SyncError> {
        match &unit.source {
            UnitSource::Markdown(path) => {
                std::fs::read_to_string(path).map_err(|source| SyncError::Read {
                    path: path.clone(),
                    source,
                })
            }
            UnitSource::Object(object_ref) => {
                let introspector =
                    self.introspector
                        .as_deref()
                        .ok_or_else(|| SyncError::NoIntrospector {
                            object: object_ref.clone(),
                        })?;
                let doc = introspector.resolve(object_ref)?;
                Ok(extract(&doc))
            }
        }
    }

    /// Read the existing target if the unit's update policy allows reuse.
    ///
    /// An existing target that cannot be parsed is treated like an
    /// unstamped one: it will be regenerated.
    fn read_existing(&self, unit: &DocUnit) -> Option<Notebook> {
        if !unit.update_existing || !unit.notebook.exists() {
            return None;
        }
        match Notebook::read(&unit.notebook) {
            Ok(notebook) => Some(notebook),
            Err(err) => {
                tracing::warn!(
                    unit = %unit.name,
                    "existing notebook unreadable, regenerating: {err}"
                );
                None
            }
        }
    }
}

/// Carry cached outputs from old code cells to new ones.
///
/// Cells are matched in document order by byte-identical source; a code
/// cell whose source changed gets empty outputs.
fn carry_over_outputs(old: &Notebook, new: &mut Notebook) {
    let old_code: Vec<(&str, &[serde_json::Value])> = old.code_cells().collect();
    let mut next = 0usize;
    for cell in &mut new.cells {
        if let Cell::Code { source, outputs } = cell {
            if let Some(offset) = old_code[next..]
                .iter()
                .position(|(old_source, _)| old_source == source)
            {
                *outputs = old_code[next + offset].1.to_vec();
                next += offset + 1;
            }
        }
    }
}
