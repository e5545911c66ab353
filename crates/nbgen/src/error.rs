//! CLI error types.

use nbgen_book::BuildError;
use nbgen_config::ConfigError;
use nbgen_extract::ExtractionError;
use nbgen_sync::RegistryError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Registry(#[from] RegistryError),

    #[error("{0}")]
    Extraction(#[from] ExtractionError),

    #[error("{0}")]
    Build(#[from] BuildError),

    #[error("{0} unit(s) failed to synchronize")]
    SyncFailed(usize),
}
