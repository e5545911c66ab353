//! The build command: synchronize notebooks, then render and deploy.

use std::path::PathBuf;

use clap::Args;
use nbgen_book::{BookBuilder, ProcessRunner};
use nbgen_config::{CliSettings, Config};
use nbgen_extract::JsonDumpIntrospector;
use nbgen_sync::{Registry, SyncSummary, Synchronizer};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the pipeline run.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Build the single consolidated PDF instead of the HTML site.
    #[arg(long)]
    pub(crate) pdf: bool,

    /// Markdown source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover nbgen.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl BuildArgs {
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            source_dir: self.source_dir.clone(),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.info(&format!(
            "Source: {}",
            config.docs_resolved.source_dir.display()
        ));

        // Phase 1: synchronize every declared notebook. The render phase
        // is a strict barrier after this completes.
        let registry = Registry::load(&config.docs_resolved.registry)?;
        let synchronizer = match &config.docs_resolved.api_dump {
            Some(dump) => {
                Synchronizer::with_introspector(Box::new(JsonDumpIntrospector::load(dump)?))
            }
            None => Synchronizer::new(),
        };
        let summary = synchronizer.sync_all(&registry);
        report_sync(output, &summary)?;

        // Phase 2: render and deploy the book.
        let mut builder = BookBuilder::new(
            Box::new(ProcessRunner),
            config.docs_resolved.clone(),
            config.book.clone(),
        );

        let log = if self.pdf {
            let log = builder.build_pdf_book()?;
            output.success(&format!(
                "PDF deployed to {}",
                config
                    .docs_resolved
                    .pdf_deploy_path(&config.book.pdf_name)
                    .display()
            ));
            log
        } else {
            let log = builder.build_site()?;
            output.success(&format!(
                "Site deployed to {}",
                config
                    .docs_resolved
                    .deploy_dir(&config.book.deploy_name)
                    .display()
            ));
            log
        };

        if !log.is_empty() {
            output.info(log.trim_end());
        }
        Ok(())
    }
}

/// Report the synchronization summary.
///
/// Per-unit failures were already tolerated during the pass; here they
/// become the run's failure, before any rendering happens, so a
/// partially-synchronized tree is never published.
fn report_sync(output: &Output, summary: &SyncSummary) -> Result<(), CliError> {
    output.highlight(&format!(
        "Synchronized {} notebook(s): {} regenerated, {} unchanged",
        summary.reports.len(),
        summary.regenerated(),
        summary.unchanged(),
    ));

    let mut failed = 0usize;
    for (unit, err) in summary.failures() {
        failed += 1;
        output.error(&format!("  {unit}: {err}"));
    }
    if failed > 0 {
        return Err(CliError::SyncFailed(failed));
    }
    Ok(())
}
