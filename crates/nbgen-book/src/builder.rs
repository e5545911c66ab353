//! Build phase sequencing and directory lifecycle.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::Path;

use nbgen_config::{BookConfig, DocsConfig};

use crate::filter::LogFilter;
use crate::runner::CommandRunner;
use crate::BuildError;

/// Marker file written into the deployment directory so static-hosting
/// providers serve it verbatim.
pub const MARKER_FILENAME: &str = ".nojekyll";

/// Current phase of a build invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildPhase {
    /// No build in progress.
    Idle,
    /// Removing the prior build output directory.
    Cleaning,
    /// Renderer subprocess running.
    Building,
    /// Copying artifacts to the deployment directory.
    Deploying,
    /// The last phase failed; terminal for this invocation.
    Failed,
}

/// Orchestrates the external book renderer and the build/deployment
/// directory lifecycle.
///
/// Each phase is independently callable; the usual sequences are
/// [`build_site`](Self::build_site) for the HTML path and
/// [`build_pdf_book`](Self::build_pdf_book) for the PDF path. The
/// renderer must observe a fully-synchronized notebook tree, so callers
/// run synchronization to completion before invoking any build phase.
pub struct BookBuilder {
    runner: Box<dyn CommandRunner>,
    docs: DocsConfig,
    book: BookConfig,
    phase: BuildPhase,
}

impl BookBuilder {
    /// Create a builder over a command runner and resolved configuration.
    #[must_use]
    pub fn new(runner: Box<dyn CommandRunner>, docs: DocsConfig, book: BookConfig) -> Self {
        Self {
            runner,
            docs,
            book,
            phase: BuildPhase::Idle,
        }
    }

    /// Current build phase.
    #[must_use]
    pub fn phase(&self) -> BuildPhase {
        self.phase
    }

    fn enter(&mut self, phase: BuildPhase) {
        tracing::debug!("build phase: {:?} -> {phase:?}", self.phase);
        self.phase = phase;
    }

    /// Record phase completion, mapping errors to the `Failed` state.
    fn finish<T>(&mut self, result: Result<T, BuildError>) -> Result<T, BuildError> {
        self.enter(match result {
            Ok(_) => BuildPhase::Idle,
            Err(_) => BuildPhase::Failed,
        });
        result
    }

    /// Remove the prior build output directory.
    ///
    /// Absence of a prior directory is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing directory cannot be removed.
    pub fn clean(&mut self) -> Result<(), BuildError> {
        self.enter(BuildPhase::Cleaning);
        let build_dir = self.docs.build_dir();
        let result = if build_dir.exists() {
            tracing::info!("removing {}", build_dir.display());
            fs::remove_dir_all(&build_dir).map_err(BuildError::from)
        } else {
            Ok(())
        };
        self.finish(result)
    }

    /// Run the multi-page HTML renderer over the documentation root.
    ///
    /// Returns the build log with configured noise lines filtered out.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Renderer`] with the unfiltered stderr if the
    /// renderer exits non-zero.
    pub fn build_html(&mut self) -> Result<String, BuildError> {
        self.enter(BuildPhase::Building);
        let result = self.run_renderer(&[]);
        self.finish(result)
    }

    /// Run the renderer in single-document mode and deploy the PDF.
    ///
    /// On success the produced document is copied to the fixed deployment
    /// path, overwriting any prior version. No directory deployment
    /// happens on this path.
    ///
    /// # Errors
    ///
    /// Returns an error if the renderer fails or the expected PDF was not
    /// produced.
    pub fn build_pdf(&mut self) -> Result<String, BuildError> {
        self.enter(BuildPhase::Building);
        let result = self
            .run_renderer(&["--builder", "pdfhtml"])
            .and_then(|log| {
                self.deploy_pdf()?;
                Ok(log)
            });
        self.finish(result)
    }

    /// Copy the rendered HTML tree into the deployment directory.
    ///
    /// The deployment directory is cleared first so it can never mix
    /// artifacts from two builds; the static-hosting marker is written
    /// after the copy so the copy cannot delete it.
    ///
    /// # Errors
    ///
    /// Returns an error if the rendered tree is missing or a filesystem
    /// operation fails.
    pub fn deploy_html(&mut self) -> Result<(), BuildError> {
        self.enter(BuildPhase::Deploying);
        let result = self.deploy_html_inner();
        self.finish(result)
    }

    /// Full HTML path: clean, build, deploy. Returns the filtered log.
    ///
    /// # Errors
    ///
    /// Returns the first phase error; a renderer failure aborts before
    /// any deployment copy, so a failed build never overwrites a
    /// previously-good deployment.
    pub fn build_site(&mut self) -> Result<String, BuildError> {
        self.clean()?;
        let log = self.build_html()?;
        self.deploy_html()?;
        Ok(log)
    }

    /// Full PDF path: clean, build, copy. Returns the filtered log.
    ///
    /// # Errors
    ///
    /// Returns the first phase error.
    pub fn build_pdf_book(&mut self) -> Result<String, BuildError> {
        self.clean()?;
        self.build_pdf()
    }

    /// Invoke the renderer and filter its combined output.
    fn run_renderer(&self, extra_args: &[&str]) -> Result<String, BuildError> {
        let mut args: Vec<&OsStr> = vec![OsStr::new("build"), self.docs.source_dir.as_os_str()];
        args.extend(extra_args.iter().map(OsStr::new));

        let output = self.runner.run(&self.book.command, &args)?;
        if !output.success() {
            return Err(BuildError::Renderer {
                status: output.status,
                stderr: output.stderr,
            });
        }

        let filter = LogFilter::new(&self.book.noise_patterns)?;
        Ok(filter.filter(&output.combined()))
    }

    fn deploy_html_inner(&self) -> Result<(), BuildError> {
        let html_dir = self.docs.html_build_dir();
        if !html_dir.is_dir() {
            return Err(BuildError::MissingArtifact(html_dir));
        }

        let deploy_dir = self.docs.deploy_dir(&self.book.deploy_name);
        if deploy_dir.exists() {
            fs::remove_dir_all(&deploy_dir)?;
        }
        copy_tree(&html_dir, &deploy_dir)?;
        fs::write(deploy_dir.join(MARKER_FILENAME), "")?;

        tracing::info!("deployed HTML to {}", deploy_dir.display());
        Ok(())
    }

    fn deploy_pdf(&self) -> Result<(), BuildError> {
        let built = self.docs.pdf_build_path();
        if !built.is_file() {
            return Err(BuildError::MissingArtifact(built));
        }

        let target = self.docs.pdf_deploy_path(&self.book.pdf_name);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&built, &target)?;

        tracing::info!("deployed PDF to {}", target.display());
        Ok(())
    }
}

/// Recursively copy a directory tree.
fn copy_tree(src: &Path, dst: &Path) -> io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
