//! Subprocess invocation seam.
//!
//! The orchestrator never touches `std::process` directly; it goes
//! through [`CommandRunner`] so tests can substitute canned output.

use std::ffi::OsStr;
use std::io;
use std::process::Command;

/// Buffered result of a finished subprocess.
#[derive(Clone, Debug)]
pub struct CommandOutput {
    /// Exit status code (-1 if terminated by signal).
    pub status: i32,
    /// Captured stdout.
    pub stdout: String,
    /// Captured stderr.
    pub stderr: String,
}

impl CommandOutput {
    /// Whether the process exited with status 0.
    #[must_use]
    pub fn success(&self) -> bool {
        self.status == 0
    }

    /// Stdout and stderr concatenated, in that order.
    ///
    /// The renderer's build log is its combined output; both streams are
    /// buffered until process exit before any filtering.
    #[must_use]
    pub fn combined(&self) -> String {
        let mut combined = self.stdout.clone();
        combined.push_str(&self.stderr);
        combined
    }
}

/// Runs external commands synchronously, buffering their output.
pub trait CommandRunner {
    /// Run `program` with `args` to completion.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned at all; a
    /// non-zero exit is reported through [`CommandOutput::status`], not
    /// as an `Err`.
    ///
    /// Arguments are raw OS strings so filesystem paths pass through
    /// without a lossy round-trip.
    fn run(&self, program: &str, args: &[&OsStr]) -> io::Result<CommandOutput>;
}

/// [`CommandRunner`] backed by `std::process::Command`.
#[derive(Debug, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, program: &str, args: &[&OsStr]) -> io::Result<CommandOutput> {
        tracing::debug!("running {program} {args:?}");
        let output = Command::new(program).args(args).output()?;
        Ok(CommandOutput {
            status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
