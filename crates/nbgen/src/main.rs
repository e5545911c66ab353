//! nbgen CLI - notebook documentation pipeline.
//!
//! Synchronizes registry-declared notebooks from their markdown or
//! introspected sources, then drives the external book renderer and the
//! deployment copy. The default path builds and deploys the HTML site;
//! `--pdf` builds the single consolidated document instead.

mod command;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use command::BuildArgs;
use output::Output;

/// nbgen - documentation notebook and book pipeline.
#[derive(Parser)]
#[command(name = "nbgen", version, about)]
struct Cli {
    #[command(flatten)]
    build: BuildArgs,
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.build.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(err) = cli.build.execute(&output) {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
