//! cos - command-line client for S3-compatible cloud object storage
//!
//! Each storage operation is a subcommand whose flags are bound into a typed
//! request before any connection is made.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cos_cli::commands::{self, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so JSON on stdout stays parseable
    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let exit_code = commands::execute(cli).await;

    std::process::exit(exit_code.as_i32());
}
