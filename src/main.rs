//! # AppTrust CLI
//!
//! Command-line tool for creating and evolving application versions on an
//! AppTrust platform.
//!
//! ## Quick Start
//!
//! ```bash
//! # Create a version from two packages
//! apptrust version-create my-app 1.0.0 \
//!   --source-type-packages "type=npm,name=web,version=1.0.0,repo-key=npm-local;type=docker,name=api,version=2.1.0,repo-key=docker-local"
//!
//! # Add a build to a draft version, excluding a vulnerable jar
//! apptrust version-update-sources my-app 1.0.0 \
//!   --source-type-builds "name=web-build,id=42,include-deps=true" \
//!   --exclude-filter "filter_type=artifact,path=libs/vulnerable-*.jar"
//!
//! # Describe everything in a spec file instead
//! apptrust version-create my-app 1.0.0 --spec version.json --spec-vars "PKG=web;VER=1.0.0"
//! ```
//!
//! ## Configuration
//!
//! Connection details come from `--url` / `--access-token` (or `APPTRUST_URL` /
//! `APPTRUST_ACCESS_TOKEN`), or from server profiles in
//! `~/.config/apptrust/servers.yaml`. Logging is controlled by `APPTRUST_LOG`.

use anyhow::Result;
use apptrust_cli::{commands, constants::LOG_ENV, Cli};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Main entry point for the AppTrust CLI
///
/// Parses command-line arguments, sets up logging and delegates to the
/// appropriate command handler.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let cmd = cli.cmd.unwrap_or_else(|| {
        eprintln!("No command provided. Use --help to see available commands.");
        std::process::exit(1);
    });
    commands::run(cmd, &cli.global).await
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
