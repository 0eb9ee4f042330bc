//! # AppTrust CLI Library
//!
//! Core library functionality for the `apptrust` tool: resolving what goes
//! into an application version, and sending the resulting requests to the
//! platform.

use clap::{Args, Parser};

pub mod client;
pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod model;
pub mod service;
pub mod sources;

/// CLI tool for managing application versions on an AppTrust platform
///
/// Application versions are assembled from packages, builds, release bundles,
/// other application versions and raw artifacts, described either with
/// `--source-type-*` flags or with a JSON spec file.
#[derive(Parser, Debug)]
#[command(
    name = "apptrust",
    version,
    about = "CLI tool for managing application versions on an AppTrust platform",
    long_about = "Create, update, promote, release and roll back application versions.\n\nVersion contents can be described with compact --source-type-* flags or with a JSON spec file (--spec) supporting ${VAR} substitution."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub cmd: Option<commands::Commands>,
}

/// Connection options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Platform URL, e.g. https://platform.example.com
    #[arg(long, global = true, env = constants::URL_ENV)]
    pub url: Option<String>,

    /// Access token for the platform
    #[arg(long, global = true, env = constants::ACCESS_TOKEN_ENV, hide_env_values = true)]
    pub access_token: Option<String>,

    /// Server profile to use from the profiles file
    #[arg(long, global = true, env = constants::SERVER_ID_ENV)]
    pub server_id: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}
