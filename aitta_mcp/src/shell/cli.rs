//! # Aitta MCP Server CLI
//!
//! Command-line interface definition and the main entry point.

use anyhow::Result;
use clap::Parser;
use std::{path::PathBuf, sync::Arc};

use crate::config::{self, DEFAULT_CONFIG_FILE};
use crate::guard::{AccessGuard, AllowlistPolicy};
use crate::ops;
use crate::utils::logging::init_logging;

use super::server;

/// Aitta MCP Server: read-only filesystem access for MCP clients, scoped to
/// an allowlist of directories and file extensions.
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about,
    long_about = "aitta_mcp serves a fixed set of read-only filesystem tools over stdio.

Access is restricted to the directories listed in the config file (or given
with --allowed-dir); text reads are further restricted to the configured file
extensions. Paths are resolved, including symlinks, before any check, so
nothing outside the allowed directories is reachable.

Example config.json:
  { \"allowed_dirs\": [\"/data/docs\"], \"allowed_extensions\": [\"txt\", \"md\"] }"
)]
pub struct Cli {
    /// Path to the JSON config file holding allowed_dirs and allowed_extensions
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Additional allowed directory (repeatable)
    #[arg(long = "allowed-dir")]
    pub allowed_dirs: Vec<String>,

    /// Additional allowed file extension, with or without the leading dot (repeatable)
    #[arg(long = "allowed-extension")]
    pub allowed_extensions: Vec<String>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Log to stderr instead of file
    #[arg(long)]
    pub log_to_stderr: bool,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.debug { "debug" } else { "info" };
    let log_to_file = !cli.log_to_stderr;
    init_logging(log_level, log_to_file)?;

    let mut access = config::load_access_config(&cli.config);
    access.extend_from_cli(cli.allowed_dirs.clone(), cli.allowed_extensions.clone());

    let policy = AllowlistPolicy::from_config(&access);
    if policy.is_empty() {
        tracing::warn!("no allowed directories configured - every request will be denied");
    }
    let guard = Arc::new(AccessGuard::new(policy));

    // Probe configured roots up front so misconfiguration shows in the log
    // before the first client request.
    let report = ops::check_configuration(&guard);
    tracing::info!(
        allowed = report.total_allowed,
        accessible = report.total_accessible,
        "access configuration ready"
    );

    server::run_server_mode(guard).await
}
