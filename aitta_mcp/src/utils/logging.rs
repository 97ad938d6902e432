//! # Logging Initialization
//!
//! Centralized setup for the `tracing` subscriber. Because the server speaks
//! MCP over stdout, log output must never touch stdout: by default logs go
//! to a daily rolling file in the user cache directory, and `--log-to-stderr`
//! (or a file setup failure) routes them to stderr instead.
//!
//! Verbosity follows `RUST_LOG` when set; otherwise the given base level is
//! used with this crate raised to `debug`.

use anyhow::Result;
use directories::ProjectDirs;
use std::{io::stderr, path::Path, sync::Once};
use tracing_subscriber::{EnvFilter, fmt::layer, prelude::*};

static INIT: Once = Once::new();

/// Initialize verbose logging for tests.
///
/// This configures a `trace`-level subscriber that logs to stderr.
pub fn init_test_logging() {
    init_logging("trace", false).expect("Failed to initialize test logging");
}

/// Initializes the logging system.
///
/// This function sets up a global tracing subscriber. It can be configured to
/// log to stderr or to a daily rolling file in the project's cache directory.
///
/// When logging to stderr, ANSI colors are enabled for better readability.
/// When logging to file, ANSI colors are disabled.
pub fn init_logging(log_level: &str, log_to_file: bool) -> Result<()> {
    INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("{log_level},aitta_mcp=debug")));

        // Attempt to log to a file, fall back to stderr.
        if log_to_file && let Some(proj_dirs) = ProjectDirs::from("fi", "AittaMcp", "aitta_mcp") {
            let log_dir = proj_dirs.cache_dir();

            // Test if we can actually write to the log directory before calling
            // tracing_appender::rolling::daily, which panics on permission errors
            // in tracing-appender 0.2.4+.
            let can_write = test_write_permission(log_dir);

            // Use catch_unwind so an appender panic degrades to stderr logging.
            let file_appender_result = if can_write {
                std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                    tracing_appender::rolling::daily(log_dir, "aitta_mcp.log")
                }))
            } else {
                Err(Box::new("Cannot write to log directory") as Box<dyn std::any::Any + Send>)
            };

            if let Ok(file_appender) = file_appender_result {
                let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(layer().with_writer(non_blocking).with_ansi(false))
                    .init();

                // The guard is intentionally leaked to ensure logs are flushed on exit.
                Box::leak(Box::new(_guard));
                return;
            }
        }

        // Fallback or explicit stderr logging
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer().with_writer(stderr).with_ansi(true))
            .init();
    });

    Ok(())
}

/// Test if we can write to the given directory.
///
/// This creates the directory if needed, then attempts to create and remove a
/// test file. Used to check write permissions before calling
/// tracing_appender::rolling::daily which panics on permission errors in
/// tracing-appender 0.2.4+.
fn test_write_permission(dir: &Path) -> bool {
    if std::fs::create_dir_all(dir).is_err() {
        return false;
    }

    let test_file = dir.join(".aitta_log_test");
    match std::fs::write(&test_file, "test") {
        Ok(()) => {
            let _ = std::fs::remove_file(&test_file);
            true
        }
        Err(_) => false,
    }
}
