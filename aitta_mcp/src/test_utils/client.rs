//! MCP client conveniences for integration tests.
//!
//! Spawns the server binary as a child process and connects over stdio,
//! exercising the same transport a real client uses.

use anyhow::{Context, Result};
use rmcp::{
    ServiceExt,
    service::{RoleClient, RunningService},
    transport::{ConfigureCommandExt, TokioChildProcess},
};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tokio::process::Command;

/// Cached path to the pre-built aitta_mcp binary.
static BINARY_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Workspace root, resolved from this crate's manifest directory.
pub fn get_workspace_dir() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or(manifest_dir)
}

/// Get the path to the aitta_mcp binary.
fn get_test_binary_path() -> PathBuf {
    BINARY_PATH
        .get_or_init(|| {
            // Check env var first
            if let Ok(path) = std::env::var("AITTA_TEST_BINARY") {
                let p = PathBuf::from(&path);
                if p.exists() {
                    return p;
                }
                eprintln!(
                    "Warning: AITTA_TEST_BINARY={} does not exist, falling back",
                    path
                );
            }

            let workspace = get_workspace_dir();

            // Check CARGO_TARGET_DIR
            if let Ok(target_dir) = std::env::var("CARGO_TARGET_DIR") {
                let p = PathBuf::from(target_dir).join("debug/aitta_mcp");
                if p.exists() {
                    return p;
                }
            }

            let debug_binary = workspace.join("target/debug/aitta_mcp");
            if debug_binary.exists() {
                return debug_binary;
            }

            let release_binary = workspace.join("target/release/aitta_mcp");
            if release_binary.exists() {
                return release_binary;
            }

            // No pre-built binary found - return empty path to signal fallback
            PathBuf::new()
        })
        .clone()
}

fn use_prebuilt_binary() -> bool {
    let path = get_test_binary_path();
    !path.as_os_str().is_empty() && path.exists()
}

/// Builder for spawning the server as a child process in tests.
#[derive(Default)]
pub struct ClientBuilder {
    config_file: Option<PathBuf>,
    allowed_dirs: Vec<PathBuf>,
    allowed_extensions: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn allowed_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.allowed_dirs.push(path.as_ref().to_path_buf());
        self
    }

    pub fn allowed_extension(mut self, ext: impl Into<String>) -> Self {
        self.allowed_extensions.push(ext.into());
        self
    }

    pub fn working_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.working_dir = Some(path.as_ref().to_path_buf());
        self
    }

    pub async fn build(self) -> Result<RunningService<RoleClient, ()>> {
        let workspace_dir = get_workspace_dir();
        let working_dir = self
            .working_dir
            .clone()
            .unwrap_or_else(|| workspace_dir.clone());

        if use_prebuilt_binary() {
            let binary_path = get_test_binary_path();
            self.run_command(Command::new(&binary_path), &working_dir)
                .await
        } else {
            eprintln!(
                "Warning: Using slow 'cargo run' path. Run 'cargo build' first for faster tests."
            );
            let mut cmd = Command::new("cargo");
            cmd.arg("run")
                .arg("--manifest-path")
                .arg(workspace_dir.join("Cargo.toml"))
                .arg("--package")
                .arg("aitta_mcp")
                .arg("--bin")
                .arg("aitta_mcp")
                .arg("--");
            self.run_command(cmd, &working_dir).await
        }
    }

    async fn run_command(
        self,
        command: Command,
        working_dir: &Path,
    ) -> Result<RunningService<RoleClient, ()>> {
        ().serve(TokioChildProcess::new(command.configure(|cmd| {
            cmd.arg("--log-to-stderr")
                .current_dir(working_dir)
                .kill_on_drop(true);

            // Point at a nonexistent config unless the test provides one, so
            // a stray config.json in the working directory cannot leak into
            // the allowlist under test.
            match &self.config_file {
                Some(path) => {
                    cmd.arg("--config").arg(path);
                }
                None => {
                    cmd.arg("--config").arg("aitta-test-missing-config.json");
                }
            }
            for dir in &self.allowed_dirs {
                cmd.arg("--allowed-dir").arg(dir);
            }
            for ext in &self.allowed_extensions {
                cmd.arg("--allowed-extension").arg(ext);
            }
        }))?)
        .await
        .context("Failed to start client service")
    }
}
