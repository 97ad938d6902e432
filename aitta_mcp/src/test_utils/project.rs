//! Temporary sandbox scaffolding for tests.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::config::AccessConfig;
use crate::guard::{AccessGuard, AllowlistPolicy};

/// Temporary directory tree with one allowed root and one outside root:
///
/// ```text
/// <tempdir>/
///   allowed/   inside the allowlist
///   outside/   never allowed
/// ```
///
/// The tempdir path is canonicalized up front so assertions compare
/// canonical paths to canonical paths even where the temp directory itself
/// sits behind a symlink (macOS `/tmp`).
pub struct SandboxFixture {
    // Held for its Drop, which removes the tree.
    _dir: TempDir,
    root: PathBuf,
    allowed: PathBuf,
    outside: PathBuf,
}

impl SandboxFixture {
    pub fn new() -> Self {
        let dir = tempfile::Builder::new()
            .prefix(&format!("aitta_test_{}_", std::process::id()))
            .tempdir()
            .expect("create sandbox tempdir");
        let root = dir.path().canonicalize().expect("canonicalize tempdir");
        let allowed = root.join("allowed");
        let outside = root.join("outside");
        std::fs::create_dir(&allowed).expect("create allowed dir");
        std::fs::create_dir(&outside).expect("create outside dir");
        Self {
            _dir: dir,
            root,
            allowed,
            outside,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn allowed(&self) -> &Path {
        &self.allowed
    }

    pub fn outside(&self) -> &Path {
        &self.outside
    }

    /// Write a file under the allowed root, creating parent directories.
    pub fn write_allowed(&self, rel: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        Self::write(&self.allowed, rel, contents)
    }

    /// Write a file under the outside root, creating parent directories.
    pub fn write_outside(&self, rel: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        Self::write(&self.outside, rel, contents)
    }

    fn write(base: &Path, rel: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        let path = base.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        std::fs::write(&path, contents).expect("write fixture file");
        path
    }

    /// Create a directory under the allowed root.
    pub fn subdir(&self, rel: &str) -> PathBuf {
        let path = self.allowed.join(rel);
        std::fs::create_dir_all(&path).expect("create subdir");
        path
    }

    /// Create a sibling of the allowed root. Used with names like
    /// `allowed_extra` to probe prefix confusion.
    pub fn sibling_dir(&self, name: &str) -> PathBuf {
        let path = self.root.join(name);
        std::fs::create_dir_all(&path).expect("create sibling dir");
        path
    }

    /// Create a symlink inside the allowed root pointing at `target`.
    #[cfg(unix)]
    pub fn symlink_into_allowed(&self, target: &Path, link_rel: &str) -> PathBuf {
        let link = self.allowed.join(link_rel);
        std::os::unix::fs::symlink(target, &link).expect("create symlink");
        link
    }

    /// Allowlist config covering the allowed root and `extensions`.
    pub fn config(&self, extensions: &[&str]) -> AccessConfig {
        AccessConfig {
            allowed_dirs: vec![self.allowed.display().to_string()],
            allowed_extensions: extensions.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Guard over the allowed root and `extensions`.
    pub fn guard(&self, extensions: &[&str]) -> AccessGuard {
        AccessGuard::new(AllowlistPolicy::from_config(&self.config(extensions)))
    }

    /// Write the fixture's config as a JSON file and return its path.
    pub fn write_config_file(&self, extensions: &[&str]) -> PathBuf {
        let config = self.config(extensions);
        let path = self.root.join("config.json");
        let contents = serde_json::to_string_pretty(&config).expect("serialize config");
        std::fs::write(&path, contents).expect("write config file");
        path
    }
}

impl Default for SandboxFixture {
    fn default() -> Self {
        Self::new()
    }
}
