//! Allowlist policy.
//!
//! Holds the configured directory roots and readable-extension set, and
//! answers the two pure policy questions: is a canonical path inside an
//! allowed root, and is its extension readable. Path resolution and the
//! ordering of checks live in [`super::AccessGuard`].

use std::path::{Path, PathBuf};

use crate::config::AccessConfig;

use super::normalize::is_contained;

/// Immutable authorization policy derived from configuration at startup.
#[derive(Debug, Clone)]
pub struct AllowlistPolicy {
    /// Absolute allowed roots, in configuration order.
    allowed_dirs: Vec<PathBuf>,
    /// Lowercased dot-prefixed extensions; the empty string marks
    /// extensionless files as readable.
    allowed_extensions: Vec<String>,
}

impl AllowlistPolicy {
    pub fn from_config(config: &AccessConfig) -> Self {
        let mut allowed_dirs = Vec::new();
        for raw in &config.allowed_dirs {
            if raw.trim().is_empty() {
                tracing::warn!("ignoring empty allowed directory entry");
                continue;
            }
            match std::path::absolute(raw) {
                Ok(dir) => allowed_dirs.push(dir),
                Err(error) => {
                    tracing::warn!(dir = %raw, %error, "ignoring allowed directory that cannot be made absolute");
                }
            }
        }
        let allowed_extensions = config
            .allowed_extensions
            .iter()
            .map(|e| normalize_extension(e))
            .collect();
        Self {
            allowed_dirs,
            allowed_extensions,
        }
    }

    /// Anchor for relative request paths.
    pub fn first_root(&self) -> Option<&Path> {
        self.allowed_dirs.first().map(PathBuf::as_path)
    }

    pub fn allowed_dirs(&self) -> &[PathBuf] {
        &self.allowed_dirs
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    /// True when no directories are allowed, meaning every request denies.
    pub fn is_empty(&self) -> bool {
        self.allowed_dirs.is_empty()
    }

    /// Whether `canonical` equals or sits below any allowed root.
    ///
    /// Roots are canonicalized per call so symlinked or late-created roots
    /// compare in the same form as the already-canonical request path. Roots
    /// that do not currently resolve cannot authorize anything.
    pub fn contains(&self, canonical: &Path) -> bool {
        self.allowed_dirs.iter().any(|root| {
            std::fs::canonicalize(root)
                .map(|resolved| is_contained(canonical, &resolved))
                .unwrap_or(false)
        })
    }

    /// Whether the final extension of `canonical` is readable under this
    /// policy. Non-UTF-8 extensions never match.
    pub fn extension_allowed(&self, canonical: &Path) -> bool {
        match extension_of(canonical) {
            Some(ext) => self.allowed_extensions.iter().any(|allowed| *allowed == ext),
            None => false,
        }
    }
}

/// Lowercase and dot-prefix a configured extension. The empty string is kept
/// as the extensionless marker.
fn normalize_extension(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    if lowered.is_empty() || lowered.starts_with('.') {
        lowered
    } else {
        format!(".{lowered}")
    }
}

/// Final extension of a path in comparison form. `None` only for non-UTF-8
/// extensions; extensionless names map to the empty-string marker.
fn extension_of(canonical: &Path) -> Option<String> {
    match canonical.extension() {
        None => Some(String::new()),
        Some(os) => os.to_str().map(|s| format!(".{}", s.to_lowercase())),
    }
}
