//! # Access Guard
//!
//! Single authorization gate for every filesystem touch the server makes.
//!
//! ## Decision pipeline
//!
//! 1. [`normalize`](normalize::normalize) resolves raw input (either
//!    separator style, relative or absolute) to a canonical path, following
//!    symlinks. Failures collapse into [`DenyReason::NotFound`].
//! 2. [`AllowlistPolicy::contains`] checks the canonical path against the
//!    allowed roots one segment at a time.
//! 3. Entity-kind and extension checks run last, on the resolved entity.
//!
//! Callers never handle raw request paths directly; they receive an
//! [`AuthorizedPath`] carrying the canonical path and its metadata.

pub mod error;
mod normalize;
mod policy;

pub use error::{DenyReason, PathError};
pub use policy::AllowlistPolicy;

use std::fs::Metadata;
use std::path::{Path, PathBuf};

/// What the caller intends to do with the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    /// Enumerate a directory's entries.
    List,
    /// Read a regular file through the extension gate.
    Read,
}

/// Proof that a request path passed every applicable check, carrying the
/// canonical form all later filesystem work must use.
#[derive(Debug)]
pub struct AuthorizedPath {
    canonical: PathBuf,
    metadata: Metadata,
}

impl AuthorizedPath {
    pub fn canonical(&self) -> &Path {
        &self.canonical
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn is_dir(&self) -> bool {
        self.metadata.is_dir()
    }

    pub fn is_file(&self) -> bool {
        self.metadata.is_file()
    }
}

/// Decides whether a request path may be listed or read.
#[derive(Debug)]
pub struct AccessGuard {
    policy: AllowlistPolicy,
}

impl AccessGuard {
    pub fn new(policy: AllowlistPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &AllowlistPolicy {
        &self.policy
    }

    /// Resolve and contain `raw` without judging the entity kind or
    /// extension. This is the whole check for ungated reads and resource
    /// lookups, and the first stage of [`authorize`](Self::authorize).
    pub fn inspect(&self, raw: &str) -> Result<AuthorizedPath, DenyReason> {
        let canonical = normalize::normalize(raw, self.policy.first_root()).map_err(|error| {
            tracing::debug!(path = raw, %error, "request path did not resolve");
            DenyReason::NotFound
        })?;
        if !self.policy.contains(&canonical) {
            tracing::warn!(path = %canonical.display(), "denied: outside allowed directories");
            return Err(DenyReason::OutsideAllowedDirs);
        }
        let metadata = std::fs::metadata(&canonical).map_err(|error| {
            tracing::debug!(path = %canonical.display(), %error, "denied: metadata unavailable");
            DenyReason::NotFound
        })?;
        Ok(AuthorizedPath {
            canonical,
            metadata,
        })
    }

    /// Full authorization for a listing or a gated read.
    pub fn authorize(&self, raw: &str, kind: AccessKind) -> Result<AuthorizedPath, DenyReason> {
        let authorized = self.inspect(raw)?;
        match kind {
            AccessKind::List if !authorized.is_dir() => Err(DenyReason::NotADirectory),
            AccessKind::Read if !authorized.is_file() => Err(DenyReason::NotAFile),
            AccessKind::Read if !self.policy.extension_allowed(authorized.canonical()) => {
                tracing::warn!(
                    path = %authorized.canonical().display(),
                    "denied: extension not allowed"
                );
                Err(DenyReason::ExtensionNotAllowed)
            }
            _ => Ok(authorized),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::SandboxFixture;

    #[test]
    fn test_denies_traversal_that_escapes_the_allowed_root() {
        let sandbox = SandboxFixture::new();
        sandbox.subdir("inner");
        sandbox.write_outside("secret.txt", "top secret");
        let guard = sandbox.guard(&["txt"]);

        let escape = format!("{}/inner/../../outside/secret.txt", sandbox.allowed().display());
        let denied = guard.authorize(&escape, AccessKind::Read).unwrap_err();
        assert_eq!(denied, DenyReason::OutsideAllowedDirs);
    }

    #[cfg(unix)]
    #[test]
    fn test_denies_symlink_that_escapes_the_allowed_root() {
        let sandbox = SandboxFixture::new();
        let secret = sandbox.write_outside("secret.txt", "top secret");
        let link = sandbox.symlink_into_allowed(&secret, "escape.txt");
        let guard = sandbox.guard(&["txt"]);

        let denied = guard
            .authorize(link.to_str().unwrap(), AccessKind::Read)
            .unwrap_err();
        assert_eq!(denied, DenyReason::OutsideAllowedDirs);
    }

    #[test]
    fn test_listing_a_file_is_not_a_directory() {
        let sandbox = SandboxFixture::new();
        let file = sandbox.write_allowed("a.txt", "x");
        let guard = sandbox.guard(&["txt"]);

        let denied = guard
            .authorize(file.to_str().unwrap(), AccessKind::List)
            .unwrap_err();
        assert_eq!(denied, DenyReason::NotADirectory);
    }

    #[test]
    fn test_reading_a_directory_is_not_a_file() {
        let sandbox = SandboxFixture::new();
        let dir = sandbox.subdir("inner");
        let guard = sandbox.guard(&["txt"]);

        let denied = guard
            .authorize(dir.to_str().unwrap(), AccessKind::Read)
            .unwrap_err();
        assert_eq!(denied, DenyReason::NotAFile);
    }

    #[test]
    fn test_gated_read_checks_the_extension_but_inspect_does_not() {
        let sandbox = SandboxFixture::new();
        let file = sandbox.write_allowed("tool.rs", "fn main() {}");
        let guard = sandbox.guard(&["txt"]);

        let denied = guard
            .authorize(file.to_str().unwrap(), AccessKind::Read)
            .unwrap_err();
        assert_eq!(denied, DenyReason::ExtensionNotAllowed);

        let inspected = guard.inspect(file.to_str().unwrap()).unwrap();
        assert!(inspected.is_file());
        assert_eq!(inspected.canonical(), file.as_path());
    }

    #[test]
    fn test_missing_paths_are_not_found() {
        let sandbox = SandboxFixture::new();
        let guard = sandbox.guard(&["txt"]);

        let absent = sandbox.allowed().join("absent.txt");
        let denied = guard.inspect(absent.to_str().unwrap()).unwrap_err();
        assert_eq!(denied, DenyReason::NotFound);
    }

    #[test]
    fn test_relative_paths_anchor_to_the_first_allowed_root() {
        let sandbox = SandboxFixture::new();
        let file = sandbox.write_allowed("notes.txt", "hello");
        let guard = sandbox.guard(&["txt"]);

        let authorized = guard.authorize("notes.txt", AccessKind::Read).unwrap();
        assert_eq!(authorized.canonical(), file.as_path());
    }

    #[test]
    fn test_empty_policy_denies_everything() {
        let sandbox = SandboxFixture::new();
        let file = sandbox.write_allowed("a.txt", "x");
        let guard = AccessGuard::new(AllowlistPolicy::from_config(&crate::config::AccessConfig {
            allowed_dirs: vec![],
            allowed_extensions: vec!["txt".to_string()],
        }));

        let denied = guard
            .authorize(file.to_str().unwrap(), AccessKind::Read)
            .unwrap_err();
        assert_eq!(denied, DenyReason::OutsideAllowedDirs);
    }
}
