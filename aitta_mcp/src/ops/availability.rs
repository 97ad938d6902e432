//! Startup accessibility report for the configured allowlist.
//!
//! Probes every allowed root for existence and list permission. The same
//! report backs the `init` tool so a client can ask the server to re-check
//! its configuration at any time.

use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use schemars::JsonSchema;
use serde::Serialize;

use crate::guard::AccessGuard;

/// Accessibility of the configured allowed directories.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct RootsReport {
    pub allowed_dirs: Vec<String>,
    pub accessible_dirs: Vec<String>,
    pub inaccessible_dirs: Vec<String>,
    pub total_allowed: usize,
    pub total_accessible: usize,
    /// Probe error per inaccessible directory; absent when all roots probe
    /// clean.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_details: Option<BTreeMap<String, String>>,
}

impl RootsReport {
    /// True when at least one root is configured and every root probed
    /// clean.
    pub fn all_accessible(&self) -> bool {
        self.total_allowed > 0 && self.inaccessible_dirs.is_empty()
    }

    /// True when no roots are configured at all.
    pub fn is_empty(&self) -> bool {
        self.total_allowed == 0
    }
}

/// Probe every allowed root for list access.
pub fn check_configuration(guard: &AccessGuard) -> RootsReport {
    let mut accessible_dirs = Vec::new();
    let mut inaccessible_dirs = Vec::new();
    let mut errors = BTreeMap::new();

    let allowed_dirs: Vec<String> = guard
        .policy()
        .allowed_dirs()
        .iter()
        .map(|dir| dir.display().to_string())
        .collect();

    for dir in guard.policy().allowed_dirs() {
        let shown = dir.display().to_string();
        match probe_root(dir) {
            Ok(()) => accessible_dirs.push(shown),
            Err(error) => {
                tracing::warn!(dir = %dir.display(), %error, "allowed directory is not accessible");
                errors.insert(shown.clone(), error.to_string());
                inaccessible_dirs.push(shown);
            }
        }
    }

    RootsReport {
        total_allowed: allowed_dirs.len(),
        total_accessible: accessible_dirs.len(),
        allowed_dirs,
        accessible_dirs,
        inaccessible_dirs,
        error_details: (!errors.is_empty()).then_some(errors),
    }
}

/// A root is accessible when it exists, is a directory, and read_dir on it
/// succeeds.
fn probe_root(dir: &Path) -> io::Result<()> {
    let metadata = std::fs::metadata(dir)?;
    if !metadata.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotADirectory,
            "not a directory",
        ));
    }
    let _ = std::fs::read_dir(dir)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::{AccessGuard, AllowlistPolicy};
    use crate::test_utils::SandboxFixture;

    #[test]
    fn test_all_roots_accessible() {
        let sandbox = SandboxFixture::new();
        let guard = sandbox.guard(&["txt"]);

        let report = check_configuration(&guard);
        assert!(report.all_accessible());
        assert_eq!(report.total_allowed, 1);
        assert_eq!(report.total_accessible, 1);
        assert!(report.error_details.is_none());
    }

    #[test]
    fn test_missing_root_is_reported_with_details() {
        let sandbox = SandboxFixture::new();
        let missing = sandbox.allowed().join("never-created");
        let guard = AccessGuard::new(AllowlistPolicy::from_config(&crate::config::AccessConfig {
            allowed_dirs: vec![
                sandbox.allowed().display().to_string(),
                missing.display().to_string(),
            ],
            allowed_extensions: vec![],
        }));

        let report = check_configuration(&guard);
        assert!(!report.all_accessible());
        assert_eq!(report.total_allowed, 2);
        assert_eq!(report.total_accessible, 1);
        assert_eq!(report.inaccessible_dirs, vec![missing.display().to_string()]);
        let details = report.error_details.unwrap();
        assert!(details.contains_key(&missing.display().to_string()));
    }

    #[test]
    fn test_file_configured_as_root_is_inaccessible() {
        let sandbox = SandboxFixture::new();
        let file = sandbox.write_allowed("plain.txt", "x");
        let guard = AccessGuard::new(AllowlistPolicy::from_config(&crate::config::AccessConfig {
            allowed_dirs: vec![file.display().to_string()],
            allowed_extensions: vec![],
        }));

        let report = check_configuration(&guard);
        assert_eq!(report.total_accessible, 0);
        assert_eq!(report.inaccessible_dirs.len(), 1);
    }

    #[test]
    fn test_empty_configuration_reports_empty() {
        let guard = AccessGuard::new(AllowlistPolicy::from_config(&crate::config::AccessConfig {
            allowed_dirs: vec![],
            allowed_extensions: vec![],
        }));

        let report = check_configuration(&guard);
        assert!(report.is_empty());
        assert!(!report.all_accessible());
    }
}
