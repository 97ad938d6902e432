//! # Access Configuration
//!
//! Defines the on-disk shape of the server's allowlist and the loader that
//! reads it. The configuration is a single JSON file:
//!
//! ```json
//! {
//!   "allowed_dirs": ["/data/projects", "/data/docs"],
//!   "allowed_extensions": ["txt", "md", "json"]
//! }
//! ```
//!
//! A missing or unreadable file is not fatal: the server starts with an empty
//! allowlist and denies everything, which keeps a misconfigured deployment
//! fail-closed instead of fail-open. Entries given on the command line are
//! appended after loading. Interpretation of the entries (absolutizing
//! directories, normalizing extensions) happens in
//! [`AllowlistPolicy::from_config`](crate::guard::AllowlistPolicy::from_config).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file name looked up in the working directory when `--config` is
/// not given.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Raw allowlist as written in the config file, before interpretation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AccessConfig {
    /// Directories whose contents may be listed and read.
    #[serde(default)]
    pub allowed_dirs: Vec<String>,
    /// File extensions readable through the text-read path.
    #[serde(default)]
    pub allowed_extensions: Vec<String>,
}

impl AccessConfig {
    /// Append allowlist entries supplied as command-line flags.
    pub fn extend_from_cli(&mut self, dirs: Vec<String>, extensions: Vec<String>) {
        self.allowed_dirs.extend(dirs);
        self.allowed_extensions.extend(extensions);
    }
}

/// Read the allowlist from `path`.
///
/// Every failure mode degrades to the empty (deny-all) configuration with a
/// logged warning, so startup never aborts on config problems.
pub fn load_access_config(path: &Path) -> AccessConfig {
    if !path.exists() {
        tracing::warn!(
            config = %path.display(),
            "config file not found, starting with an empty allowlist"
        );
        return AccessConfig::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str::<AccessConfig>(&contents) {
            Ok(config) => {
                tracing::info!(
                    config = %path.display(),
                    dirs = config.allowed_dirs.len(),
                    extensions = config.allowed_extensions.len(),
                    "loaded access configuration"
                );
                config
            }
            Err(error) => {
                tracing::warn!(
                    config = %path.display(),
                    %error,
                    "failed to parse config file, starting with an empty allowlist"
                );
                AccessConfig::default()
            }
        },
        Err(error) => {
            tracing::warn!(
                config = %path.display(),
                %error,
                "failed to read config file, starting with an empty allowlist"
            );
            AccessConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_falls_back_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_access_config(&dir.path().join("absent.json"));
        assert_eq!(config, AccessConfig::default());
    }

    #[test]
    fn test_malformed_json_falls_back_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        let config = load_access_config(&path);
        assert_eq!(config, AccessConfig::default());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"allowed_dirs": ["/data"]}"#).unwrap();
        let config = load_access_config(&path);
        assert_eq!(config.allowed_dirs, vec!["/data"]);
        assert!(config.allowed_extensions.is_empty());
    }

    #[test]
    fn test_full_config_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"allowed_dirs": ["/data", "/docs"], "allowed_extensions": ["txt", ".MD"]}"#,
        )
        .unwrap();
        let config = load_access_config(&path);
        assert_eq!(config.allowed_dirs, vec!["/data", "/docs"]);
        assert_eq!(config.allowed_extensions, vec!["txt", ".MD"]);
    }

    #[test]
    fn test_cli_entries_are_appended() {
        let mut config = AccessConfig {
            allowed_dirs: vec!["/data".to_string()],
            allowed_extensions: vec!["txt".to_string()],
        };
        config.extend_from_cli(vec!["/extra".to_string()], vec!["md".to_string()]);
        assert_eq!(config.allowed_dirs, vec!["/data", "/extra"]);
        assert_eq!(config.allowed_extensions, vec!["txt", "md"]);
    }
}
