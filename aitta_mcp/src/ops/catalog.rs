//! Resource catalog.
//!
//! Projects authorized files and directories into descriptors a client can
//! browse without touching file contents. Collection is shallow (one level
//! per call) and re-authorizes every child entry, so a symlink that escapes
//! the allowed roots disappears from the catalog instead of leaking.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::Serialize;

use crate::guard::{AccessGuard, AccessKind, AuthorizedPath};

use super::OpError;
use super::list::{BatchSummary, ProgressTracker};

/// Catalog entry describing one authorized file or directory.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ResourceDescriptor {
    /// Canonical path.
    pub path: String,
    /// Final path segment.
    pub name: String,
    /// `"file"` or `"directory"`.
    pub kind: String,
    /// Length in bytes; files only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    /// Last modification time when the filesystem reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
    /// Tool names that will accept this resource's path.
    pub actions: Vec<String>,
}

impl ResourceDescriptor {
    fn from_authorized(authorized: &AuthorizedPath, guard: &AccessGuard) -> Self {
        let canonical = authorized.canonical();
        let metadata = authorized.metadata();
        let name = canonical
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| canonical.display().to_string());
        let (kind, actions) = if metadata.is_dir() {
            ("directory", vec!["list_directory".to_string()])
        } else {
            let mut actions = vec!["read_file_binary".to_string()];
            if guard.policy().extension_allowed(canonical) {
                actions.insert(0, "read_file".to_string());
            }
            ("file", actions)
        };
        Self {
            path: canonical.display().to_string(),
            name,
            kind: kind.to_string(),
            size_bytes: metadata.is_file().then(|| metadata.len()),
            modified: metadata.modified().ok().map(DateTime::<Utc>::from),
            actions,
        }
    }
}

/// Result of one catalog enumeration.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ResourceListing {
    pub resources: Vec<ResourceDescriptor>,
    pub total_items: usize,
    /// Present only when progress reporting was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batches: Option<Vec<BatchSummary>>,
}

/// Look up a single resource by path.
///
/// Containment is the only gate here, so files outside the readable
/// extension set still describe; their `actions` just omit the text read.
pub fn describe_resource(guard: &AccessGuard, path: &str) -> Result<ResourceDescriptor, OpError> {
    let authorized = guard.inspect(path)?;
    Ok(ResourceDescriptor::from_authorized(&authorized, guard))
}

/// Enumerate descriptors under `directory`, or under every allowed root when
/// no directory is given.
pub fn collect_resources(
    guard: &AccessGuard,
    directory: Option<&str>,
    batch_size: usize,
    report_progress: bool,
) -> Result<ResourceListing, OpError> {
    if batch_size == 0 {
        return Err(OpError::InvalidArgument(
            "batch_size must be at least 1".to_string(),
        ));
    }
    let mut tracker = report_progress.then(|| ProgressTracker::new(batch_size));
    let mut resources = Vec::new();
    match directory {
        Some(directory) => {
            let authorized = guard.authorize(directory, AccessKind::List)?;
            collect_children(guard, &authorized, &mut resources, &mut tracker)?;
        }
        None => {
            for root in guard.policy().allowed_dirs() {
                let raw = root.display().to_string();
                match guard.authorize(&raw, AccessKind::List) {
                    Ok(authorized) => {
                        collect_children(guard, &authorized, &mut resources, &mut tracker)?;
                    }
                    Err(reason) => {
                        tracing::warn!(
                            root = %root.display(),
                            %reason,
                            "skipping unavailable allowed root"
                        );
                    }
                }
            }
        }
    }
    let total_items = resources.len();
    Ok(ResourceListing {
        resources,
        total_items,
        batches: tracker.map(ProgressTracker::finish),
    })
}

/// Describe the direct children of an authorized directory. Children that
/// fail authorization, escaping symlinks included, are skipped.
fn collect_children(
    guard: &AccessGuard,
    parent: &AuthorizedPath,
    resources: &mut Vec<ResourceDescriptor>,
    tracker: &mut Option<ProgressTracker>,
) -> Result<(), OpError> {
    let reader = std::fs::read_dir(parent.canonical()).map_err(|source| OpError::Io {
        path: parent.canonical().to_path_buf(),
        source,
    })?;
    for entry in reader {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                tracing::warn!(
                    directory = %parent.canonical().display(),
                    %error,
                    "skipping unreadable directory entry"
                );
                continue;
            }
        };
        let raw = entry.path().display().to_string();
        match guard.inspect(&raw) {
            Ok(child) => {
                resources.push(ResourceDescriptor::from_authorized(&child, guard));
                if let Some(tracker) = tracker.as_mut() {
                    tracker.record();
                }
            }
            Err(reason) => {
                tracing::debug!(path = %raw, %reason, "skipping entry denied by policy");
            }
        }
    }
    Ok(())
}
