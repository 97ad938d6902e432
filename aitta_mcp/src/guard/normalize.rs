//! Path normalization.
//!
//! Turns untrusted request input into a canonical absolute path before any
//! policy decision is made. Canonicalization resolves `.`/`..` segments and
//! symlinks in on-disk order, so a link segment is expanded before any `..`
//! that follows it takes effect. Containment checks compare path segments,
//! never string prefixes.

use std::path::{Component, Path, PathBuf};

use super::error::PathError;

/// Resolve `raw` to a canonical absolute path.
///
/// Both separator styles are accepted regardless of host platform. Relative
/// input is anchored against `anchor` (the first allowed directory) when one
/// is available. The returned path exists at the time of the call; missing
/// targets surface as [`PathError::Unresolvable`].
pub fn normalize(raw: &str, anchor: Option<&Path>) -> Result<PathBuf, PathError> {
    if raw.is_empty() {
        return Err(PathError::Empty);
    }
    if raw.contains('\0') {
        return Err(PathError::NulByte);
    }

    let unified = raw.replace('\\', std::path::MAIN_SEPARATOR_STR);
    let candidate = PathBuf::from(&unified);
    let absolute = if candidate.is_relative() {
        match anchor {
            Some(base) => base.join(&candidate),
            None => return Err(PathError::RelativeWithoutBase { path: unified }),
        }
    } else {
        candidate
    };

    std::fs::canonicalize(&absolute).map_err(|source| PathError::Unresolvable {
        path: unified,
        source,
    })
}

/// Whether `path` equals `root` or sits below it, compared one segment at a
/// time. Sibling directories that share a name prefix are never contained.
pub(crate) fn is_contained(path: &Path, root: &Path) -> bool {
    let mut path_parts = path.components();
    for root_part in root.components() {
        match path_parts.next() {
            Some(part) if same_component(&part, &root_part) => {}
            _ => return false,
        }
    }
    true
}

// Filesystems on these platforms are case-insensitive by default, and
// canonicalize preserves on-disk casing, so segment comparison folds case.
#[cfg(any(target_os = "windows", target_os = "macos"))]
fn same_component(a: &Component<'_>, b: &Component<'_>) -> bool {
    a.as_os_str().to_string_lossy().to_lowercase() == b.as_os_str().to_string_lossy().to_lowercase()
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn same_component(a: &Component<'_>, b: &Component<'_>) -> bool {
    a == b
}
