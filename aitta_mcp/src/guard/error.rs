//! Error types for the access-control engine.

/// Why an authorization request was refused.
///
/// Every denial carries exactly one reason so remote callers can branch on
/// the stable [`code`](DenyReason::code) without parsing messages. The
/// messages themselves stay deliberately vague about filesystem internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DenyReason {
    /// The canonical path is not equal to or below any allowed directory.
    #[error("Access to this path is not allowed.")]
    OutsideAllowedDirs,

    /// The file's extension is not in the configured allowlist.
    #[error("This file type is not allowed for reading.")]
    ExtensionNotAllowed,

    /// The path could not be resolved to an existing filesystem entity.
    /// Also covers malformed input; callers are not told which.
    #[error("The provided path does not exist or cannot be resolved.")]
    NotFound,

    /// A listing was requested on something that is not a directory.
    #[error("The provided path is not a directory.")]
    NotADirectory,

    /// A read was requested on something that is not a regular file.
    #[error("The provided path is not a file.")]
    NotAFile,
}

impl DenyReason {
    /// Stable machine-readable reason code used in wire responses.
    pub fn code(&self) -> &'static str {
        match self {
            DenyReason::OutsideAllowedDirs => "OUTSIDE_ALLOWED_DIRS",
            DenyReason::ExtensionNotAllowed => "EXTENSION_NOT_ALLOWED",
            DenyReason::NotFound => "NOT_FOUND",
            DenyReason::NotADirectory => "NOT_A_DIRECTORY",
            DenyReason::NotAFile => "NOT_A_FILE",
        }
    }
}

/// Failures while turning raw input into a canonical path.
///
/// These never cross the remote boundary directly; the guard collapses them
/// into [`DenyReason::NotFound`] so callers cannot distinguish "malformed"
/// from "absent".
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("path is empty")]
    Empty,

    #[error("path contains a NUL byte")]
    NulByte,

    #[error("relative path '{path}' has no allowed directory to anchor against")]
    RelativeWithoutBase { path: String },

    #[error("failed to resolve '{path}': {source}")]
    Unresolvable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
