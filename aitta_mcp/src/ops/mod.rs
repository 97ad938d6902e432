//! # Operations
//!
//! The work behind each remote-facing tool: directory listing, text and
//! binary reads, the resource catalog, and the startup accessibility report.
//! Every operation routes its path through [`crate::guard`] before touching
//! the filesystem and reports failure as an [`OpError`] with a stable code,
//! so the transport layer can hand callers a tagged result instead of a
//! protocol fault.

mod availability;
mod catalog;
mod list;
mod read;

pub use availability::{RootsReport, check_configuration};
pub use catalog::{ResourceDescriptor, ResourceListing, collect_resources, describe_resource};
pub use list::{BatchSummary, DEFAULT_BATCH_SIZE, DirectoryListing, list_directory};
pub use read::{BinaryContent, read_binary, read_text};

use std::path::PathBuf;

use crate::guard::DenyReason;

/// Failure of a remote-facing operation.
#[derive(Debug, thiserror::Error)]
pub enum OpError {
    /// The access guard refused the path.
    #[error(transparent)]
    Denied(#[from] DenyReason),

    /// A request argument was present but unusable.
    #[error("{0}")]
    InvalidArgument(String),

    /// Filesystem I/O failed on an already-authorized path.
    #[error("I/O failure on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file's bytes are not valid UTF-8.
    #[error("{path:?} is not valid UTF-8 text; use the binary read instead")]
    NotText { path: PathBuf },
}

impl OpError {
    /// Stable machine-readable code for wire responses.
    pub fn code(&self) -> &'static str {
        match self {
            OpError::Denied(reason) => reason.code(),
            OpError::InvalidArgument(_) => "INVALID_ARGUMENT",
            OpError::Io { .. } => "IO_FAILURE",
            OpError::NotText { .. } => "NOT_TEXT",
        }
    }
}
