//! Directory listing with optional batched progress reporting.
//!
//! Batching bounds per-batch bookkeeping for very large directories and
//! gives callers incremental totals. It is a reporting courtesy only; the
//! full entry set is returned either way, in filesystem enumeration order.

use std::time::Instant;

use schemars::JsonSchema;
use serde::Serialize;

use crate::guard::{AccessGuard, AccessKind};

use super::OpError;

/// Batch size used when the caller does not request one.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Progress summary for one closed batch of entries.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct BatchSummary {
    /// 1-based batch ordinal.
    pub batch: usize,
    pub items_in_batch: usize,
    /// Running total including this batch.
    pub items_so_far: usize,
    /// Wall-clock time since enumeration started.
    pub elapsed_ms: u64,
}

/// Result of one authorized directory enumeration.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct DirectoryListing {
    /// Entry names in filesystem enumeration order, unsorted.
    pub entries: Vec<String>,
    pub total_items: usize,
    /// Present only when progress reporting was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batches: Option<Vec<BatchSummary>>,
}

/// Groups counted items into batches and keeps a summary per closed batch.
#[derive(Debug)]
pub(crate) struct ProgressTracker {
    batch_size: usize,
    started: Instant,
    in_batch: usize,
    total: usize,
    summaries: Vec<BatchSummary>,
}

impl ProgressTracker {
    /// `batch_size` must already be validated to be at least 1.
    pub(crate) fn new(batch_size: usize) -> Self {
        Self {
            batch_size,
            started: Instant::now(),
            in_batch: 0,
            total: 0,
            summaries: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self) {
        self.in_batch += 1;
        self.total += 1;
        if self.in_batch == self.batch_size {
            self.close_batch();
        }
    }

    /// Flush the trailing partial batch, if any, and return the summaries.
    pub(crate) fn finish(mut self) -> Vec<BatchSummary> {
        if self.in_batch > 0 {
            self.close_batch();
        }
        self.summaries
    }

    fn close_batch(&mut self) {
        let summary = BatchSummary {
            batch: self.summaries.len() + 1,
            items_in_batch: self.in_batch,
            items_so_far: self.total,
            elapsed_ms: self.started.elapsed().as_millis() as u64,
        };
        tracing::debug!(
            batch = summary.batch,
            items_so_far = summary.items_so_far,
            "enumeration batch complete"
        );
        self.summaries.push(summary);
        self.in_batch = 0;
    }
}

/// List the entries of an authorized directory.
///
/// Entries that cannot be read are skipped with a warning rather than
/// failing the whole listing.
pub fn list_directory(
    guard: &AccessGuard,
    directory: &str,
    batch_size: usize,
    report_progress: bool,
) -> Result<DirectoryListing, OpError> {
    if batch_size == 0 {
        return Err(OpError::InvalidArgument(
            "batch_size must be at least 1".to_string(),
        ));
    }
    let authorized = guard.authorize(directory, AccessKind::List)?;
    let reader = std::fs::read_dir(authorized.canonical()).map_err(|source| OpError::Io {
        path: authorized.canonical().to_path_buf(),
        source,
    })?;

    let mut tracker = report_progress.then(|| ProgressTracker::new(batch_size));
    let mut entries = Vec::new();
    for entry in reader {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                tracing::warn!(
                    directory = %authorized.canonical().display(),
                    %error,
                    "skipping unreadable directory entry"
                );
                continue;
            }
        };
        entries.push(entry.file_name().to_string_lossy().into_owned());
        if let Some(tracker) = tracker.as_mut() {
            tracker.record();
        }
    }

    let total_items = entries.len();
    tracing::debug!(
        directory = %authorized.canonical().display(),
        total_items,
        "listed directory"
    );
    Ok(DirectoryListing {
        entries,
        total_items,
        batches: tracker.map(ProgressTracker::finish),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::SandboxFixture;

    #[test]
    fn test_tracker_reports_running_totals_with_partial_tail() {
        let mut tracker = ProgressTracker::new(100);
        for _ in 0..250 {
            tracker.record();
        }
        let summaries = tracker.finish();
        assert_eq!(summaries.len(), 3);
        assert_eq!(summaries[0].items_in_batch, 100);
        assert_eq!(summaries[0].items_so_far, 100);
        assert_eq!(summaries[1].items_so_far, 200);
        assert_eq!(summaries[2].batch, 3);
        assert_eq!(summaries[2].items_in_batch, 50);
        assert_eq!(summaries[2].items_so_far, 250);
    }

    #[test]
    fn test_tracker_exact_multiple_has_no_empty_tail() {
        let mut tracker = ProgressTracker::new(5);
        for _ in 0..10 {
            tracker.record();
        }
        let summaries = tracker.finish();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[1].items_so_far, 10);
    }

    #[test]
    fn test_zero_batch_size_is_rejected() {
        let sandbox = SandboxFixture::new();
        let guard = sandbox.guard(&["txt"]);
        let error =
            list_directory(&guard, sandbox.allowed().to_str().unwrap(), 0, true).unwrap_err();
        assert_eq!(error.code(), "INVALID_ARGUMENT");
    }

    #[test]
    fn test_listing_without_progress_omits_batches() {
        let sandbox = SandboxFixture::new();
        sandbox.write_allowed("a.txt", "x");
        sandbox.write_allowed("b.txt", "x");
        let guard = sandbox.guard(&["txt"]);

        let listing =
            list_directory(&guard, sandbox.allowed().to_str().unwrap(), 100, false).unwrap();
        assert_eq!(listing.total_items, 2);
        assert!(listing.batches.is_none());
    }
}
