use std::time::Duration;

use serde::Serialize;

use super::record::FileRecord;
use crate::error::ListError;

/// Message emitted while a scan runs
#[derive(Debug, Clone)]
pub enum ScanMessage {
    /// Periodic running totals
    Progress(ScanProgress),
    /// A directory could not be listed (fully or partially)
    Error(ListError),
    /// Every walk task finished
    Completed,
    /// Scan was cancelled; the report holds what was seen so far
    Cancelled,
}

/// Scanning progress statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanProgress {
    /// Number of files received by the aggregator
    pub files_scanned: u64,
    /// Number of directories listed
    pub dirs_scanned: u64,
    /// Total bytes of all files received
    pub bytes_scanned: u64,
    /// Number of listing errors
    pub errors: u64,
}

/// Final result of a scan
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    /// Largest files, ascending by size
    pub largest: Vec<FileRecord>,
    pub files_scanned: u64,
    pub bytes_scanned: u64,
    pub dirs_listed: u64,
    pub errors: u64,
    /// Highest number of directory listings that ran at the same time
    pub peak_listings: usize,
    pub cancelled: bool,
    #[serde(skip)]
    pub elapsed: Duration,
}

impl ScanReport {
    /// Largest files, biggest first
    pub fn largest_first(&self) -> impl Iterator<Item = &FileRecord> {
        self.largest.iter().rev()
    }

    /// Combined size of the reported files
    pub fn largest_total(&self) -> u64 {
        self.largest.iter().map(|r| r.size).sum()
    }
}
