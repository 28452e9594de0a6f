use std::ffi::OsString;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_channel::Sender;
use tracing::debug;

use super::cancel::CancellationToken;
use super::progress::ScanMessage;
use super::tokens::TokenPool;
use crate::error::ListError;

/// One entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub name: OsString,
    pub is_dir: bool,
    /// Apparent size in bytes (from non-following metadata)
    pub size: u64,
}

/// Lists single directories under the token pool
///
/// Failures go to the error sink and never abort the scan: an unopenable
/// directory yields nothing, a partially readable one yields what was read.
pub struct DirLister {
    tokens: TokenPool,
    cancel: CancellationToken,
    errors: Sender<ScanMessage>,
    listed: AtomicU64,
    failures: AtomicU64,
}

impl DirLister {
    pub fn new(tokens: TokenPool, cancel: CancellationToken, errors: Sender<ScanMessage>) -> Self {
        Self {
            tokens,
            cancel,
            errors,
            listed: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        }
    }

    pub fn list(&self, dir: &Path) -> Vec<DirEntryInfo> {
        let Some(_token) = self.tokens.acquire(&self.cancel) else {
            return Vec::new();
        };
        self.listed.fetch_add(1, Ordering::Relaxed);

        let read_dir = match fs::read_dir(dir) {
            Ok(rd) => rd,
            Err(e) => {
                self.report(dir, &e);
                return Vec::new();
            }
        };

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    self.report(dir, &e);
                    continue;
                }
            };

            // DirEntry::metadata does not traverse symlinks
            match entry.metadata() {
                Ok(meta) => entries.push(DirEntryInfo {
                    name: entry.file_name(),
                    is_dir: meta.is_dir(),
                    size: meta.len(),
                }),
                Err(e) => self.report(&entry.path(), &e),
            }
        }

        entries
    }

    /// Directories whose listing was attempted
    pub fn listed(&self) -> u64 {
        self.listed.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    pub fn tokens(&self) -> &TokenPool {
        &self.tokens
    }

    fn report(&self, path: &Path, err: &std::io::Error) {
        debug!(path = %path.display(), error = %err, "listing failed");
        self.failures.fetch_add(1, Ordering::Relaxed);
        let _ = self.errors.send(ScanMessage::Error(ListError::new(path, err)));
    }
}
