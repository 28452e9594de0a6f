use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, select};
use tracing::{debug, info};

use super::cancel::CancellationToken;
use super::lister::DirLister;
use super::progress::{ScanMessage, ScanProgress, ScanReport};
use super::record::FileRecord;
use super::task::{TaskBarrier, WalkTask};
use super::tokens::TokenPool;
use crate::filter::ExclusionSet;
use crate::top::TopFiles;
use crate::{DutopError, Result};

/// Scanner configuration
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Number of largest files to keep
    pub top_n: usize,
    /// Maximum concurrent directory listings (values below 1 mean 1)
    pub concurrency: usize,
    /// Descend into subdirectories
    pub recurse: bool,
    /// Number of worker threads running walk tasks (0 = auto)
    pub num_threads: usize,
    /// How often running totals are reported
    pub progress_interval: Duration,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            concurrency: 20,
            recurse: true,
            num_threads: 0, // auto
            progress_interval: Duration::from_millis(500),
        }
    }
}

/// State shared by every walk task of one scan
struct WalkContext {
    lister: DirLister,
    exclusions: Arc<ExclusionSet>,
    cancel: CancellationToken,
    recurse: bool,
}

/// Finds the largest files under one or more roots
pub struct Scanner {
    config: ScanConfig,
    exclusions: Arc<ExclusionSet>,
    cancel_token: CancellationToken,
}

impl Scanner {
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            exclusions: Arc::new(ExclusionSet::default()),
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn with_exclusions(mut self, exclusions: ExclusionSet) -> Self {
        self.exclusions = Arc::new(exclusions);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel_token = token;
        self
    }

    /// Start scanning `roots` (the current directory when empty)
    ///
    /// Returns a receiver for progress and listing errors, and the handle of
    /// the aggregating thread whose result is the final report. The receiver
    /// disconnects once every walk task is done.
    pub fn scan(
        self,
        roots: Vec<PathBuf>,
    ) -> Result<(Receiver<ScanMessage>, JoinHandle<ScanReport>)> {
        if self.config.top_n == 0 {
            return Err(DutopError::InvalidConfig(
                "number of files to report must be at least 1".into(),
            ));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.num_threads)
            .thread_name(|i| format!("dutop-walk-{i}"))
            .build()?;

        let roots = if roots.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            roots
        };

        let (tx, rx) = crossbeam_channel::unbounded();
        let handle = std::thread::Builder::new()
            .name("dutop-aggregate".into())
            .spawn(move || self.scan_sync(pool, roots, tx))?;

        Ok((rx, handle))
    }

    /// Aggregation loop (runs in its own thread)
    fn scan_sync(
        self,
        pool: rayon::ThreadPool,
        roots: Vec<PathBuf>,
        tx: Sender<ScanMessage>,
    ) -> ScanReport {
        let start = Instant::now();
        let ctx = Arc::new(WalkContext {
            lister: DirLister::new(
                TokenPool::new(self.config.concurrency),
                self.cancel_token.clone(),
                tx.clone(),
            ),
            exclusions: Arc::clone(&self.exclusions),
            cancel: self.cancel_token.clone(),
            recurse: self.config.recurse,
        });

        // Rendezvous channel: a walk task blocks until its record is taken.
        let (record_tx, record_rx) = crossbeam_channel::bounded::<FileRecord>(0);
        let barrier = TaskBarrier::new(record_tx);
        for root in roots {
            let task = barrier.enter();
            let ctx = Arc::clone(&ctx);
            pool.spawn(move || walk_dir(ctx, root, task));
        }
        drop(barrier);

        let ticker = crossbeam_channel::tick(self.config.progress_interval);
        let mut top = TopFiles::new(self.config.top_n);
        let mut files_scanned: u64 = 0;
        let mut bytes_scanned: u64 = 0;
        let mut cancelled = false;

        loop {
            if self.cancel_token.is_cancelled() {
                cancelled = true;
                break;
            }
            select! {
                recv(self.cancel_token.signal()) -> _ => {
                    cancelled = true;
                    break;
                }
                recv(record_rx) -> msg => match msg {
                    Ok(record) => {
                        files_scanned += 1;
                        bytes_scanned += record.size;
                        top.offer(record, &self.exclusions);
                    }
                    // All walk tasks finished
                    Err(_) => break,
                },
                recv(ticker) -> _ => {
                    let progress = ScanProgress {
                        files_scanned,
                        dirs_scanned: ctx.lister.listed(),
                        bytes_scanned,
                        errors: ctx.lister.failures(),
                    };
                    let _ = tx.send(ScanMessage::Progress(progress));
                }
            }
        }

        if cancelled {
            debug!("scan cancelled, draining walk tasks");
            // Keep receiving until every producer has exited so none stays
            // blocked on a send.
            for _ in record_rx.iter() {}
        }

        let report = ScanReport {
            largest: top.into_sorted_vec(),
            files_scanned,
            bytes_scanned,
            dirs_listed: ctx.lister.listed(),
            errors: ctx.lister.failures(),
            peak_listings: ctx.lister.tokens().peak(),
            cancelled,
            elapsed: start.elapsed(),
        };

        debug!(peak_listings = report.peak_listings, "listing concurrency");
        info!(
            files = report.files_scanned,
            bytes = report.bytes_scanned,
            dirs = report.dirs_listed,
            errors = report.errors,
            cancelled = report.cancelled,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "scan finished"
        );

        let _ = tx.send(ScanMessage::Progress(ScanProgress {
            files_scanned: report.files_scanned,
            dirs_scanned: report.dirs_listed,
            bytes_scanned: report.bytes_scanned,
            errors: report.errors,
        }));
        let _ = tx.send(if cancelled {
            ScanMessage::Cancelled
        } else {
            ScanMessage::Completed
        });

        report
    }
}

/// Walk one directory, spawning a task per subdirectory
///
/// `task` is released when this returns, whichever way it returns.
fn walk_dir(ctx: Arc<WalkContext>, dir: PathBuf, task: WalkTask) {
    if ctx.cancel.is_cancelled() {
        return;
    }

    for entry in ctx.lister.list(&dir) {
        let path = dir.join(&entry.name);
        if entry.is_dir {
            if ctx.recurse && !ctx.exclusions.is_excluded(&path) {
                let child = task.fork();
                let ctx = Arc::clone(&ctx);
                rayon::spawn(move || walk_dir(ctx, path, child));
            }
        } else if !task.emit(FileRecord::new(path, entry.size), &ctx.cancel) {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_file(path: &Path, size: usize) {
        fs::write(path, vec![b'x'; size]).unwrap();
    }

    /// a (100), b (50), d/c (200)
    fn sample_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        write_file(&temp.path().join("a"), 100);
        write_file(&temp.path().join("b"), 50);
        fs::create_dir(temp.path().join("d")).unwrap();
        write_file(&temp.path().join("d/c"), 200);
        temp
    }

    /// `dirs` directories with `files` files each, sizes all distinct
    fn wide_tree(dirs: usize, files: usize) -> TempDir {
        let temp = TempDir::new().unwrap();
        for d in 0..dirs {
            let dir = temp.path().join(format!("dir{d}"));
            fs::create_dir(&dir).unwrap();
            for f in 0..files {
                write_file(&dir.join(format!("f{f}")), d * files + f + 1);
            }
        }
        temp
    }

    fn run(scanner: Scanner, roots: Vec<PathBuf>) -> (Vec<ScanMessage>, ScanReport) {
        let (rx, handle) = scanner.scan(roots).unwrap();
        let messages: Vec<_> = rx.iter().collect();
        (messages, handle.join().unwrap())
    }

    fn config(top_n: usize) -> ScanConfig {
        ScanConfig {
            top_n,
            progress_interval: Duration::from_millis(5),
            ..ScanConfig::default()
        }
    }

    fn named(report: &ScanReport) -> Vec<(String, u64)> {
        report
            .largest
            .iter()
            .map(|r| {
                let name = r.path.file_name().unwrap().to_string_lossy().to_string();
                (name, r.size)
            })
            .collect()
    }

    fn expected(items: &[(&str, u64)]) -> Vec<(String, u64)> {
        items.iter().map(|(n, s)| (n.to_string(), *s)).collect()
    }

    #[test]
    fn test_scan_empty_dir() {
        let temp = TempDir::new().unwrap();
        let (messages, report) = run(Scanner::new(config(3)), vec![temp.path().to_path_buf()]);

        assert!(report.largest.is_empty());
        assert_eq!(report.files_scanned, 0);
        assert_eq!(report.dirs_listed, 1);
        assert!(!report.cancelled);
        assert!(matches!(messages.last(), Some(ScanMessage::Completed)));
    }

    #[test]
    fn test_top_two_of_sample_tree() {
        let temp = sample_tree();
        let (_, report) = run(Scanner::new(config(2)), vec![temp.path().to_path_buf()]);

        assert_eq!(named(&report), expected(&[("a", 100), ("c", 200)]));
        assert_eq!(report.files_scanned, 3);
        assert_eq!(report.bytes_scanned, 350);
        assert_eq!(report.largest_total(), 300);
        assert_eq!(report.largest_first().next().unwrap().size, 200);
        assert!(report.largest[1].path.ends_with("d/c"));
    }

    #[test]
    fn test_excluded_directory_is_pruned() {
        let temp = sample_tree();
        let scanner = Scanner::new(config(2)).with_exclusions(ExclusionSet::new(["/d$"]).unwrap());
        let (_, report) = run(scanner, vec![temp.path().to_path_buf()]);

        assert_eq!(named(&report), expected(&[("b", 50), ("a", 100)]));
        assert_eq!(report.files_scanned, 2);
        assert_eq!(report.bytes_scanned, 150);
        // only the root was ever listed
        assert_eq!(report.dirs_listed, 1);
    }

    #[test]
    fn test_excluded_file_is_counted_but_not_reported() {
        let temp = sample_tree();
        let scanner = Scanner::new(config(3)).with_exclusions(ExclusionSet::new(["/a$"]).unwrap());
        let (_, report) = run(scanner, vec![temp.path().to_path_buf()]);

        assert_eq!(named(&report), expected(&[("b", 50), ("c", 200)]));
        assert_eq!(report.files_scanned, 3);
        assert_eq!(report.bytes_scanned, 350);
    }

    #[test]
    fn test_no_recursion() {
        let temp = sample_tree();
        let scanner = Scanner::new(ScanConfig {
            recurse: false,
            ..config(5)
        });
        let (_, report) = run(scanner, vec![temp.path().to_path_buf()]);

        assert_eq!(named(&report), expected(&[("b", 50), ("a", 100)]));
        assert_eq!(report.dirs_listed, 1);
    }

    #[test]
    fn test_multiple_roots() {
        let first = sample_tree();
        let second = TempDir::new().unwrap();
        write_file(&second.path().join("huge"), 1_000);

        let roots = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        let (_, report) = run(Scanner::new(config(2)), roots);

        assert_eq!(named(&report), expected(&[("c", 200), ("huge", 1_000)]));
        assert_eq!(report.files_scanned, 4);
        assert_eq!(report.bytes_scanned, 1_350);
    }

    #[test]
    fn test_matches_full_sort_and_is_repeatable() {
        let temp = wide_tree(12, 15);
        let mut sizes: Vec<u64> = (1..=180).collect();
        sizes.reverse();
        let mut expected: Vec<u64> = sizes.into_iter().take(7).collect();
        expected.reverse();

        let mut totals = Vec::new();
        for _ in 0..2 {
            let (_, report) = run(Scanner::new(config(7)), vec![temp.path().to_path_buf()]);
            let got: Vec<u64> = report.largest.iter().map(|r| r.size).collect();
            assert_eq!(got, expected);
            assert_eq!(report.files_scanned, 180);
            totals.push(report.bytes_scanned);
        }
        assert_eq!(totals[0], totals[1]);
        assert_eq!(totals[0], (1..=180).sum::<u64>());
    }

    #[test]
    fn test_listing_concurrency_stays_bounded() {
        let temp = wide_tree(40, 2);
        let scanner = Scanner::new(ScanConfig {
            concurrency: 2,
            num_threads: 8,
            ..config(3)
        });
        let (_, report) = run(scanner, vec![temp.path().to_path_buf()]);

        assert_eq!(report.dirs_listed, 41);
        assert!(report.peak_listings >= 1);
        assert!(report.peak_listings <= 2);
    }

    #[test]
    fn test_missing_root_reports_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("gone");
        let (messages, report) = run(Scanner::new(config(1)), vec![missing.clone()]);

        assert_eq!(report.errors, 1);
        assert!(report.largest.is_empty());
        assert!(
            messages
                .iter()
                .any(|m| matches!(m, ScanMessage::Error(e) if e.path == missing))
        );
        assert!(matches!(messages.last(), Some(ScanMessage::Completed)));
    }

    #[test]
    fn test_cancel_before_scan() {
        let temp = sample_tree();
        let token = CancellationToken::new();
        token.cancel();

        let scanner = Scanner::new(config(2)).with_cancellation(token);
        let (messages, report) = run(scanner, vec![temp.path().to_path_buf()]);

        assert!(report.cancelled);
        assert!(report.largest.is_empty());
        assert_eq!(report.files_scanned, 0);
        assert!(matches!(messages.last(), Some(ScanMessage::Cancelled)));
    }

    #[test]
    fn test_cancel_during_scan_terminates() {
        const TOTAL: u64 = 80 * 50;
        let temp = wide_tree(80, 50);
        let token = CancellationToken::new();
        let scanner = Scanner::new(ScanConfig {
            top_n: 5,
            concurrency: 1,
            num_threads: 1,
            progress_interval: Duration::from_millis(1),
            ..ScanConfig::default()
        })
        .with_cancellation(token.clone());

        let (rx, handle) = scanner.scan(vec![temp.path().to_path_buf()]).unwrap();
        let mut messages = Vec::new();
        for msg in rx.iter() {
            // first tick while records are still flowing
            if let ScanMessage::Progress(p) = &msg
                && p.files_scanned < TOTAL
            {
                token.cancel();
            }
            messages.push(msg);
        }
        let report = handle.join().unwrap();

        assert!(report.cancelled);
        assert!(report.files_scanned < TOTAL);
        assert!(report.largest.len() <= 5);
        // whatever was kept is sorted and genuinely from the tree
        let got: Vec<u64> = report.largest.iter().map(|r| r.size).collect();
        assert!(got.windows(2).all(|w| w[0] <= w[1]));
        assert!(got.iter().all(|&s| (1..=TOTAL).contains(&s)));
        assert!(matches!(messages.last(), Some(ScanMessage::Cancelled)));
        assert!(
            !messages
                .iter()
                .any(|m| matches!(m, ScanMessage::Completed))
        );
    }

    #[test]
    fn test_cancel_after_completion_is_harmless() {
        let temp = sample_tree();
        let token = CancellationToken::new();
        let scanner = Scanner::new(config(2)).with_cancellation(token.clone());
        let (_, report) = run(scanner, vec![temp.path().to_path_buf()]);
        token.cancel();

        assert!(!report.cancelled);
        assert_eq!(report.bytes_scanned, 350);
    }

    #[test]
    fn test_zero_top_n_is_rejected() {
        let err = Scanner::new(config(0)).scan(Vec::new()).unwrap_err();
        assert!(matches!(err, DutopError::InvalidConfig(_)));
    }
}
