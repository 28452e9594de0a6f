// Run with: cargo run -p dutop-core --example debug_scan -- /path/to/scan [concurrency]
// Prints every scan message with a timestamp, and flags stalls where the
// file count stops moving between progress updates.

use dutop_core::{ScanConfig, ScanMessage, Scanner, format_size};
use std::path::PathBuf;
use std::time::{Duration, Instant};

fn main() {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let concurrency = std::env::args()
        .nth(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(ScanConfig::default().concurrency);

    println!("Scanning: {:?} (concurrency {})", path, concurrency);

    let scanner = Scanner::new(ScanConfig {
        concurrency,
        progress_interval: Duration::from_millis(250),
        ..ScanConfig::default()
    });
    let (rx, handle) = scanner.scan(vec![path]).unwrap();

    let start = Instant::now();
    let mut last_files = 0u64;
    let mut stuck_count = 0;

    for msg in rx {
        let t = start.elapsed().as_secs_f64();
        match msg {
            ScanMessage::Progress(p) => {
                if p.files_scanned == last_files {
                    stuck_count += 1;
                } else {
                    stuck_count = 0;
                }
                last_files = p.files_scanned;
                println!(
                    "[{:>6.1}s] files={:<8} dirs={:<8} bytes={:<12} errors={:<4} stuck={}",
                    t, p.files_scanned, p.dirs_scanned, p.bytes_scanned, p.errors, stuck_count
                );
            }
            ScanMessage::Error(e) => println!("[{:>6.1}s] ERROR: {}", t, e),
            ScanMessage::Completed => println!("[{:>6.1}s] COMPLETED", t),
            ScanMessage::Cancelled => println!("[{:>6.1}s] CANCELLED", t),
        }
    }

    let report = handle.join().unwrap();
    println!(
        "\nFinal: {} files, {} total, peak {} concurrent listings",
        report.files_scanned,
        format_size(report.bytes_scanned),
        report.peak_listings
    );
    for record in report.largest_first() {
        println!("{:>12}  {}", format_size(record.size), record.path.display());
    }
}
