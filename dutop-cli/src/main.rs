mod bar_chart;
mod input;
mod report;

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use dutop_core::{
    CancellationToken, ExclusionSet, ScanConfig, ScanMessage, Scanner, Unit, format_count,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use report::{RenderOptions, terminal_width, write_report};

/// dutop - find the largest files under one or more directories
#[derive(Parser, Debug)]
#[command(name = "dutop")]
#[command(about = "Find the largest files under one or more directories")]
#[command(version)]
struct Args {
    /// Directories to scan (defaults to current directory)
    #[arg(default_value = ".")]
    roots: Vec<PathBuf>,

    /// Print this number of largest files
    #[arg(short = 'n', long = "count", value_name = "NUMBER", default_value_t = 10,
          value_parser = clap::value_parser!(u64).range(1..))]
    count: u64,

    /// Print file names only (e.g., for xargs scripting)
    #[arg(short = 'o', long)]
    names_only: bool,

    /// Files from the given directories only (no recursion)
    #[arg(short = 'c', long)]
    current_only: bool,

    /// Allow this number of concurrent directory listings (values <= 0 become 1)
    #[arg(long, value_name = "NUMBER", default_value_t = 20, allow_negative_numbers = true)]
    concurrent: i64,

    /// Print sizes in this unit (B, KiB, MiB, GiB, TiB, KB, MB, GB, TB)
    #[arg(short = 'u', long, value_name = "UNIT", default_value = "GiB")]
    unit: Unit,

    /// Ignore files/directories matching this regex (can be used multiple times)
    #[arg(short = 'i', long = "ignore", value_name = "REGEX")]
    ignore: Vec<String>,

    /// Worker threads for walking (0 = one per CPU)
    #[arg(short = 'j', long, value_name = "NUMBER", default_value_t = 0)]
    threads: usize,

    /// Print the report as JSON
    #[arg(long, conflicts_with = "names_only")]
    json: bool,

    /// Verbose logging to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            top_n: self.count as usize,
            concurrency: self.concurrent.max(1) as usize,
            recurse: !self.current_only,
            num_threads: self.threads,
            ..ScanConfig::default()
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    setup_logging(args.verbose);

    // Configuration errors surface here, before anything is walked
    let exclusions = ExclusionSet::new(&args.ignore)?;
    debug!(patterns = %exclusions, "exclusions compiled");

    let cancel_token = CancellationToken::new();
    let _listener = input::spawn_stdin_listener(cancel_token.clone());

    let scanner = Scanner::new(args.scan_config())
        .with_exclusions(exclusions)
        .with_cancellation(cancel_token);
    let (progress_rx, scan_handle) = scanner.scan(args.roots.clone())?;

    let program = env!("CARGO_BIN_NAME");
    for msg in progress_rx {
        match msg {
            ScanMessage::Progress(progress) => {
                eprintln!(
                    "Processed: {} files  {}",
                    format_count(progress.files_scanned),
                    args.unit.format(progress.bytes_scanned)
                );
            }
            ScanMessage::Error(err) => eprintln!("{program}: {err}"),
            ScanMessage::Cancelled => info!("scan stopped by user"),
            ScanMessage::Completed => debug!("scan completed"),
        }
    }

    let report = scan_handle
        .join()
        .map_err(|_| eyre!("scanner thread panicked"))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
    } else {
        let opts = RenderOptions {
            unit: args.unit,
            width: terminal_width(),
            names_only: args.names_only,
        };
        write_report(&mut out, &report, &opts)?;
    }
    out.flush()?;

    Ok(())
}

fn setup_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("dutop=debug,dutop_core=debug,warn")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
