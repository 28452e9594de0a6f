use std::io::{self, Write};

use dutop_core::{ScanReport, Unit};

use crate::bar_chart::proportional_bar;

/// Width used when the terminal size cannot be determined
pub const FALLBACK_WIDTH: usize = 78;

/// How the final report is printed
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub unit: Unit,
    /// Columns available for a bar, brackets excluded
    pub width: usize,
    /// Only print paths, one per line
    pub names_only: bool,
}

/// Bar width for the current terminal
pub fn terminal_width() -> usize {
    match crossterm::terminal::size() {
        Ok((cols, _)) if cols > 2 => cols as usize - 2,
        _ => FALLBACK_WIDTH,
    }
}

/// Print the largest files, biggest first, each with a bar proportional to
/// the biggest one, followed by a summary line
pub fn write_report<W: Write>(
    out: &mut W,
    report: &ScanReport,
    opts: &RenderOptions,
) -> io::Result<()> {
    if opts.names_only {
        for record in report.largest_first() {
            writeln!(out, "{}", record.path.display())?;
        }
        return Ok(());
    }

    let largest = report.largest.last().map(|r| r.size).unwrap_or(0);
    for record in report.largest_first() {
        writeln!(out, "{}: {}", opts.unit.format(record.size), record.path.display())?;
        writeln!(out, "[{}]", proportional_bar(record.size, largest, opts.width))?;
        writeln!(out)?;
    }

    let count = report.largest.len();
    writeln!(
        out,
        "{} largest file{}: {} / {} total",
        count,
        if count == 1 { "" } else { "s" },
        opts.unit.format(report.largest_total()),
        opts.unit.format(report.bytes_scanned),
    )?;

    if report.cancelled {
        writeln!(out, "(scan cancelled, results are partial)")?;
    }

    Ok(())
}
