// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! Tab-delimited daily table: `date<TAB>duration<TAB>week total`.

use crate::aggregate::DailyRow;
use std::io::{self, Write};
use std::time::Duration;

const NANOS_PER_MINUTE: u128 = 60_000_000_000;

/// Renders a duration as `HHhMMm`, rounded to the nearest minute (30s rounds up).
///
/// Hours are at least two digits and grow as needed: `00h00m`, `07h05m`, `123h59m`.
pub fn format_duration(d: Duration) -> String {
    let minutes = (d.as_nanos() + NANOS_PER_MINUTE / 2) / NANOS_PER_MINUTE;
    format!("{:02}h{:02}m", minutes / 60, minutes % 60)
}

/// Writes one line per row; the third column is empty except on week-boundary rows.
pub fn render<W: Write>(rows: &[DailyRow], mut out: W) -> io::Result<()> {
    for row in rows {
        let week = row.week_total.map(format_duration).unwrap_or_default();
        writeln!(
            out,
            "{}\t{}\t{}",
            row.date.format("%Y-%m-%d"),
            format_duration(row.duration),
            week
        )?;
    }
    out.flush()
}
