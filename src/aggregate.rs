// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! Consolidates log entries into per-day totals and Sunday-anchored week totals.
//!
//! Buckets run from the first entry's calendar day to the last entry's,
//! inclusive. Day membership is the entry's own calendar date, so an entry
//! dated at midnight and one dated late the same evening land in one bucket.

use crate::entry_log::LogEntry;
use chrono::{Datelike, NaiveDate};
use std::time::Duration;

/// One report row: a calendar day, its total, and the week total on Sundays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DailyRow {
    pub date: NaiveDate,
    pub duration: Duration,
    pub week_total: Option<Duration>,
}

/// Whole calendar days from `from` to `to`; never negative.
fn days_between(from: NaiveDate, to: NaiveDate) -> usize {
    usize::try_from((to - from).num_days()).unwrap_or(0)
}

/// Per-day totals from the first entry's day to the last entry's day; gap days are zero.
pub fn daily_durations(entries: &[LogEntry]) -> Vec<Duration> {
    let (Some(first), Some(last)) = (entries.first(), entries.last()) else {
        return Vec::new();
    };
    let first_day = first.date.date_naive();
    let mut buckets = vec![Duration::ZERO; days_between(first_day, last.date.date_naive()) + 1];
    for entry in entries {
        let day = days_between(first_day, entry.date.date_naive());
        // Out-of-order rows past the last entry's day still count.
        if day >= buckets.len() {
            buckets.resize(day + 1, Duration::ZERO);
        }
        buckets[day] += entry.duration;
    }
    buckets
}

/// Days from `first`'s weekday forward to the next Sunday (0 on a Sunday).
pub fn week_boundary_offset(first: NaiveDate) -> usize {
    (7 - first.weekday().num_days_from_sunday() as usize) % 7
}

/// True when bucket `index` falls on a Sunday.
pub fn is_week_boundary(index: usize, offset: usize) -> bool {
    index % 7 == offset
}

/// Sum of the up to seven buckets ending at `index`.
pub fn week_total(daily: &[Duration], index: usize) -> Duration {
    let end = (index + 1).min(daily.len());
    let start = index.saturating_sub(6).min(end);
    daily[start..end].iter().sum()
}

/// Dated rows for the report, with week totals on Sunday rows only.
pub fn daily_rows(entries: &[LogEntry]) -> Vec<DailyRow> {
    let Some(first) = entries.first() else {
        return Vec::new();
    };
    let first_day = first.date.date_naive();
    let offset = week_boundary_offset(first_day);
    let daily = daily_durations(entries);
    first_day
        .iter_days()
        .zip(daily.iter())
        .enumerate()
        .map(|(i, (date, &duration))| DailyRow {
            date,
            duration,
            week_total: is_week_boundary(i, offset).then(|| week_total(&daily, i)),
        })
        .collect()
}
