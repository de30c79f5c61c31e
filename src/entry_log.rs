// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! # Entry log
//!
//! One row per tracked day:
//!
//! - `2024-03-04T00:00:00+01:00,1h 30m`
//!
//! The first field is an RFC 3339 timestamp (day membership comes from its
//! calendar date), the second a humantime duration (`1h 30m`, `1h2m3s`).
//! Rows are appended; the last row is rewritten when a stop lands on the same
//! day as the previous one.

use crate::error::{Error, Result};
use crate::files;
use chrono::{DateTime, FixedOffset, SecondsFormat, TimeDelta, Timelike};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Tracked time for one calendar day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogEntry {
    pub date: DateTime<FixedOffset>,
    pub duration: Duration,
}

impl LogEntry {
    /// Formats the entry as a log row, newline included.
    fn to_row(self) -> String {
        format!(
            "{},{}\n",
            self.date.to_rfc3339_opts(SecondsFormat::AutoSi, false),
            humantime::format_duration(self.duration)
        )
    }

    /// Parses one log row; the error is a human-readable reason.
    fn parse_row(line: &str) -> std::result::Result<LogEntry, String> {
        let fields: Vec<&str> = line
            .split(',')
            .map(|f| f.trim().trim_matches('"'))
            .collect();
        if fields.len() != 2 {
            return Err(format!("expected 2 fields, found {}", fields.len()));
        }
        let date = DateTime::parse_from_rfc3339(fields[0])
            .map_err(|e| format!("bad timestamp {:?}: {}", fields[0], e))?;
        let duration = humantime::parse_duration(fields[1])
            .map_err(|e| format!("bad duration {:?}: {}", fields[1], e))?;
        Ok(LogEntry { date, duration })
    }
}

/// Midnight at the start of `dt`'s calendar day, in `dt`'s offset.
pub fn day_start(dt: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    dt - TimeDelta::seconds(i64::from(dt.num_seconds_from_midnight()))
        - TimeDelta::nanoseconds(i64::from(dt.nanosecond()))
}

/// What [`EntryLog::append_or_merge`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergeOutcome {
    /// A new row was added for today.
    Appended(LogEntry),
    /// Today's row was replaced; `previous` is the duration it held before.
    Merged { entry: LogEntry, previous: Duration },
}

impl MergeOutcome {
    pub fn entry(&self) -> LogEntry {
        match *self {
            MergeOutcome::Appended(entry) | MergeOutcome::Merged { entry, .. } => entry,
        }
    }
}

/// Backing store for the log: whole-content reads, appends and full rewrites.
pub trait LogStorage {
    /// Where the log lives, for error messages.
    fn location(&self) -> &Path;
    /// Entire log text; an absent log reads as empty.
    fn load(&self) -> Result<String>;
    fn append(&mut self, row: &str) -> Result<()>;
    /// Replaces the whole log with `contents`, all or nothing.
    fn replace(&mut self, contents: &str) -> Result<()>;
}

/// Log stored in a file on disk.
#[derive(Clone, Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStorage { path: path.into() }
    }
}

impl LogStorage for FileStorage {
    fn location(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<String> {
        tracing::debug!(path = %self.path.display(), "reading entry log");
        Ok(files::read_optional(&self.path)?.unwrap_or_default())
    }

    fn append(&mut self, row: &str) -> Result<()> {
        files::append_line(&self.path, row)
    }

    fn replace(&mut self, contents: &str) -> Result<()> {
        files::write_atomic(&self.path, contents.as_bytes())
    }
}

/// Log held in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    contents: String,
}

impl MemoryStorage {
    pub fn new(contents: impl Into<String>) -> Self {
        MemoryStorage {
            contents: contents.into(),
        }
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }
}

impl LogStorage for MemoryStorage {
    fn location(&self) -> &Path {
        Path::new("<memory>")
    }

    fn load(&self) -> Result<String> {
        Ok(self.contents.clone())
    }

    fn append(&mut self, row: &str) -> Result<()> {
        self.contents.push_str(row);
        Ok(())
    }

    fn replace(&mut self, contents: &str) -> Result<()> {
        self.contents = contents.to_string();
        Ok(())
    }
}

#[derive(Debug)]
pub struct EntryLog<S> {
    storage: S,
}

impl EntryLog<FileStorage> {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        EntryLog::new(FileStorage::new(path))
    }
}

impl<S: LogStorage> EntryLog<S> {
    pub fn new(storage: S) -> Self {
        EntryLog { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Parses every row; blank lines are skipped and a malformed row is an error.
    pub fn read_all(&self) -> Result<Vec<LogEntry>> {
        let content = self.storage.load()?;
        parse_entries(&content, self.storage.location())
    }

    /// Records `duration` for the day of `now`.
    ///
    /// Adds a row dated today's midnight unless the last row already falls on
    /// today, in which case that row is replaced by one holding the sum.
    pub fn append_or_merge(
        &mut self,
        now: DateTime<FixedOffset>,
        duration: Duration,
    ) -> Result<MergeOutcome> {
        let content = self.storage.load()?;
        let entries = parse_entries(&content, self.storage.location())?;
        let today = day_start(now);

        let last = match entries.last() {
            Some(last) if last.date.date_naive() == now.date_naive() => *last,
            Some(last) => {
                tracing::debug!(last = ?last, "last entry is from an earlier day");
                return self.append(&content, today, duration);
            }
            None => {
                tracing::debug!("log is empty");
                return self.append(&content, today, duration);
            }
        };

        let entry = LogEntry {
            date: today,
            duration: last.duration + duration,
        };
        self.storage
            .replace(&replace_last_row(&content, &entry.to_row()))?;
        tracing::debug!(?entry, previous = ?last.duration, "merged into today's entry");
        Ok(MergeOutcome::Merged {
            entry,
            previous: last.duration,
        })
    }

    /// Appends a row after `content`, first ending an unterminated last line.
    fn append(
        &mut self,
        content: &str,
        date: DateTime<FixedOffset>,
        duration: Duration,
    ) -> Result<MergeOutcome> {
        let entry = LogEntry { date, duration };
        let row = if content.is_empty() || content.ends_with('\n') {
            entry.to_row()
        } else {
            format!("\n{}", entry.to_row())
        };
        self.storage.append(&row)?;
        tracing::debug!(?entry, "added new entry");
        Ok(MergeOutcome::Appended(entry))
    }
}

fn parse_entries(content: &str, location: &Path) -> Result<Vec<LogEntry>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            LogEntry::parse_row(line).map_err(|reason| Error::LogParse {
                path: location.to_path_buf(),
                line: i + 1,
                reason,
            })
        })
        .collect()
}

/// `content` with its last non-blank line swapped for `row`; earlier lines are kept verbatim.
fn replace_last_row(content: &str, row: &str) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let keep = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .unwrap_or(lines.len());
    let mut out: String = lines[..keep].iter().map(|l| format!("{}\n", l)).collect();
    out.push_str(row);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn tz() -> FixedOffset {
        FixedOffset::east_opt(2 * 3600).unwrap()
    }

    fn at(d: u32, h: u32, m: u32) -> DateTime<FixedOffset> {
        tz().with_ymd_and_hms(2024, 3, d, h, m, 0).unwrap()
    }

    fn mins(m: u64) -> Duration {
        Duration::from_secs(m * 60)
    }

    #[test]
    fn test_day_start() {
        let dt = at(4, 17, 45) + TimeDelta::nanoseconds(123);
        assert_eq!(day_start(dt), at(4, 0, 0));
        assert_eq!(day_start(at(4, 0, 0)), at(4, 0, 0));
    }

    #[test]
    fn test_parse_row() {
        let entry = LogEntry::parse_row("2024-03-04T00:00:00+02:00,1h 30m").unwrap();
        assert_eq!(entry.date, at(4, 0, 0));
        assert_eq!(entry.duration, mins(90));
    }

    #[test]
    fn test_parse_row_compact_duration_and_nanosecond_timestamp() {
        let entry =
            LogEntry::parse_row("2024-03-04T18:01:02.123456789+02:00,1h2m3s").unwrap();
        assert_eq!(entry.date.date_naive(), at(4, 0, 0).date_naive());
        assert_eq!(entry.duration, Duration::from_secs(3723));
    }

    #[test]
    fn test_parse_row_fractional_seconds() {
        let entry =
            LogEntry::parse_row("2020-05-01T18:02:03.123456789-07:00,1h30m5.123456789s")
                .unwrap();
        assert_eq!(entry.duration, Duration::new(5405, 123_456_789));
    }

    #[test]
    fn test_parse_row_invalid() {
        assert!(LogEntry::parse_row("2024-03-04T00:00:00+02:00").is_err());
        assert!(LogEntry::parse_row("yesterday,1h").is_err());
        assert!(LogEntry::parse_row("2024-03-04T00:00:00+02:00,soon").is_err());
        assert!(LogEntry::parse_row("2024-03-04T00:00:00+02:00,1h,extra").is_err());
    }

    #[test]
    fn test_row_round_trip() {
        let entry = LogEntry {
            date: at(4, 0, 0),
            duration: Duration::new(5400, 250_000_000),
        };
        let row = entry.to_row();
        assert!(row.ends_with('\n'));
        assert_eq!(LogEntry::parse_row(row.trim_end()).unwrap(), entry);
    }

    #[test]
    fn test_read_all_empty() {
        let log = EntryLog::new(MemoryStorage::default());
        assert!(log.read_all().unwrap().is_empty());
        let log = EntryLog::new(MemoryStorage::new("\n\n"));
        assert!(log.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_read_all_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let log = EntryLog::open(dir.path().join("timesheet.csv"));
        assert!(log.read_all().unwrap().is_empty());
        assert!(!dir.path().join("timesheet.csv").exists());
    }

    #[test]
    fn test_read_all_reports_bad_line() {
        let log = EntryLog::new(MemoryStorage::new(
            "2024-03-04T00:00:00+02:00,1h\n\nnot a row\n",
        ));
        match log.read_all() {
            Err(Error::LogParse { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected LogParse, got {:?}", other),
        }
    }

    #[test]
    fn test_append_to_empty_log() {
        let mut log = EntryLog::new(MemoryStorage::default());
        let outcome = log.append_or_merge(at(4, 10, 30), mins(90)).unwrap();
        assert_eq!(
            outcome,
            MergeOutcome::Appended(LogEntry {
                date: at(4, 0, 0),
                duration: mins(90)
            })
        );
        assert_eq!(log.storage().contents(), "2024-03-04T00:00:00+02:00,1h 30m\n");
    }

    #[test]
    fn test_append_after_unterminated_last_row() {
        let mut log = EntryLog::new(MemoryStorage::new("2024-03-03T00:00:00+02:00,1h"));
        log.append_or_merge(at(4, 9, 0), mins(1)).unwrap();
        assert_eq!(
            log.storage().contents(),
            "2024-03-03T00:00:00+02:00,1h\n2024-03-04T00:00:00+02:00,1m\n"
        );
        assert_eq!(log.read_all().unwrap().len(), 2);
    }

    #[test]
    fn test_file_append_after_unterminated_last_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timesheet.csv");
        fs::write(&path, "2024-03-03T00:00:00+02:00,1h").unwrap();
        let mut log = EntryLog::open(&path);
        log.append_or_merge(at(4, 9, 0), mins(30)).unwrap();
        log.append_or_merge(at(4, 10, 0), mins(15)).unwrap();
        let entries = log.read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].duration, mins(45));
    }

    #[test]
    fn test_same_day_stops_merge() {
        let mut log = EntryLog::new(MemoryStorage::default());
        log.append_or_merge(at(4, 10, 0), mins(30)).unwrap();
        let outcome = log.append_or_merge(at(4, 16, 0), mins(45)).unwrap();
        assert_eq!(
            outcome,
            MergeOutcome::Merged {
                entry: LogEntry {
                    date: at(4, 0, 0),
                    duration: mins(75)
                },
                previous: mins(30),
            }
        );
        let entries = log.read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].duration, mins(75));
    }

    #[test]
    fn test_different_days_append() {
        let mut log = EntryLog::new(MemoryStorage::default());
        log.append_or_merge(at(4, 23, 50), mins(30)).unwrap();
        log.append_or_merge(at(5, 0, 10), mins(45)).unwrap();
        let entries = log.read_all().unwrap();
        assert_eq!(
            entries,
            vec![
                LogEntry {
                    date: at(4, 0, 0),
                    duration: mins(30)
                },
                LogEntry {
                    date: at(5, 0, 0),
                    duration: mins(45)
                },
            ]
        );
    }

    #[test]
    fn test_merge_with_untruncated_legacy_row() {
        let mut log = EntryLog::new(MemoryStorage::new(
            "2024-03-03T00:00:00+02:00,2h\n2024-03-04T09:12:00.5+02:00,1h2m3s\n",
        ));
        log.append_or_merge(at(4, 18, 0), mins(57)).unwrap();
        assert_eq!(
            log.storage().contents(),
            "2024-03-03T00:00:00+02:00,2h\n2024-03-04T00:00:00+02:00,1h 59m 3s\n"
        );
    }

    #[test]
    fn test_merge_keeps_earlier_rows_verbatim() {
        let earlier = "2024-03-01T00:00:00+02:00,1h2m3s\n\n";
        let mut log = EntryLog::new(MemoryStorage::new(format!(
            "{}2024-03-04T00:00:00+02:00,1h\n\n",
            earlier
        )));
        log.append_or_merge(at(4, 12, 0), mins(30)).unwrap();
        assert_eq!(
            log.storage().contents(),
            format!("{}2024-03-04T00:00:00+02:00,1h 30m\n", earlier)
        );
    }

    #[test]
    fn test_append_or_merge_rejects_corrupt_log() {
        let mut log = EntryLog::new(MemoryStorage::new("garbage\n"));
        assert!(log.append_or_merge(at(4, 12, 0), mins(30)).is_err());
        assert_eq!(log.storage().contents(), "garbage\n");
    }

    #[test]
    fn test_file_log_merge_and_append() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("timesheet.csv");
        let mut log = EntryLog::open(&path);
        log.append_or_merge(at(4, 10, 0), mins(30)).unwrap();
        log.append_or_merge(at(4, 11, 0), mins(45)).unwrap();
        log.append_or_merge(at(6, 9, 0), mins(10)).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "2024-03-04T00:00:00+02:00,1h 15m\n2024-03-06T00:00:00+02:00,10m\n"
        );
    }
}
