// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! # timesheet: work-hour tracker
//!
//! Records when work starts and stops, keeps one log row per day (a second
//! stop on the same day adds to that day's row) and prints daily totals with
//! weekly totals on Sundays.
//!
//! ## Files
//!
//! - state: `$HOME/.config/timesheet/data.json` (override with `--data` or
//!   `TIMESHEET_DATA`); see [`state`].
//! - log: wherever `setLogPath` points; see [`entry_log`].
//!
//! ## Concurrency
//!
//! Each command is a short-lived process. Rewrites go through a temporary
//! file and a rename, so readers never see a half-written file, but there is
//! no lock: two processes stopping the timer at the same moment can still
//! lose one update (last writer wins).

pub mod aggregate;
pub mod cli;
pub mod clock;
pub mod config;
pub mod controller;
pub mod entry_log;
pub mod error;
mod files;
pub mod report;
pub mod state;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use controller::{Controller, ReportResult, Status, StopResult};
pub use entry_log::{EntryLog, LogEntry, MergeOutcome};
pub use error::{Error, Result};
pub use state::{StartOutcome, StateStore, TimerState};
