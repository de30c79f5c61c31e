// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! # Controller
//!
//! Runs one command against the persisted timer state.
//!
//! | Command       | Idle                         | Running                          |
//! |---------------|------------------------------|----------------------------------|
//! | `status`      | not started                  | elapsed time                     |
//! | `start`       | → Running                    | no-op, already started           |
//! | `stop`        | no-op, not started           | → Idle, time added to the log    |
//! | `table`       | prints the log (state unchanged)                                |
//! | `setLogPath`  | stores the log location (state unchanged)                       |
//!
//! Precondition failures (not started, already started, log path unset) are
//! returned as outcomes, not errors; the caller reports them as warnings.

use crate::aggregate;
use crate::clock::Clock;
use crate::entry_log::{EntryLog, MergeOutcome};
use crate::error::{Error, Result};
use crate::report;
use crate::state::{StartOutcome, StateStore, StopOutcome};
use chrono::{DateTime, FixedOffset};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Running {
        since: DateTime<FixedOffset>,
        elapsed: Duration,
    },
    Idle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopResult {
    Stopped {
        elapsed: Duration,
        logged: MergeOutcome,
    },
    NotRunning,
    /// The timer keeps running until a log path is configured.
    LogPathUnset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportResult {
    Printed { days: usize },
    LogPathUnset,
}

pub struct Controller<C> {
    store: StateStore,
    clock: C,
}

impl<C: Clock> Controller<C> {
    pub fn new(store: StateStore, clock: C) -> Self {
        Controller { store, clock }
    }

    /// True while a session is active (the query a tray icon polls).
    pub fn is_running(&self) -> Result<bool> {
        Ok(self.store.load()?.running)
    }

    pub fn status(&self) -> Result<Status> {
        let state = self.store.load()?;
        let now = self.clock.now();
        Ok(match (state.running_since(), state.elapsed(now)) {
            (Some(since), Some(elapsed)) => Status::Running { since, elapsed },
            _ => Status::Idle,
        })
    }

    /// Starts the timer; an already running timer keeps its start time and nothing is written.
    pub fn start(&self) -> Result<StartOutcome> {
        let mut state = self.store.load()?;
        let outcome = state.start(self.clock.now());
        if let StartOutcome::Started { at } = outcome {
            self.store.save(&state)?;
            tracing::info!(%at, "timer started");
        }
        Ok(outcome)
    }

    /// Stops the timer and adds the elapsed time to today's log entry.
    pub fn stop(&self) -> Result<StopResult> {
        let mut state = self.store.load()?;
        if !state.running {
            return Ok(StopResult::NotRunning);
        }
        let Some(log_path) = state.log_path().map(Path::to_path_buf) else {
            return Ok(StopResult::LogPathUnset);
        };
        let now = self.clock.now();
        let StopOutcome::Stopped { elapsed } = state.stop(now) else {
            return Ok(StopResult::NotRunning);
        };
        let logged = EntryLog::open(&log_path).append_or_merge(now, elapsed)?;
        self.store.save(&state)?;
        tracing::info!(?elapsed, log = %log_path.display(), "timer stopped");
        Ok(StopResult::Stopped { elapsed, logged })
    }

    /// Writes the daily table for the configured log to `out`; an empty log writes nothing.
    pub fn report<W: Write>(&self, out: W) -> Result<ReportResult> {
        let state = self.store.load()?;
        let Some(log_path) = state.log_path() else {
            return Ok(ReportResult::LogPathUnset);
        };
        let entries = EntryLog::open(log_path).read_all()?;
        tracing::debug!(entries = entries.len(), "aggregating log");
        let rows = aggregate::daily_rows(&entries);
        report::render(&rows, out).map_err(|e| Error::io("write report for", log_path, e))?;
        Ok(ReportResult::Printed { days: rows.len() })
    }

    /// Stores `path` (made absolute) as the log location and returns what was stored.
    pub fn set_log_path(&self, path: &Path) -> Result<PathBuf> {
        let path = std::path::absolute(path).map_err(|e| Error::io("resolve", path, e))?;
        let mut state = self.store.load()?;
        state.log_location = Some(path.clone());
        self.store.save(&state)?;
        tracing::info!(log = %path.display(), "log path set");
        Ok(path)
    }
}
