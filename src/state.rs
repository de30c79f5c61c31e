// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! # Timer state
//!
//! The single persisted record that says whether a session is running, when
//! it started and where the entry log lives.
//!
//! ## File format
//!
//! ```json
//! {"started":true,"startTime":"2024-03-04T09:00:00+01:00","logPath":"/home/me/timesheet.csv"}
//! ```
//!
//! Files written by older versions spell the keys `Started`, `StartTime` and
//! `LogPath`; both spellings are read.

use crate::error::{Error, Result};
use crate::files;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TimerState {
    #[serde(rename = "started", alias = "Started", default)]
    pub running: bool,

    #[serde(
        rename = "startTime",
        alias = "StartTime",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub start_time: Option<DateTime<FixedOffset>>,

    #[serde(
        rename = "logPath",
        alias = "LogPath",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub log_location: Option<PathBuf>,
}

/// Result of [`TimerState::start`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartOutcome {
    Started { at: DateTime<FixedOffset> },
    /// The timer was already running; its start time is untouched.
    AlreadyRunning { since: DateTime<FixedOffset> },
}

/// Result of [`TimerState::stop`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped { elapsed: Duration },
    NotRunning,
}

/// `end - start` as a non-negative duration; a clock that went backwards yields zero.
pub(crate) fn span(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Duration {
    match (end - start).to_std() {
        Ok(d) => d,
        Err(_) => {
            tracing::warn!(%start, %end, "end precedes start; counting zero elapsed time");
            Duration::ZERO
        }
    }
}

impl TimerState {
    /// Configured log location, treating an empty path as unset.
    pub fn log_path(&self) -> Option<&Path> {
        self.log_location
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// Start time of the running session, if any.
    pub fn running_since(&self) -> Option<DateTime<FixedOffset>> {
        if self.running {
            self.start_time
        } else {
            None
        }
    }

    /// Marks a session as running from `now` unless one already is.
    pub fn start(&mut self, now: DateTime<FixedOffset>) -> StartOutcome {
        if let Some(since) = self.running_since() {
            return StartOutcome::AlreadyRunning { since };
        }
        self.running = true;
        self.start_time = Some(now);
        StartOutcome::Started { at: now }
    }

    /// Ends the running session and returns how long it lasted.
    pub fn stop(&mut self, now: DateTime<FixedOffset>) -> StopOutcome {
        let Some(since) = self.running_since() else {
            return StopOutcome::NotRunning;
        };
        self.running = false;
        StopOutcome::Stopped {
            elapsed: span(since, now),
        }
    }

    /// Time elapsed in the running session, `None` when idle.
    pub fn elapsed(&self, now: DateTime<FixedOffset>) -> Option<Duration> {
        self.running_since().map(|since| span(since, now))
    }
}

/// Loads and saves [`TimerState`] at a fixed path.
#[derive(Clone, Debug)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StateStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the persisted state; a missing file yields the default (idle, no log path).
    pub fn load(&self) -> Result<TimerState> {
        tracing::debug!(path = %self.path.display(), "reading timer state");
        let Some(content) = files::read_optional(&self.path)? else {
            return Ok(TimerState::default());
        };
        if content.trim().is_empty() {
            return Ok(TimerState::default());
        }
        let state: TimerState =
            serde_json::from_str(&content).map_err(|source| Error::StateParse {
                path: self.path.clone(),
                source,
            })?;
        tracing::debug!(?state, "parsed timer state");
        Ok(state)
    }

    /// Overwrites the persisted state, creating the containing directory if needed.
    pub fn save(&self, state: &TimerState) -> Result<()> {
        let text = serde_json::to_vec(state).map_err(Error::StateEncode)?;
        tracing::debug!(path = %self.path.display(), "writing timer state");
        files::write_atomic(&self.path, &text)
    }
}
