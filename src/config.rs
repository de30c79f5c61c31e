// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! Resolved runtime configuration, built once in `main` and passed down.

use crate::error::{Error, Result};
use crate::state::StateStore;
use std::path::PathBuf;

/// Default path segment under `$HOME` for the timer state file.
pub const DEFAULT_DATA: &str = ".config/timesheet/data.json";

/// Environment variable overriding the state file location.
pub const DATA_ENV: &str = "TIMESHEET_DATA";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Where the timer state (and the configured log path) is persisted.
    pub data_path: PathBuf,
    /// Raise diagnostics to debug level.
    pub verbose: bool,
}

impl Config {
    /// Uses `data_path` when given, else `$HOME/.config/timesheet/data.json`.
    pub fn new(data_path: Option<PathBuf>, verbose: bool) -> Result<Self> {
        let data_path = match data_path {
            Some(p) => p,
            None => dirs::home_dir().ok_or(Error::NoHomeDir)?.join(DEFAULT_DATA),
        };
        Ok(Config { data_path, verbose })
    }

    pub fn state_store(&self) -> StateStore {
        StateStore::new(&self.data_path)
    }
}
