// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

use crate::config::DATA_ENV;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = env!("CARGO_PKG_DESCRIPTION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Print diagnostics (file reads, writes, merge decisions) to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Timer state file (default: ~/.config/timesheet/data.json)
    #[arg(long, global = true, env = DATA_ENV)]
    pub data: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show time elapsed since the timer was started
    #[command(alias = "elapsed")]
    Status,
    /// Start the timer
    Start,
    /// Stop the timer and add the elapsed time to today's log entry
    Stop,
    /// Print daily totals with weekly totals on Sundays
    #[command(alias = "report")]
    Table,
    /// Set the log file location
    #[command(name = "setLogPath", alias = "set-log-path")]
    SetLogPath {
        /// Path of the comma-separated log file
        path: PathBuf,
    },
}

/// Parse failures answered with the usage text and a zero exit: an unknown command or flag.
pub fn is_usage_error(e: &clap::Error) -> bool {
    matches!(
        e.kind(),
        ErrorKind::InvalidSubcommand | ErrorKind::UnknownArgument
    )
}
