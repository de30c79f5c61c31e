// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! Error type shared by the state store, the entry log and the controller.
//!
//! Missing files are never errors (they read as defaults). Everything here is
//! fatal to the invoking command and carries enough context (operation, path,
//! line) to be reported once at the top level.

use std::io;
use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to {op} {}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed state file {}", path.display())]
    StateParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode timer state")]
    StateEncode(#[source] serde_json::Error),

    #[error("{}:{line}: {reason}", path.display())]
    LogParse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("cannot locate home directory; pass --data or set TIMESHEET_DATA")]
    NoHomeDir,
}

impl Error {
    /// Wraps an `io::Error` with the operation and path that produced it.
    pub fn io(op: &'static str, path: &Path, source: io::Error) -> Self {
        Error::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }
}
