// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! Small file helpers shared by the state store and the entry log.

use crate::error::{Error, Result};
use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Reads a file to a string; a missing file reads as `None`.
pub fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io("read", path, e)),
    }
}

/// Sibling path used while rewriting `path`: `<name>.new`.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("timesheet"));
    name.push(".new");
    path.with_file_name(name)
}

/// Replaces the contents of `path` with `contents`.
///
/// The data goes to `<name>.new` first and is renamed over `path`, so a
/// concurrent reader sees either the old file or the new one. The parent
/// directory is created when missing.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| Error::io("create directory", dir, e))?;
    }
    let staging = staging_path(path);
    let mut f = fs::File::create(&staging).map_err(|e| Error::io("create", &staging, e))?;
    f.write_all(contents)
        .and_then(|()| f.sync_all())
        .map_err(|e| Error::io("write", &staging, e))?;
    drop(f);
    fs::rename(&staging, path).map_err(|e| Error::io("replace", path, e))?;
    tracing::debug!(path = %path.display(), bytes = contents.len(), "rewrote file");
    Ok(())
}

/// Appends `line` to `path`, creating the file (and its directory) if needed.
pub fn append_line(path: &Path, line: &str) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| Error::io("create directory", dir, e))?;
    }
    let mut f = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| Error::io("open", path, e))?;
    f.write_all(line.as_bytes())
        .map_err(|e| Error::io("append to", path, e))?;
    tracing::debug!(path = %path.display(), line = line.trim_end(), "appended line");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_optional_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_optional(&dir.path().join("nope")).unwrap().is_none());
    }

    #[test]
    fn test_write_atomic_creates_directory_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data.json");
        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        assert!(!staging_path(&path).exists());
    }

    #[test]
    fn test_append_line_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.csv");
        append_line(&path, "a\n").unwrap();
        append_line(&path, "b\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb\n");
    }

    #[test]
    fn test_staging_path_is_sibling() {
        assert_eq!(
            staging_path(Path::new("/x/timesheet.csv")),
            PathBuf::from("/x/timesheet.csv.new")
        );
    }
}
