//! Filesystem helpers for building and tearing down profile layouts.

use std::{
    fs::{self, OpenOptions},
    io,
    os::unix::fs::symlink,
    path::Path,
};

/// Outcome of a checked removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The entry had the expected type and was deleted.
    Removed,
    /// Nothing existed at the path.
    Missing,
    /// Something exists at the path but has the wrong type; it was left alone.
    SkippedWrongType,
}

/// Create a directory and all of its parents. Existing directories are fine.
pub fn ensure_dir(path: &Path) -> Result<(), io::Error> {
    fs::create_dir_all(path)
}

/// Point `link` at `target`, replacing whatever entry `link` currently names.
///
/// Files and links (stale or not) are unlinked. An empty directory is
/// removed; a non-empty one makes this fail rather than lose its contents.
pub fn replace_symlink(target: &Path, link: &Path) -> Result<(), io::Error> {
    match fs::symlink_metadata(link) {
        Ok(metadata) if metadata.is_dir() => fs::remove_dir(link)?,
        Ok(_) => fs::remove_file(link)?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    symlink(target, link)
}

/// Delete `path` only if it is a symbolic link.
pub fn remove_symlink_checked(path: &Path) -> Result<RemoveOutcome, io::Error> {
    match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.file_type().is_symlink() => {
            fs::remove_file(path)?;
            Ok(RemoveOutcome::Removed)
        }
        Ok(_) => Ok(RemoveOutcome::SkippedWrongType),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(RemoveOutcome::Missing),
        Err(err) => Err(err),
    }
}

/// Recursively delete `path` only if it is a real directory (not a link to one).
///
/// Errors from the recursive delete itself are ignored so that teardown
/// always runs to completion. Failing to inspect `path` is returned.
pub fn remove_dir_checked(path: &Path) -> Result<RemoveOutcome, io::Error> {
    match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.is_dir() => {
            let _ = fs::remove_dir_all(path);
            Ok(RemoveOutcome::Removed)
        }
        Ok(_) => Ok(RemoveOutcome::SkippedWrongType),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(RemoveOutcome::Missing),
        Err(err) => Err(err),
    }
}

/// Create an empty file at `path` if nothing is there. Never truncates.
pub fn touch(path: &Path) -> Result<(), io::Error> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(|_| ())
}
