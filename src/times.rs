//! Timestamp read/write primitives.
//!
//! All comparisons in this crate happen at whole-second resolution; writes
//! that restore a recorded timestamp therefore use second precision, while
//! directory stamps carry the full precision of the source child time.

use crate::error::ReconcileError;
use filetime::FileTime;
use std::fs::Metadata;
use std::path::Path;

/// Modification time of `meta` in whole seconds since the Unix epoch.
pub fn mtime_seconds(meta: &Metadata) -> i64 {
    FileTime::from_last_modification_time(meta).unix_seconds()
}

/// Set a file's access and modification times to `seconds`.
pub fn set_seconds(path: &Path, seconds: i64) -> Result<(), ReconcileError> {
    let ft = FileTime::from_unix_time(seconds, 0);
    filetime::set_file_times(path, ft, ft).map_err(|source| ReconcileError::TimestampWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Set a symlink's own access and modification times without following it.
pub fn set_symlink_seconds(path: &Path, seconds: i64) -> Result<(), ReconcileError> {
    let ft = FileTime::from_unix_time(seconds, 0);
    filetime::set_symlink_file_times(path, ft, ft).map_err(|source| {
        ReconcileError::TimestampWrite {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Set a path's access and modification times to an exact full-precision value.
pub fn set_exact(path: &Path, time: FileTime) -> Result<(), ReconcileError> {
    filetime::set_file_times(path, time, time).map_err(|source| ReconcileError::TimestampWrite {
        path: path.to_path_buf(),
        source,
    })
}
