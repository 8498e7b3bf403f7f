//! Directory timestamp propagation.
//!
//! After every file and symlink timestamp is finalized, each directory's own
//! mtime is derived from its immediate contents: the maximum child
//! modification time, or the Unix epoch for a directory with nothing to
//! derive from. Processing runs deepest-first so a parent always reads
//! children that have already been stamped, making directory times a pure
//! function of tree content.

use crate::classify::DirectoryEntry;
use crate::error::ReconcileError;
use crate::events::{EventSink, ReconcileEvent};
use crate::times;
use filetime::FileTime;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Order directories so every descendant precedes its ancestors.
pub fn sort_deepest_first(directories: &mut [DirectoryEntry]) {
    directories.sort_by(|a, b| b.depth.cmp(&a.depth));
}

/// Stamp every directory with the derived timestamp of its contents.
///
/// `directories` must already be sorted deepest-first; the root (depth 0)
/// is stamped last. Returns the number of directories stamped.
pub fn propagate(
    root: &Path,
    directories: &[DirectoryEntry],
    events: &dyn EventSink,
) -> Result<usize, ReconcileError> {
    for dir in directories {
        stamp_directory(root, dir, events)?;
    }

    debug!(
        directories = directories.len(),
        "Propagated directory timestamps"
    );
    Ok(directories.len())
}

fn stamp_directory(
    root: &Path,
    dir: &DirectoryEntry,
    events: &dyn EventSink,
) -> Result<(), ReconcileError> {
    // Floor for a directory with no stampable children.
    let mut latest = FileTime::from_unix_time(0, 0);

    let entries = fs::read_dir(&dir.abs).map_err(|source| ReconcileError::UnreadableDirectory {
        path: dir.abs.clone(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| ReconcileError::UnreadableDirectory {
            path: dir.abs.clone(),
            source,
        })?;

        let file_type = entry
            .file_type()
            .map_err(|source| ReconcileError::UnreadableFile {
                path: entry.path(),
                source,
            })?;
        // Symlink mtimes are not meaningful tree content; a link's own
        // timestamp never drives its parent directory.
        if file_type.is_symlink() {
            continue;
        }

        let meta = entry
            .metadata()
            .map_err(|source| ReconcileError::UnreadableFile {
                path: entry.path(),
                source,
            })?;

        // Full precision: a changed child legitimately carries sub-second
        // time, and the parent takes it as-is.
        let child = FileTime::from_last_modification_time(&meta);
        if child > latest {
            latest = child;
        }
    }

    times::set_exact(&dir.abs, latest)?;
    events.emit(ReconcileEvent::DirectoryStamped {
        path: display_rel(root, &dir.abs),
        mtime: latest.unix_seconds(),
    });
    Ok(())
}

/// Root-relative display path for a directory; the root itself is `.`.
fn display_rel(root: &Path, abs: &Path) -> String {
    match crate::classify::relative_key(root, abs) {
        Ok(rel) if rel.is_empty() => ".".to_string(),
        Ok(rel) => rel,
        Err(_) => abs.display().to_string(),
    }
}
