//! Tree classification: one walk partitions every entry by what the prior
//! manifest says about it.

use crate::error::ReconcileError;
use crate::events::{EventSink, ReconcileEvent};
use crate::hasher;
use crate::manifest::{FileRecord, LinkRecord, Manifest};
use crate::times;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// A file whose observed mtime differs from the prior record.
///
/// Carries the prior record so the analyzer can decide between restoring the
/// old timestamp and accepting the change without another manifest lookup.
#[derive(Debug, Clone)]
pub struct PendingFile {
    pub abs: PathBuf,
    pub rel: String,
    pub prior: FileRecord,
}

/// A symlink whose observed mtime differs from the prior record.
#[derive(Debug, Clone)]
pub struct PendingLink {
    pub abs: PathBuf,
    pub rel: String,
    pub prior: LinkRecord,
}

/// A directory seen during the walk, with its walk depth (root = 0).
///
/// Depth orders the later propagation pass; it is never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub abs: PathBuf,
    pub depth: usize,
}

/// Outcome of a classification pass.
///
/// New and carried-over entries are already recorded in the new manifest by
/// the time this is returned; only entries needing analysis are queued.
#[derive(Debug, Default)]
pub struct Classification {
    pub pending_files: Vec<PendingFile>,
    pub pending_links: Vec<PendingLink>,
    pub directories: Vec<DirectoryEntry>,
    pub files_added: usize,
    pub files_carried: usize,
    pub links_added: usize,
    pub links_carried: usize,
}

/// Walk `root` once and classify every entry against the prior manifest.
///
/// Entries absent from the prior manifest are recorded into `next`
/// immediately (files hashed, symlinks read). Entries whose mtime matches
/// the prior record at second resolution are copied into `next` verbatim,
/// without re-hashing. Entries whose mtime differs are queued for analysis.
/// Directories, the root included, are collected for the propagation pass.
///
/// Symlinks are never followed; anything that is neither a directory nor a
/// symlink is treated as a file.
pub fn classify_tree(
    root: &Path,
    prior: &Manifest,
    next: &mut Manifest,
    events: &dyn EventSink,
) -> Result<Classification, ReconcileError> {
    let mut result = Classification::default();

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type();

        if file_type.is_dir() {
            result.directories.push(DirectoryEntry {
                abs: path.to_path_buf(),
                depth: entry.depth(),
            });
            continue;
        }

        let rel = relative_key(root, path)?;
        let meta = entry.metadata()?;
        let observed = times::mtime_seconds(&meta);

        if file_type.is_symlink() {
            match prior.symlinks.get(&rel) {
                None => {
                    let target = read_target(path)?;
                    next.symlinks.insert(
                        rel.clone(),
                        LinkRecord {
                            target,
                            mtime: observed,
                        },
                    );
                    result.links_added += 1;
                    events.emit(ReconcileEvent::LinkAdded { path: rel });
                }
                Some(record) if record.mtime == observed => {
                    next.symlinks.insert(rel.clone(), record.clone());
                    result.links_carried += 1;
                    events.emit(ReconcileEvent::LinkCarried { path: rel });
                }
                Some(record) => {
                    result.pending_links.push(PendingLink {
                        abs: path.to_path_buf(),
                        rel,
                        prior: record.clone(),
                    });
                }
            }
        } else {
            match prior.files.get(&rel) {
                None => {
                    let sha256 = hasher::sha256_file(path)?;
                    next.files.insert(
                        rel.clone(),
                        FileRecord {
                            sha256,
                            mtime: observed,
                        },
                    );
                    result.files_added += 1;
                    events.emit(ReconcileEvent::FileAdded { path: rel });
                }
                Some(record) if record.mtime == observed => {
                    // Matching timestamp is trusted as unchanged content;
                    // the record is copied without re-reading the file.
                    next.files.insert(rel.clone(), record.clone());
                    result.files_carried += 1;
                    events.emit(ReconcileEvent::FileCarried { path: rel });
                }
                Some(record) => {
                    result.pending_files.push(PendingFile {
                        abs: path.to_path_buf(),
                        rel,
                        prior: record.clone(),
                    });
                }
            }
        }
    }

    debug!(
        files_added = result.files_added,
        files_carried = result.files_carried,
        links_added = result.links_added,
        links_carried = result.links_carried,
        pending_files = result.pending_files.len(),
        pending_links = result.pending_links.len(),
        directories = result.directories.len(),
        "Classified tree"
    );

    Ok(result)
}

/// Root-relative path with `/` separators, used as the manifest key.
pub(crate) fn relative_key(root: &Path, path: &Path) -> Result<String, ReconcileError> {
    let rel = path.strip_prefix(root).map_err(|_| {
        ReconcileError::Configuration(format!("Path {:?} is not under root {:?}", path, root))
    })?;

    Ok(rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/"))
}

/// Read a symlink's target as a string.
pub(crate) fn read_target(path: &Path) -> Result<String, ReconcileError> {
    let target = fs::read_link(path).map_err(|source| ReconcileError::UnreadableLink {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(target.to_string_lossy().into_owned())
}
