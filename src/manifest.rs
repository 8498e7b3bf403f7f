//! Manifest persistence.
//!
//! The manifest is the record of the last reconciled state of a tree: content
//! digest and modification time per file, link target and modification time
//! per symlink, keyed by root-relative path. It is stored as human-readable
//! JSON so runs can be diffed and inspected.

use crate::error::ManifestError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Recorded state of a regular file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Lowercase hex SHA-256 of the file contents.
    pub sha256: String,
    /// Modification time in whole seconds since the Unix epoch.
    pub mtime: i64,
}

/// Recorded state of a symbolic link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// Link target, exactly as read from the symlink.
    pub target: String,
    /// Modification time of the link itself in whole seconds.
    pub mtime: i64,
}

/// Persisted snapshot of a reconciled tree.
///
/// `BTreeMap` keeps keys sorted in the serialized output so successive
/// manifests diff cleanly. A path never appears in both maps: an entry is
/// classified as exactly one kind during the walk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub files: BTreeMap<String, FileRecord>,
    #[serde(default)]
    pub symlinks: BTreeMap<String, LinkRecord>,
}

impl Manifest {
    /// Load a manifest from disk.
    ///
    /// A missing or unreadable file is `ManifestError::Unreadable`; JSON that
    /// does not parse into the manifest shape is `ManifestError::Malformed`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ManifestError> {
        let path = path.as_ref();

        let contents = fs::read_to_string(path).map_err(|source| ManifestError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&contents).map_err(|source| ManifestError::Malformed {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save the manifest to disk atomically.
    ///
    /// Serializes as pretty-printed JSON, writes to a sibling temp file, then
    /// renames into place so a crash never leaves a half-written manifest.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ManifestError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| ManifestError::Write {
                    path: path.to_path_buf(),
                    source,
                })?;
            }
        }

        let serialized =
            serde_json::to_string_pretty(self).map_err(|source| ManifestError::Write {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::Other, source),
            })?;

        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, serialized.as_bytes()).map_err(|source| ManifestError::Write {
            path: temp_path.clone(),
            source,
        })?;

        fs::rename(&temp_path, path).map_err(|source| {
            // Clean up temp file on error
            let _ = fs::remove_file(&temp_path);
            ManifestError::Write {
                path: path.to_path_buf(),
                source,
            }
        })?;

        Ok(())
    }
}
