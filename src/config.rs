//! Run configuration and validation.

use crate::error::ReconcileError;
use std::path::PathBuf;

/// Validated inputs for one reconciliation run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Root of the tree to reconcile.
    pub root: PathBuf,
    /// Path of the manifest to read and overwrite.
    pub manifest: PathBuf,
}

impl RunConfig {
    pub fn new(root: PathBuf, manifest: PathBuf) -> Self {
        Self { root, manifest }
    }

    /// Validate the configuration and canonicalize the root.
    ///
    /// The root must name an existing directory. The manifest path is not
    /// required to exist here; its readability is the manifest loader's
    /// concern and failure there carries a better error.
    pub fn validated(self) -> Result<RunConfig, ReconcileError> {
        if self.root.as_os_str().is_empty() {
            return Err(ReconcileError::Configuration(
                "Root path cannot be empty".to_string(),
            ));
        }
        if self.manifest.as_os_str().is_empty() {
            return Err(ReconcileError::Configuration(
                "Manifest path cannot be empty".to_string(),
            ));
        }
        if !self.root.is_dir() {
            return Err(ReconcileError::Configuration(format!(
                "Root {:?} is not a directory",
                self.root
            )));
        }

        let root = dunce::canonicalize(&self.root).map_err(|e| {
            ReconcileError::Configuration(format!(
                "Failed to canonicalize root {:?}: {}",
                self.root, e
            ))
        })?;

        Ok(RunConfig {
            root,
            manifest: self.manifest,
        })
    }
}
