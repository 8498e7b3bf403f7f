//! Shared test utilities for integration tests
//!
//! Provides fixture helpers for building trees with controlled timestamps and
//! running reconciliation with a recording event sink, to avoid duplicating
//! setup across test modules.

use retime::events::{MemorySink, ReconcileEvent};
use retime::hasher;
use retime::manifest::Manifest;
use retime::reconcile::{ReconcileSummary, Reconciler};
use retime::times;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// A tree under reconciliation together with its manifest path.
///
/// The manifest lives outside the tree root so it never classifies as part
/// of the tree.
pub struct Fixture {
    _temp: TempDir,
    pub root: PathBuf,
    pub manifest_path: PathBuf,
}

impl Fixture {
    /// Create an empty tree and an empty on-disk manifest.
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("tree");
        fs::create_dir(&root).unwrap();
        let manifest_path = temp.path().join("manifest.json");
        Manifest::default().save(&manifest_path).unwrap();
        Self {
            _temp: temp,
            root,
            manifest_path,
        }
    }

    /// Write a file under the root with a fixed modification time.
    ///
    /// Creates intermediate directories as needed. Returns the absolute path.
    pub fn write_file(&self, rel: &str, content: &str, mtime: i64) -> PathBuf {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        times::set_seconds(&path, mtime).unwrap();
        path
    }

    /// Run reconciliation, panicking on error.
    pub fn run(&self) -> ReconcileSummary {
        Reconciler::new(self.root.clone(), self.manifest_path.clone())
            .run()
            .unwrap()
    }

    /// Run reconciliation with a recording sink; returns summary and events.
    pub fn run_recorded(&self) -> (ReconcileSummary, Vec<ReconcileEvent>) {
        let sink = Arc::new(MemorySink::new());
        let summary = Reconciler::new(self.root.clone(), self.manifest_path.clone())
            .with_events(sink.clone())
            .run()
            .unwrap();
        let events = sink.events();
        (summary, events)
    }

    /// The saved manifest, parsed.
    pub fn saved_manifest(&self) -> Manifest {
        Manifest::load(&self.manifest_path).unwrap()
    }

    /// Raw manifest bytes, for byte-identity assertions.
    pub fn manifest_bytes(&self) -> Vec<u8> {
        fs::read(&self.manifest_path).unwrap()
    }
}

/// Observed mtime of a path in whole seconds, without following symlinks.
pub fn mtime_of(path: &Path) -> i64 {
    times::mtime_seconds(&fs::symlink_metadata(path).unwrap())
}

/// SHA-256 of a file on disk, lowercase hex.
pub fn sha256_of(path: &Path) -> String {
    hasher::sha256_file(path).unwrap()
}
