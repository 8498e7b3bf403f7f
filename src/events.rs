//! Event schema for reconciliation observability.
//!
//! Every per-entry decision the reconciler makes is emitted as a structured
//! event through an [`EventSink`], so callers and tests observe behavior
//! directly instead of scraping log output. The default sink narrates events
//! via `tracing`; tests attach a [`MemorySink`] and assert on the recorded
//! sequence.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

/// A single reconciliation decision.
///
/// Paths are root-relative, `/`-joined, matching manifest keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ReconcileEvent {
    /// File not present in the prior manifest; hashed and recorded fresh.
    FileAdded { path: String },
    /// File mtime matches the prior record; carried over without re-hashing.
    FileCarried { path: String },
    /// File mtime drifted but content is unchanged; prior mtime written back.
    FileRestored { path: String },
    /// File content changed; new digest and current mtime recorded.
    FileChanged { path: String },
    /// Symlink not present in the prior manifest.
    LinkAdded { path: String },
    /// Symlink mtime matches the prior record; carried over.
    LinkCarried { path: String },
    /// Symlink mtime drifted but target is unchanged; prior mtime restored.
    LinkRestored { path: String },
    /// Symlink target changed; new target and current mtime recorded.
    LinkChanged { path: String },
    /// Directory stamped with the derived timestamp of its contents.
    DirectoryStamped { path: String, mtime: i64 },
}

/// Receiver for reconciliation events.
///
/// Implementations must tolerate concurrent emission: analysis tasks run in
/// parallel and emit from worker threads.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: ReconcileEvent);
}

/// Default sink: narrates events through `tracing`.
///
/// Restorations are the run's visible work and log at info; new and changed
/// entries at debug; carried entries and directory stamps at trace.
#[derive(Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: ReconcileEvent) {
        match event {
            ReconcileEvent::FileRestored { path } => {
                info!(path = %path, "Restored file timestamp");
            }
            ReconcileEvent::LinkRestored { path } => {
                info!(path = %path, "Restored symlink timestamp");
            }
            ReconcileEvent::FileAdded { path } => {
                debug!(path = %path, "Recorded new file");
            }
            ReconcileEvent::FileChanged { path } => {
                debug!(path = %path, "File content changed");
            }
            ReconcileEvent::LinkAdded { path } => {
                debug!(path = %path, "Recorded new symlink");
            }
            ReconcileEvent::LinkChanged { path } => {
                debug!(path = %path, "Symlink target changed");
            }
            ReconcileEvent::FileCarried { path } => {
                trace!(path = %path, "File unchanged");
            }
            ReconcileEvent::LinkCarried { path } => {
                trace!(path = %path, "Symlink unchanged");
            }
            ReconcileEvent::DirectoryStamped { path, mtime } => {
                trace!(path = %path, mtime, "Stamped directory");
            }
        }
    }
}

/// Recording sink for tests: stores events in emission order.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<ReconcileEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events emitted so far, in order.
    pub fn events(&self) -> Vec<ReconcileEvent> {
        self.events.lock().clone()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: ReconcileEvent) {
        self.events.lock().push(event);
    }
}
