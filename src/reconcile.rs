//! Reconciliation orchestrator.
//!
//! Sequences a full run: load the prior manifest, classify the tree, analyze
//! drifted entries on the worker pool while the directory list is sorted,
//! fold the finalized records into the new manifest, propagate directory
//! timestamps, and save. Any error aborts before the save, so a failed run
//! leaves the prior manifest on disk untouched.

use crate::analyze::run_analysis;
use crate::classify::{classify_tree, Classification};
use crate::error::ReconcileError;
use crate::events::{EventSink, TracingSink};
use crate::manifest::Manifest;
use crate::propagate::{propagate, sort_deepest_first};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Counters for one reconciliation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconcileSummary {
    pub files_added: usize,
    pub files_carried: usize,
    pub files_restored: usize,
    pub files_changed: usize,
    pub links_added: usize,
    pub links_carried: usize,
    pub links_restored: usize,
    pub links_changed: usize,
    pub directories_stamped: usize,
    pub duration_ms: u128,
}

impl ReconcileSummary {
    /// Human-readable one-entry-per-line rendering for terminal output.
    pub fn render_text(&self) -> String {
        format!(
            "files:       {} added, {} carried, {} restored, {} changed\n\
             symlinks:    {} added, {} carried, {} restored, {} changed\n\
             directories: {} stamped\n\
             completed in {} ms",
            self.files_added,
            self.files_carried,
            self.files_restored,
            self.files_changed,
            self.links_added,
            self.links_carried,
            self.links_restored,
            self.links_changed,
            self.directories_stamped,
            self.duration_ms,
        )
    }
}

/// Reconciles one tree against one manifest.
pub struct Reconciler {
    root: PathBuf,
    manifest_path: PathBuf,
    events: Arc<dyn EventSink>,
}

impl Reconciler {
    /// Create a reconciler that narrates decisions through `tracing`.
    pub fn new(root: PathBuf, manifest_path: PathBuf) -> Self {
        Self {
            root,
            manifest_path,
            events: Arc::new(TracingSink),
        }
    }

    /// Replace the event sink (tests attach a recording sink here).
    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// Run one full reconciliation.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn run(&self) -> Result<ReconcileSummary, ReconcileError> {
        let start = Instant::now();
        info!("Starting reconciliation");

        let prior = Manifest::load(&self.manifest_path)?;
        debug!(
            files = prior.files.len(),
            symlinks = prior.symlinks.len(),
            "Loaded prior manifest"
        );

        let mut next = Manifest::default();
        let Classification {
            pending_files,
            pending_links,
            mut directories,
            files_added,
            files_carried,
            links_added,
            links_carried,
        } = classify_tree(&self.root, &prior, &mut next, self.events.as_ref())?;

        // Analysis touches only files and symlinks; the ordering sort for the
        // later directory pass has no data dependency on it, so the two run
        // concurrently. Propagation itself must not start until every entry
        // timestamp is final, which the join guarantees.
        let (analysis, _) = rayon::join(
            || run_analysis(&pending_files, &pending_links, self.events.as_ref()),
            || sort_deepest_first(&mut directories),
        );
        let (file_results, link_results) = analysis?;

        let mut summary = ReconcileSummary {
            files_added,
            files_carried,
            links_added,
            links_carried,
            ..Default::default()
        };

        // A result identical to its prior record means the timestamp was
        // restored; anything else is a genuine content change.
        for (pending, result) in pending_files.iter().zip(&file_results) {
            if result.record == pending.prior {
                summary.files_restored += 1;
            } else {
                summary.files_changed += 1;
            }
        }
        for (pending, result) in pending_links.iter().zip(&link_results) {
            if result.record == pending.prior {
                summary.links_restored += 1;
            } else {
                summary.links_changed += 1;
            }
        }

        for result in file_results {
            next.files.insert(result.rel, result.record);
        }
        for result in link_results {
            next.symlinks.insert(result.rel, result.record);
        }

        summary.directories_stamped =
            propagate(&self.root, &directories, self.events.as_ref())?;

        next.save(&self.manifest_path)?;

        summary.duration_ms = start.elapsed().as_millis();
        info!(
            files_added = summary.files_added,
            files_carried = summary.files_carried,
            files_restored = summary.files_restored,
            files_changed = summary.files_changed,
            directories_stamped = summary.directories_stamped,
            duration_ms = summary.duration_ms,
            "Reconciliation completed"
        );

        Ok(summary)
    }
}
