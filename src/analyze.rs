//! Change analysis for entries whose timestamps drifted.
//!
//! Analysis decides, per queued entry, whether the content actually changed.
//! Unchanged content gets its recorded timestamp written back to disk;
//! changed content gets a fresh record with the timestamp it carries now.
//! The content comparison is authoritative, never the timestamp.

use crate::classify::{PendingFile, PendingLink};
use crate::error::ReconcileError;
use crate::events::{EventSink, ReconcileEvent};
use crate::hasher;
use crate::manifest::{FileRecord, LinkRecord};
use crate::times;
use rayon::prelude::*;
use std::fs;

/// Finalized record for one analyzed entry, keyed back to its manifest slot.
#[derive(Debug, Clone)]
pub struct AnalysisResult<R> {
    pub rel: String,
    pub record: R,
}

/// Analyze one file whose mtime differs from the prior record.
///
/// If the digest still matches, the drift was touch-only: both access and
/// modification times are reset to the prior value and the prior record is
/// returned. If the digest differs, the file is re-stat'ed and the new
/// digest is recorded with the mtime the file has now.
pub fn analyze_file(
    pending: &PendingFile,
    events: &dyn EventSink,
) -> Result<AnalysisResult<FileRecord>, ReconcileError> {
    let sha256 = hasher::sha256_file(&pending.abs)?;

    if sha256 == pending.prior.sha256 {
        times::set_seconds(&pending.abs, pending.prior.mtime)?;
        events.emit(ReconcileEvent::FileRestored {
            path: pending.rel.clone(),
        });
        return Ok(AnalysisResult {
            rel: pending.rel.clone(),
            record: pending.prior.clone(),
        });
    }

    let meta = fs::metadata(&pending.abs).map_err(|source| ReconcileError::UnreadableFile {
        path: pending.abs.clone(),
        source,
    })?;
    events.emit(ReconcileEvent::FileChanged {
        path: pending.rel.clone(),
    });
    Ok(AnalysisResult {
        rel: pending.rel.clone(),
        record: FileRecord {
            sha256,
            mtime: times::mtime_seconds(&meta),
        },
    })
}

/// Analyze one symlink whose mtime differs from the prior record.
///
/// The link target plays the role the digest plays for files. The link's own
/// timestamps are restored or re-read; the target is never followed.
pub fn analyze_link(
    pending: &PendingLink,
    events: &dyn EventSink,
) -> Result<AnalysisResult<LinkRecord>, ReconcileError> {
    let target = crate::classify::read_target(&pending.abs)?;

    if target == pending.prior.target {
        times::set_symlink_seconds(&pending.abs, pending.prior.mtime)?;
        events.emit(ReconcileEvent::LinkRestored {
            path: pending.rel.clone(),
        });
        return Ok(AnalysisResult {
            rel: pending.rel.clone(),
            record: pending.prior.clone(),
        });
    }

    let meta =
        fs::symlink_metadata(&pending.abs).map_err(|source| ReconcileError::UnreadableLink {
            path: pending.abs.clone(),
            source,
        })?;
    events.emit(ReconcileEvent::LinkChanged {
        path: pending.rel.clone(),
    });
    Ok(AnalysisResult {
        rel: pending.rel.clone(),
        record: LinkRecord {
            target,
            mtime: times::mtime_seconds(&meta),
        },
    })
}

/// Run both analysis queues on the global worker pool.
///
/// Results come back in queue order: the parallel collect assigns each task
/// a pre-sized slot by position, so no ordering work happens after the join.
/// The first error stops new tasks from being scheduled; in-flight tasks
/// finish and the error aborts the run.
pub fn run_analysis(
    pending_files: &[PendingFile],
    pending_links: &[PendingLink],
    events: &dyn EventSink,
) -> Result<
    (
        Vec<AnalysisResult<FileRecord>>,
        Vec<AnalysisResult<LinkRecord>>,
    ),
    ReconcileError,
> {
    let file_results = pending_files
        .par_iter()
        .map(|pending| analyze_file(pending, events))
        .collect::<Result<Vec<_>, _>>()?;

    let link_results = pending_links
        .par_iter()
        .map(|pending| analyze_link(pending, events))
        .collect::<Result<Vec<_>, _>>()?;

    Ok((file_results, link_results))
}
