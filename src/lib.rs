//! Retime: Reproducible Timestamps for Generated Filesystem Trees
//!
//! Compares a freshly generated tree against a manifest of recorded content
//! hashes and timestamps, restores prior timestamps wherever content is
//! unchanged, and derives directory timestamps from their finalized contents
//! so repeated builds of identical inputs produce bit-identical trees.

pub mod analyze;
pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod hasher;
pub mod logging;
pub mod manifest;
pub mod propagate;
pub mod reconcile;
pub mod times;
