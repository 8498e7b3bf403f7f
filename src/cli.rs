//! CLI parse: clap types for retime. No behavior; definitions only.

use clap::Parser;
use std::path::PathBuf;

/// Retime CLI - Reproducible timestamps for generated filesystem trees
#[derive(Parser)]
#[command(name = "retime")]
#[command(about = "Restore prior timestamps of content-unchanged files and derive directory times")]
pub struct Cli {
    /// Root directory of the tree to reconcile
    #[arg(long)]
    pub root: PathBuf,

    /// Manifest file to read and overwrite
    #[arg(long)]
    pub manifest: PathBuf,

    /// Output format for the run summary (text or json)
    #[arg(long, default_value = "text")]
    pub format: String,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,
}
