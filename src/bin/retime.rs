//! Retime CLI Binary
//!
//! Command-line interface for reconciling a generated tree's timestamps
//! against its recorded manifest.

use clap::Parser;
use retime::cli::Cli;
use retime::config::RunConfig;
use retime::logging::{init_logging, LoggingConfig};
use retime::reconcile::Reconciler;
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    // Build logging config from CLI args
    let logging_config = build_logging_config(&cli);

    // Initialize logging early
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("Retime CLI starting");

    if cli.format != "text" && cli.format != "json" {
        let message = format!(
            "Invalid output format: {} (must be 'text' or 'json')",
            cli.format
        );
        error!("{}", message);
        eprintln!("{}", message);
        process::exit(1);
    }

    let config = match RunConfig::new(cli.root.clone(), cli.manifest.clone()).validated() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let reconciler = Reconciler::new(config.root, config.manifest);
    match reconciler.run() {
        Ok(summary) => {
            info!("Reconciliation completed");
            let output = if cli.format == "json" {
                match serde_json::to_string_pretty(&summary) {
                    Ok(rendered) => rendered,
                    Err(e) => {
                        error!("Failed to render summary: {}", e);
                        eprintln!("Failed to render summary: {}", e);
                        process::exit(1);
                    }
                }
            } else {
                summary.render_text()
            };
            println!("{}", output);
        }
        Err(e) => {
            error!("Reconciliation failed: {}", e);
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}

/// Build logging configuration from CLI args.
/// Precedence: explicit flags override --verbose override defaults.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let mut config = LoggingConfig::default();

    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }

    config
}
