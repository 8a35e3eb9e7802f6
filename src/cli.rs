//! CLI argument parsing and command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Filtering stage for telemetry event pipelines
#[derive(Parser)]
#[command(
    name = "event-filter",
    version,
    about = "Filtering stage for telemetry event pipelines",
    long_about = "Reads one event as JSON from stdin, runs it through the configured \
                  profile, device, source and resource filters, and reports whether \
                  the pipeline should continue."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Filter one event read from stdin (alias: filter)
    #[command(alias = "filter")]
    Run {
        /// Content type reported by the upstream stage
        #[arg(long, default_value = "application/json")]
        content_type: String,

        /// Identifier tying together the log lines of this run
        #[arg(long)]
        correlation_id: Option<String>,
    },
    /// Generate default configuration file
    Init {
        /// Path where to create the configuration file
        #[arg(long, short = 'p')]
        path: Option<PathBuf>,
    },
    /// Validate configuration file
    Check,
    /// Display version information
    Version,
}
