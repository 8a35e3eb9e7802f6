//! event-filter: filtering stage for telemetry event pipelines
//!
//! Runs one event from stdin through the configured filters and writes the
//! continuation signal to stdout.

mod cli;

use std::io;
use std::path::Path;
use std::process;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use event_filter::config::{Config, ConfigService};
use event_filter::domain::{logger, PipelineContext, StageParams};
use event_filter::service::{new_correlation_id, write_fault, FilterService, FAULT_EXIT_CODE};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            content_type,
            correlation_id,
        } => {
            let ctx = PipelineContext::new(correlation_id.unwrap_or_else(new_correlation_id));
            let params = StageParams::with_content_type(content_type);

            // Config and logger failures are faults too; a plain error exit
            // would read as a halt to the runner.
            let exit_code = match run(cli.config.as_deref(), cli.debug, &ctx, &params) {
                Ok(code) => code,
                Err(e) => write_fault(io::stdout().lock(), &format!("{:#}", e))
                    .unwrap_or(FAULT_EXIT_CODE),
            };
            process::exit(exit_code);
        }
        Commands::Init { path } => {
            let config_path = path.unwrap_or_else(ConfigService::default_path);
            ConfigService::generate_at(&config_path)?;
            if !cli.quiet {
                eprintln!("Configuration file created at: {}", config_path.display());
            }
        }
        Commands::Check => {
            // Loading validates.
            let config = load(cli.config.as_deref(), cli.debug)?;
            if !cli.quiet {
                eprintln!(
                    "Configuration is valid ({} filter stage(s)).",
                    config.filters.len()
                );
            }
        }
        Commands::Version => {
            println!("event-filter {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

/// Load configuration and start file logging when enabled.
fn load(config_path: Option<&Path>, debug: bool) -> Result<Config> {
    let config = ConfigService::load(config_path)?;
    if debug || config.debug {
        logger::init(&config)?;
    }
    Ok(config)
}

fn run(
    config_path: Option<&Path>,
    debug: bool,
    ctx: &PipelineContext,
    params: &StageParams,
) -> Result<i32> {
    let config = load(config_path, debug)?;
    FilterService::new(&config).run(ctx, params)
}
