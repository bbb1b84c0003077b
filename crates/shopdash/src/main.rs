// crates/shopdash/src/main.rs

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use shopdash_core::config::DashboardConfig;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod commands;
mod render;

use commands::fields::handle_fields_command;
use commands::report::{handle_report_command, ReportArgs};

/// Sales dashboard over a transaction table
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Default)]
pub struct SourceArgs {
    /// Transaction table to read (overrides config and SHOPDASH_SOURCE)
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the dashboard report for a branch / product line selection
    Report(ReportArgs),
    /// List recognized fields and the values of the filter dimensions
    Fields,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = load_config(&cli.source)?;
    init_tracing(config.log_json || cli.source.log_json);
    // env overrides may warn, so they run once logging is up
    let config = config.with_env_overrides();
    debug!(?config, "configuration resolved");

    let source = cli
        .source
        .source
        .clone()
        .or_else(|| config.source.clone())
        .context("no source table given: pass --source, set SHOPDASH_SOURCE, or set `source` in the config file")?;

    match cli.command {
        Command::Report(args) => handle_report_command(&source, &config, &args),
        Command::Fields => handle_fields_command(&source),
    }
}

fn load_config(args: &SourceArgs) -> Result<DashboardConfig> {
    match &args.config {
        Some(path) => DashboardConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(DashboardConfig::default()),
    }
}

fn init_tracing(json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
