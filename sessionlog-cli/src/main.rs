mod commands;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sessionlog_core::config::SessionLogConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sessionlog")]
#[command(about = "Log the tabletop sessions on your calendar into a sheet")]
struct Cli {
    /// Config file to use instead of ~/.config/sessionlog/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log today's sessions (or another day's with --date)
    Run {
        /// Day to log: YYYY-MM-DD or a phrase like "yesterday"
        #[arg(short, long)]
        date: Option<String>,

        /// Print the records instead of appending them
        #[arg(long)]
        dry_run: bool,

        /// With --dry-run, print records as JSON
        #[arg(long, requires = "dry_run")]
        json: bool,
    },
    /// Manage the daily midnight run
    Schedule {
        #[command(subcommand)]
        action: ScheduleAction,
    },
    /// Show the config file location and effective settings
    Config,
}

#[derive(Subcommand)]
enum ScheduleAction {
    /// Run `sessionlog run` every day at midnight (replaces an existing schedule)
    Install,
    /// Remove the daily schedule
    Remove,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run {
            date,
            dry_run,
            json,
        } => {
            let (config, config_path) = load_config(cli.config.as_deref())?;
            config.validate(&config_path)?;
            let date = commands::run::resolve_date(date.as_deref())?;
            commands::run::run(&config, date, dry_run, json)
        }
        Commands::Schedule { action } => match action {
            ScheduleAction::Install => commands::schedule::install(cli.config.as_deref()),
            ScheduleAction::Remove => commands::schedule::remove(),
        },
        Commands::Config => {
            let (config, config_path) = load_config(cli.config.as_deref())?;
            commands::config::run(&config, &config_path)
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&std::path::Path>) -> Result<(SessionLogConfig, PathBuf)> {
    let config = SessionLogConfig::load(path)?;
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => SessionLogConfig::config_path()?,
    };
    Ok((config, config_path))
}
