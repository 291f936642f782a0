//! CLI argument parsing and command dispatch

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use contrib_rank::config::Settings;
use contrib_rank::output::OutputConfig;

use crate::commands;

/// Contributor ranking - keep commits, contributors and ranks in sync with git
#[derive(Parser, Debug)]
#[command(name = "contrib-rank")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Settings file (defaults to .contrib-rank.yaml if present)
    #[arg(long, global = true, value_name = "FILE", env = "CONTRIB_RANK_CONFIG")]
    config: Option<PathBuf>,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pull the repository and bring the database up to date
    Update(commands::update::UpdateArgs),
    /// List contributors by rank
    Contributors(commands::contributors::ContributorsArgs),
    /// Show a stored commit and who it credits
    Show(commands::show::ShowArgs),
    /// List past updates
    History(commands::history::HistoryArgs),
    /// Manage the rendered-view cache
    Cache(commands::cache::CacheArgs),
    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);
        let output = OutputConfig::from_env_and_flag(&self.color);

        if let Commands::Completions(args) = self.command {
            return commands::completions::execute(args);
        }

        let settings = Settings::discover(self.config.as_deref())
            .context("Failed to load settings")?;

        match self.command {
            Commands::Update(args) => commands::update::execute(args, &settings, &output),
            Commands::Contributors(args) => {
                commands::contributors::execute(args, &settings, &output)
            }
            Commands::Show(args) => commands::show::execute(args, &settings, &output),
            Commands::History(args) => commands::history::execute(args, &settings, &output),
            Commands::Cache(args) => commands::cache::execute(args, &settings, &output),
            Commands::Completions(_) => Ok(()),
        }
    }
}

/// Log to stderr at `level`; `RUST_LOG` refines it further when set.
fn init_logging(level: &str) {
    let _ = env_logger::Builder::new()
        .parse_filters(level)
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
