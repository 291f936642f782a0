//! # Cache Command Implementation
//!
//! Manual control over the rendered-view cache. Updates purge it on their
//! own when needed; `cache clear` is for operators who changed something the
//! updater cannot see, such as templates.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use contrib_rank::cache::{DirectoryCache, ViewCache};
use contrib_rank::config::Settings;
use contrib_rank::output::{OutputConfig, Tone};

/// Manage the rendered-view cache
#[derive(Args, Debug)]
pub struct CacheArgs {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: CacheSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum CacheSubcommand {
    /// Remove every cached view
    Clear,
}

/// Execute the `cache` command.
pub fn execute(args: CacheArgs, settings: &Settings, output: &OutputConfig) -> Result<()> {
    match args.command {
        CacheSubcommand::Clear => {
            let cache = DirectoryCache::new(&settings.cache_dir);
            cache
                .purge()
                .with_context(|| format!("Failed to clear {}", cache.root().display()))?;
            println!(
                "{} Cleared {}",
                output.symbol("✔", "[OK]"),
                output.paint(&cache.root().display().to_string(), Tone::Heading)
            );
            Ok(())
        }
    }
}
