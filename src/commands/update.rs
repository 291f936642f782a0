//! # Update Command Implementation
//!
//! This module implements the `update` subcommand, the one meant to run from
//! cron. It pulls the local checkout, imports new commits, reconciles
//! contributors with the current naming rules, re-ranks, and purges the
//! rendered-view cache when anything it shows may have changed.
//!
//! Only one update runs at a time. A second invocation while one is in
//! flight fails immediately instead of waiting.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use contrib_rank::config::Settings;
use contrib_rank::output::{OutputConfig, Tone};
use contrib_rank::sync::{UpdateOutcome, Updater};

/// Pull the repository and bring the database up to date
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Local checkout to pull and read history from.
    #[arg(long, value_name = "PATH", default_value = ".")]
    pub repo: PathBuf,
}

/// Execute the `update` command.
pub fn execute(args: UpdateArgs, settings: &Settings, output: &OutputConfig) -> Result<()> {
    let updater = Updater::new(settings.clone(), &args.repo);
    let outcome = updater
        .update()
        .with_context(|| format!("Failed to update from {}", args.repo.display()))?;

    print_outcome(&outcome, output);
    Ok(())
}

fn print_outcome(outcome: &UpdateOutcome, output: &OutputConfig) {
    let record = &outcome.record;
    let elapsed = record.ended_at - record.started_at;

    println!(
        "{} {} ({:.1}s)",
        output.symbol("✔", "[OK]"),
        output.paint("Update complete", Tone::Success),
        elapsed.num_milliseconds() as f64 / 1000.0
    );
    println!("  New commits:       {}", record.ncommits);

    if outcome.gone_names.is_empty() {
        println!("  Gone contributors: none");
    } else {
        let names: Vec<&str> = outcome.gone_names.iter().map(String::as_str).collect();
        println!(
            "  Gone contributors: {}",
            output.paint(&names.join(", "), Tone::Warning)
        );
    }

    if outcome.recomputed {
        println!("  Rank changes:      {}", outcome.ranks_changed);
    } else {
        println!(
            "  Rank changes:      {}",
            output.paint("skipped (nothing changed)", Tone::Muted)
        );
    }
    println!(
        "  Cache purged:      {}",
        if outcome.cache_purged { "yes" } else { "no" }
    );
}
