//! # History Command Implementation
//!
//! Lists the audit records of past updates, newest first.

use anyhow::{Context, Result};
use clap::Args;

use contrib_rank::config::Settings;
use contrib_rank::output::{OutputConfig, Tone};
use contrib_rank::store::{updates, Database};

/// List past updates
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Show at most N updates.
    #[arg(long, value_name = "N", default_value_t = 10)]
    pub limit: usize,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Execute the `history` command.
pub fn execute(args: HistoryArgs, settings: &Settings, output: &OutputConfig) -> Result<()> {
    let db = Database::open_read_only(&settings.database)
        .with_context(|| format!("Failed to open {}", settings.database.display()))?;
    let records = updates::recent(db.connection(), args.limit)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No updates recorded yet.");
        return Ok(());
    }

    println!(
        "{}",
        output.paint(
            &format!("{:<25}  {:>7}  {:>8}  {:>8}", "FINISHED", "COMMITS", "PULL", "TOTAL"),
            Tone::Heading
        )
    );
    for record in &records {
        let pull = record.pulled_at - record.started_at;
        let total = record.ended_at - record.started_at;
        println!(
            "{:<25}  {:>7}  {:>7.1}s  {:>7.1}s",
            record.created_at.to_rfc3339(),
            record.ncommits,
            pull.num_milliseconds() as f64 / 1000.0,
            total.num_milliseconds() as f64 / 1000.0
        );
    }
    Ok(())
}
