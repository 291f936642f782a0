//! # Contributors Command Implementation
//!
//! Lists contributors in rank order with their contribution counts, as of
//! the last update. Read-only; use `--json` for machine-readable output.

use anyhow::{Context, Result};
use clap::Args;

use contrib_rank::config::Settings;
use contrib_rank::output::{OutputConfig, Tone};
use contrib_rank::store::{contributors, Database, RankedContributor};

/// List contributors by rank
#[derive(Args, Debug)]
pub struct ContributorsArgs {
    /// Show at most N contributors.
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Execute the `contributors` command.
pub fn execute(args: ContributorsArgs, settings: &Settings, output: &OutputConfig) -> Result<()> {
    let db = Database::open_read_only(&settings.database)
        .with_context(|| format!("Failed to open {}", settings.database.display()))?;
    let mut ranked = contributors::ranked(db.connection())?;
    if let Some(limit) = args.limit {
        ranked.truncate(limit);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&ranked)?);
        return Ok(());
    }

    if ranked.is_empty() {
        println!("No contributors yet. Run `contrib-rank update` first.");
        return Ok(());
    }

    println!(
        "{}",
        output.paint(
            &format!("{:>5}  {:>7}  {}", "RANK", "COMMITS", "NAME"),
            Tone::Heading
        )
    );
    for entry in &ranked {
        println!("{}", format_row(entry, output));
    }
    Ok(())
}

fn format_row(entry: &RankedContributor, output: &OutputConfig) -> String {
    let contributor = &entry.contributor;
    format!(
        "{:>5}  {:>7}  {} {}",
        contributor.rank,
        entry.ncontributions,
        contributor.name,
        output.paint(&format!("({})", contributor.url_id), Tone::Muted)
    )
}
