//! # Show Command Implementation
//!
//! Prints one stored commit, the contributors it is linked to, and the names
//! the current rules derive for it. Unlike an update, name resolution here
//! also reads the full `git show` text of the commit, so trailers that only
//! appear there are visible. When the two lists disagree the next update
//! (or a rules change) will reconcile them.

use anyhow::{anyhow, Context, Result};
use clap::Args;
use std::path::PathBuf;

use contrib_rank::config::Settings;
use contrib_rank::history::{GitHistory, HistorySource};
use contrib_rank::names::NameResolver;
use contrib_rank::output::{OutputConfig, Tone};
use contrib_rank::store::{commits, contributors, Database};

/// Show a stored commit and who it credits
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Full 40-character sha1 of the commit.
    #[arg(value_name = "SHA1")]
    pub sha1: String,

    /// Local checkout used to read the commit's full text.
    #[arg(long, value_name = "PATH", default_value = ".")]
    pub repo: PathBuf,
}

/// Execute the `show` command.
pub fn execute(args: ShowArgs, settings: &Settings, output: &OutputConfig) -> Result<()> {
    let db = Database::open_read_only(&settings.database)
        .with_context(|| format!("Failed to open {}", settings.database.display()))?;
    let conn = db.connection();

    let commit = commits::find_by_sha1(conn, &args.sha1)?.ok_or_else(|| {
        anyhow!(
            "Commit {} is not in the database\n  hint: Run `contrib-rank update` to import new commits",
            args.sha1
        )
    })?;
    let linked = contributors::for_commit(conn, commit.id)?;

    let detail = match GitHistory::new(&args.repo).detail(&commit.sha1) {
        Ok(text) => Some(text),
        Err(e) => {
            log::warn!("resolving without commit detail: {}", e);
            None
        }
    };
    let resolver = NameResolver::new(settings.name_rules()?)?;
    let resolved = resolver.resolve(&commit, detail.as_deref());

    println!("{} {}", output.paint("commit", Tone::Heading), commit.sha1);
    if commit.merge {
        println!("Merge:     yes");
    }
    println!("Author:    {} <{}>", commit.author_name, commit.author_email);
    println!("Date:      {}", commit.author_timestamp.to_rfc3339());
    println!(
        "Committer: {} <{}>",
        commit.committer_name, commit.committer_email
    );
    println!();
    for line in commit.message.lines() {
        println!("    {}", line);
    }
    println!();

    println!("{}", output.paint("Credited:", Tone::Heading));
    if linked.is_empty() {
        println!("  {}", output.paint("nobody", Tone::Muted));
    }
    for contributor in &linked {
        println!("  {} (rank {})", contributor.name, contributor.rank);
    }

    println!("{}", output.paint("Resolved by current rules:", Tone::Heading));
    if resolved.is_empty() {
        println!("  {}", output.paint("nobody", Tone::Muted));
    }
    for name in &resolved {
        let marker = if linked.iter().any(|c| &c.name == name) {
            ""
        } else {
            " (not linked yet)"
        };
        println!("  {}{}", name, output.paint(marker, Tone::Warning));
    }
    Ok(())
}
