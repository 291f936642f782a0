//! # Contributor Ranking CLI
//!
//! Binary entry point for the `contrib-rank` command-line tool.
//!
//! Its responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Setting up logging and output styling.
//! - Dispatching to the command, and turning errors into a non-zero exit.
//!
//! Everything else lives in the `contrib_rank` library crate.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
