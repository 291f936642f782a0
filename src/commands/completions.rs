//! # Completions Command Implementation
//!
//! Writes a shell completion script for `contrib-rank` to stdout, generated
//! by `clap_complete` from the same definition the parser uses.
//!
//! ```bash
//! contrib-rank completions bash > ~/.local/share/bash-completion/completions/contrib-rank
//! contrib-rank completions zsh > ~/.zfunc/_contrib-rank
//! ```

use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use std::io;

use crate::cli::Cli;

/// Generate shell completion scripts
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// The shell to generate completions for (bash, zsh, fish, powershell, elvish)
    #[arg(value_enum, value_name = "SHELL")]
    pub shell: Shell,
}

/// Execute the `completions` command.
pub fn execute(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "contrib-rank", &mut io::stdout());
    Ok(())
}
