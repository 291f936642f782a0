//! # CLI Command Implementations
//!
//! One module per `contrib-rank` subcommand. Each defines an `Args` struct
//! derived with `clap` and an `execute` function that does the work by
//! calling into the `contrib_rank` library.
//!
//! Commands that touch the database or cache receive the resolved
//! [`Settings`](contrib_rank::config::Settings) and the
//! [`OutputConfig`](contrib_rank::output::OutputConfig) from the dispatcher.

pub mod cache;
pub mod completions;
pub mod contributors;
pub mod history;
pub mod show;
pub mod update;
