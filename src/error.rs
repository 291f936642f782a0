//! # Error Handling
//!
//! This module defines the centralized error type for `contrib-rank`. It uses
//! `thiserror` to derive a single `Error` enum covering every failure the
//! update pipeline can hit, and a `Result<T>` alias used throughout the
//! library.
//!
//! ## Failure classes
//!
//! - **Lock contention**: another update already holds the `updating` scope.
//!   Nothing has been touched; the caller may simply try again later.
//! - **Source I/O**: `git pull`, `git log` or `git show` failed, or produced
//!   output we could not parse. Fatal for the current run.
//! - **Import validation**: a commit could not be persisted. The enclosing
//!   transaction is rolled back, so no commit from the run survives.
//! - **Ambient**: configuration, database, cache directory and filesystem
//!   errors.
//!
//! No variant is retried anywhere in the crate. A rerun is always safe: the
//! importer resumes at the first known commit and the reconciler recomputes
//! contributor state from scratch.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for contrib-rank operations
#[derive(Error, Debug)]
pub enum Error {
    /// The exclusive lock for `scope` is already held by another process.
    #[error("Another update is already running (lock '{scope}' held at {})", path.display())]
    LockContention { scope: String, path: PathBuf },

    /// A `git` invocation failed.
    #[error("Git command failed in {}: {command} - {stderr}", repo.display())]
    GitCommand {
        command: String,
        repo: PathBuf,
        stderr: String,
    },

    /// `git` succeeded but its output did not have the expected shape.
    #[error("Unexpected history output: {message}")]
    HistoryParse { message: String },

    /// A newly discovered commit failed validation or could not be inserted.
    #[error("Commit {sha1} could not be imported: {message}")]
    ImportValidation { sha1: String, message: String },

    /// An error occurred while loading settings or the naming ruleset.
    #[error("Configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// An error occurred while purging the rendered-view cache.
    #[error("Cache operation error: {message}")]
    Cache { message: String },

    /// A read-only command was pointed at a database file that does not exist.
    #[error("Database not found at {}\n  hint: Run `contrib-rank update` first, or check the `database` setting", path.display())]
    MissingDatabase { path: PathBuf },

    /// A SQLite error, wrapped from `rusqlite::Error`.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl Error {
    /// True for failures of the history source (pull, log, detail).
    pub fn is_source_error(&self) -> bool {
        matches!(self, Error::GitCommand { .. } | Error::HistoryParse { .. })
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
