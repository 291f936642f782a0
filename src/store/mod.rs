//! # Relational Store
//!
//! SQLite persistence for commits, contributors, the contributions joining
//! them, and the audit trail of update runs.
//!
//! [`Database`] owns the connection and the schema. Reads and writes are
//! free functions in the submodules that take a `&Connection`; because a
//! `rusqlite::Transaction` derefs to a `Connection`, the same functions run
//! unchanged inside the single transaction an update opens.
//!
//! ## Tables
//!
//! - `commits`: one row per imported commit, `sha1` unique. Row ids follow
//!   insertion order, which within one run is newest-discovered first.
//! - `contributors`: one row per canonical name, with a URL slug, the dense
//!   rank and the timestamp of the first contribution.
//! - `contributions`: `(commit_id, contributor_id)` pairs. Deleting a
//!   contributor cascades to its contributions.
//! - `repo_updates`: one audit row per completed update.

pub mod commits;
pub mod contributions;
pub mod contributors;
pub mod updates;

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OpenFlags, Transaction};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::history::LogEntry;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS commits (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    sha1 TEXT NOT NULL UNIQUE,
    author_name TEXT NOT NULL,
    author_email TEXT NOT NULL,
    author_timestamp TEXT NOT NULL,
    committer_name TEXT NOT NULL,
    committer_email TEXT NOT NULL,
    committer_timestamp TEXT NOT NULL,
    message TEXT NOT NULL,
    merge INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS contributors (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    url_id TEXT NOT NULL UNIQUE,
    rank INTEGER NOT NULL DEFAULT 0,
    first_contribution_at TEXT
);

CREATE TABLE IF NOT EXISTS contributions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    commit_id INTEGER NOT NULL REFERENCES commits(id),
    contributor_id INTEGER NOT NULL REFERENCES contributors(id) ON DELETE CASCADE,
    UNIQUE (commit_id, contributor_id)
);

CREATE INDEX IF NOT EXISTS idx_contributions_contributor ON contributions(contributor_id);

CREATE TABLE IF NOT EXISTS repo_updates (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    ncommits INTEGER NOT NULL,
    started_at TEXT NOT NULL,
    pulled_at TEXT NOT NULL,
    ended_at TEXT NOT NULL,
    created_at TEXT NOT NULL
);
";

/// A stored commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commit {
    pub id: i64,
    pub sha1: String,
    pub author_name: String,
    pub author_email: String,
    pub author_timestamp: DateTime<Utc>,
    pub committer_name: String,
    pub committer_email: String,
    pub committer_timestamp: DateTime<Utc>,
    pub message: String,
    pub merge: bool,
}

impl Commit {
    /// Build the stored form of a log entry persisted under `id`.
    pub fn from_log(id: i64, entry: &LogEntry) -> Self {
        Self {
            id,
            sha1: entry.sha1.clone(),
            author_name: entry.author_name.clone(),
            author_email: entry.author_email.clone(),
            author_timestamp: entry.author_timestamp,
            committer_name: entry.committer_name.clone(),
            committer_email: entry.committer_email.clone(),
            committer_timestamp: entry.committer_timestamp,
            message: entry.message.clone(),
            merge: entry.merge,
        }
    }

    /// First line of the message.
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }
}

/// A stored contributor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contributor {
    pub id: i64,
    pub name: String,
    pub url_id: String,
    /// Dense rank, 1 for the most prolific. 0 until first ranked.
    pub rank: i64,
    pub first_contribution_at: Option<DateTime<Utc>>,
}

/// A contributor together with its derived contribution count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedContributor {
    #[serde(flatten)]
    pub contributor: Contributor,
    pub ncontributions: u64,
}

/// Audit entry for one completed update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateRecord {
    pub id: i64,
    pub ncommits: u64,
    pub started_at: DateTime<Utc>,
    pub pulled_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Owner of the SQLite connection.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (creating if needed) the database file at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Self::init(Connection::open(path)?)
    }

    /// Open an existing database for reading. Never creates the file.
    pub fn open_read_only(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::MissingDatabase {
                path: path.to_path_buf(),
            });
        }
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.pragma_update(None, "foreign_keys", true)?;
        Ok(Self { conn })
    }

    /// A private in-memory database, used by tests and dry runs.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Begin a transaction. Dropping it without `commit()` rolls back.
    pub fn transaction(&mut self) -> Result<Transaction<'_>> {
        Ok(self.conn.transaction()?)
    }
}
