//! Commit rows.

use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};

use super::Commit;
use crate::error::{Error, Result};
use crate::history::LogEntry;

const COLUMNS: &str = "id, sha1, author_name, author_email, author_timestamp, \
                       committer_name, committer_email, committer_timestamp, message, merge";

fn from_row(row: &Row<'_>) -> rusqlite::Result<Commit> {
    Ok(Commit {
        id: row.get(0)?,
        sha1: row.get(1)?,
        author_name: row.get(2)?,
        author_email: row.get(3)?,
        author_timestamp: row.get(4)?,
        committer_name: row.get(5)?,
        committer_email: row.get(6)?,
        committer_timestamp: row.get(7)?,
        message: row.get(8)?,
        merge: row.get(9)?,
    })
}

/// Check the invariants a commit must satisfy before it is stored.
pub fn validate(entry: &LogEntry) -> Result<()> {
    let invalid = |message: &str| Error::ImportValidation {
        sha1: entry.sha1.clone(),
        message: message.to_string(),
    };

    if entry.sha1.len() != 40 || !entry.sha1.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')) {
        return Err(invalid("sha1 must be 40 lowercase hex characters"));
    }
    if entry.author_name.trim().is_empty() {
        return Err(invalid("author name is blank"));
    }
    Ok(())
}

/// Validate and insert a commit, returning its row id.
pub fn insert(conn: &Connection, entry: &LogEntry) -> Result<i64> {
    validate(entry)?;

    conn.execute(
        "INSERT INTO commits (sha1, author_name, author_email, author_timestamp,
                              committer_name, committer_email, committer_timestamp, message, merge)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            entry.sha1,
            entry.author_name,
            entry.author_email,
            entry.author_timestamp,
            entry.committer_name,
            entry.committer_email,
            entry.committer_timestamp,
            entry.message,
            entry.merge,
        ],
    )
    .map_err(|e| match e.sqlite_error_code() {
        Some(ErrorCode::ConstraintViolation) => Error::ImportValidation {
            sha1: entry.sha1.clone(),
            message: e.to_string(),
        },
        _ => Error::Database(e),
    })?;

    Ok(conn.last_insert_rowid())
}

pub fn exists(conn: &Connection, sha1: &str) -> Result<bool> {
    Ok(conn
        .query_row("SELECT 1 FROM commits WHERE sha1 = ?1", [sha1], |_| Ok(()))
        .optional()?
        .is_some())
}

pub fn find_by_sha1(conn: &Connection, sha1: &str) -> Result<Option<Commit>> {
    let sql = format!("SELECT {} FROM commits WHERE sha1 = ?1", COLUMNS);
    Ok(conn.query_row(&sql, [sha1], from_row).optional()?)
}

/// Every stored commit, in insertion order.
pub fn all(conn: &Connection) -> Result<Vec<Commit>> {
    let sql = format!("SELECT {} FROM commits ORDER BY id", COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn count(conn: &Connection) -> Result<u64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM commits", [], |row| row.get(0))?)
}

/// Ids of commits with no contribution links.
pub fn without_contributions(conn: &Connection) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare(
        "SELECT id FROM commits c
         WHERE NOT EXISTS (SELECT 1 FROM contributions ct WHERE ct.commit_id = c.id)
         ORDER BY id",
    )?;
    let rows = stmt.query_map([], |row| row.get(0))?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Ids of commits linked to `contributor_id`.
pub fn linked_to(conn: &Connection, contributor_id: i64) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare(
        "SELECT commit_id FROM contributions WHERE contributor_id = ?1 ORDER BY commit_id",
    )?;
    let rows = stmt.query_map([contributor_id], |row| row.get(0))?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}
