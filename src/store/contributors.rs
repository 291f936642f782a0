//! Contributor rows.

use std::collections::BTreeSet;

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{Contributor, RankedContributor};
use crate::error::Result;

fn from_row(row: &Row<'_>) -> rusqlite::Result<Contributor> {
    Ok(Contributor {
        id: row.get(0)?,
        name: row.get(1)?,
        url_id: row.get(2)?,
        rank: row.get(3)?,
        first_contribution_at: row.get(4)?,
    })
}

/// Distinct names of every stored contributor.
pub fn names(conn: &Connection) -> Result<BTreeSet<String>> {
    let mut stmt = conn.prepare("SELECT name FROM contributors")?;
    let rows = stmt.query_map([], |row| row.get(0))?;
    Ok(rows.collect::<rusqlite::Result<BTreeSet<String>>>()?)
}

pub fn count(conn: &Connection) -> Result<u64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM contributors", [], |row| row.get(0))?)
}

pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<Contributor>> {
    Ok(conn
        .query_row(
            "SELECT id, name, url_id, rank, first_contribution_at FROM contributors WHERE name = ?1",
            [name],
            from_row,
        )
        .optional()?)
}

/// Id of the contributor called `name`, creating it if needed.
pub fn find_or_create(conn: &Connection, name: &str) -> Result<i64> {
    if let Some(existing) = find_by_name(conn, name)? {
        return Ok(existing.id);
    }

    let url_id = unique_url_id(conn, name)?;
    conn.execute(
        "INSERT INTO contributors (name, url_id) VALUES (?1, ?2)",
        params![name, url_id],
    )?;
    log::debug!("created contributor {:?} ({})", name, url_id);
    Ok(conn.last_insert_rowid())
}

/// Delete a contributor. Its contributions go with it.
pub fn delete(conn: &Connection, id: i64) -> Result<()> {
    conn.execute("DELETE FROM contributors WHERE id = ?1", [id])?;
    Ok(())
}

/// Every contributor with its contribution count, most contributions first.
/// Ties are ordered by id.
pub fn ranked(conn: &Connection) -> Result<Vec<RankedContributor>> {
    let mut stmt = conn.prepare(
        "SELECT c.id, c.name, c.url_id, c.rank, c.first_contribution_at, COUNT(ct.id) AS n
         FROM contributors c
         LEFT JOIN contributions ct ON ct.contributor_id = c.id
         GROUP BY c.id
         ORDER BY n DESC, c.id ASC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(RankedContributor {
            contributor: from_row(row)?,
            ncontributions: row.get(5)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn set_rank(conn: &Connection, id: i64, rank: i64) -> Result<()> {
    conn.execute(
        "UPDATE contributors SET rank = ?1 WHERE id = ?2",
        params![rank, id],
    )?;
    Ok(())
}

/// Contributors linked to a commit, by name.
pub fn for_commit(conn: &Connection, commit_id: i64) -> Result<Vec<Contributor>> {
    let mut stmt = conn.prepare(
        "SELECT c.id, c.name, c.url_id, c.rank, c.first_contribution_at
         FROM contributors c
         JOIN contributions ct ON ct.contributor_id = c.id
         WHERE ct.commit_id = ?1
         ORDER BY c.name",
    )?;
    let rows = stmt.query_map([commit_id], from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Recompute `first_contribution_at` for every contributor from its linked
/// commits. Returns the number of rows whose value changed.
pub fn refresh_first_contributions(conn: &Connection) -> Result<usize> {
    let changed = conn.execute(
        "UPDATE contributors SET first_contribution_at = (
             SELECT MIN(cm.author_timestamp)
             FROM contributions ct JOIN commits cm ON cm.id = ct.commit_id
             WHERE ct.contributor_id = contributors.id
         )
         WHERE first_contribution_at IS NOT (
             SELECT MIN(cm.author_timestamp)
             FROM contributions ct JOIN commits cm ON cm.id = ct.commit_id
             WHERE ct.contributor_id = contributors.id
         )",
        [],
    )?;
    Ok(changed)
}

/// URL slug for a name: lowercase alphanumerics, other runs collapsed to `-`.
pub fn slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "contributor".to_string()
    } else {
        slug.to_string()
    }
}

fn unique_url_id(conn: &Connection, name: &str) -> Result<String> {
    let base = slug(name);
    let taken = |candidate: &str| -> Result<bool> {
        Ok(conn
            .query_row(
                "SELECT 1 FROM contributors WHERE url_id = ?1",
                [candidate],
                |_| Ok(()),
            )
            .optional()?
            .is_some())
    };

    if !taken(&base)? {
        return Ok(base);
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}-{}", base, n);
        if !taken(&candidate)? {
            return Ok(candidate);
        }
        n += 1;
    }
}
