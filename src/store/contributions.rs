//! Contribution links between commits and contributors.

use rusqlite::{params, params_from_iter, Connection};

use crate::error::Result;

pub fn link(conn: &Connection, commit_id: i64, contributor_id: i64) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO contributions (commit_id, contributor_id) VALUES (?1, ?2)",
        params![commit_id, contributor_id],
    )?;
    Ok(())
}

/// Delete every link on the given commits. Returns the number removed.
pub fn clear_for_commits(conn: &Connection, commit_ids: &[i64]) -> Result<usize> {
    let mut removed = 0;
    // Stay well below SQLITE_MAX_VARIABLE_NUMBER.
    for chunk in commit_ids.chunks(500) {
        let placeholders = vec!["?"; chunk.len()].join(", ");
        let sql = format!(
            "DELETE FROM contributions WHERE commit_id IN ({})",
            placeholders
        );
        removed += conn.execute(&sql, params_from_iter(chunk.iter()))?;
    }
    Ok(removed)
}

pub fn count(conn: &Connection) -> Result<u64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM contributions", [], |row| row.get(0))?)
}

/// Every link as `(sha1, contributor name)`, sorted.
pub fn pairs(conn: &Connection) -> Result<Vec<(String, String)>> {
    let mut stmt = conn.prepare(
        "SELECT cm.sha1, c.name
         FROM contributions ct
         JOIN commits cm ON cm.id = ct.commit_id
         JOIN contributors c ON c.id = ct.contributor_id
         ORDER BY cm.sha1, c.name",
    )?;
    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::fixtures::{entry, sha};
    use crate::store::{commits, contributors, Database};

    #[test]
    fn test_link_is_idempotent() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connection();
        let commit = commits::insert(conn, &entry(1, "Jane")).unwrap();
        let jane = contributors::find_or_create(conn, "Jane").unwrap();
        link(conn, commit, jane).unwrap();
        link(conn, commit, jane).unwrap();
        assert_eq!(count(conn).unwrap(), 1);
        assert_eq!(pairs(conn).unwrap(), vec![(sha(1), "Jane".to_string())]);
    }

    #[test]
    fn test_clear_for_commits_only_touches_given_commits() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connection();
        let jane = contributors::find_or_create(conn, "Jane").unwrap();
        let ids: Vec<i64> = (1..=3)
            .map(|n| commits::insert(conn, &entry(n, "Jane")).unwrap())
            .collect();
        for id in &ids {
            link(conn, *id, jane).unwrap();
        }

        assert_eq!(clear_for_commits(conn, &ids[..2]).unwrap(), 2);
        assert_eq!(pairs(conn).unwrap(), vec![(sha(3), "Jane".to_string())]);
        assert_eq!(clear_for_commits(conn, &[]).unwrap(), 0);
    }

    #[test]
    fn test_clear_for_many_commits() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connection();
        let jane = contributors::find_or_create(conn, "Jane").unwrap();
        let ids: Vec<i64> = (1..=1200)
            .map(|n| commits::insert(conn, &entry(n, "Jane")).unwrap())
            .collect();
        for id in &ids {
            link(conn, *id, jane).unwrap();
        }
        assert_eq!(clear_for_commits(conn, &ids).unwrap(), 1200);
        assert_eq!(count(conn).unwrap(), 0);
    }
}
