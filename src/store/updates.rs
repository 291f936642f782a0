//! Update audit records.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::UpdateRecord;
use crate::error::Result;

/// Fields of an update record before it is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUpdateRecord {
    pub ncommits: u64,
    pub started_at: DateTime<Utc>,
    pub pulled_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

fn from_row(row: &Row<'_>) -> rusqlite::Result<UpdateRecord> {
    Ok(UpdateRecord {
        id: row.get(0)?,
        ncommits: row.get(1)?,
        started_at: row.get(2)?,
        pulled_at: row.get(3)?,
        ended_at: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Store a record stamped with `created_at`.
pub fn insert(
    conn: &Connection,
    record: &NewUpdateRecord,
    created_at: DateTime<Utc>,
) -> Result<UpdateRecord> {
    conn.execute(
        "INSERT INTO repo_updates (ncommits, started_at, pulled_at, ended_at, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            record.ncommits,
            record.started_at,
            record.pulled_at,
            record.ended_at,
            created_at
        ],
    )?;
    Ok(UpdateRecord {
        id: conn.last_insert_rowid(),
        ncommits: record.ncommits,
        started_at: record.started_at,
        pulled_at: record.pulled_at,
        ended_at: record.ended_at,
        created_at,
    })
}

/// The most recently created record, if any.
pub fn last(conn: &Connection) -> Result<Option<UpdateRecord>> {
    Ok(conn
        .query_row(
            "SELECT id, ncommits, started_at, pulled_at, ended_at, created_at
             FROM repo_updates ORDER BY created_at DESC, id DESC LIMIT 1",
            [],
            from_row,
        )
        .optional()?)
}

/// Up to `limit` records, newest first.
pub fn recent(conn: &Connection, limit: usize) -> Result<Vec<UpdateRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, ncommits, started_at, pulled_at, ended_at, created_at
         FROM repo_updates ORDER BY created_at DESC, id DESC LIMIT ?1",
    )?;
    let rows = stmt.query_map([limit as i64], from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Database;
    use chrono::{Duration, TimeZone};

    fn record(ncommits: u64, at: DateTime<Utc>) -> NewUpdateRecord {
        NewUpdateRecord {
            ncommits,
            started_at: at,
            pulled_at: at + Duration::seconds(1),
            ended_at: at + Duration::seconds(2),
        }
    }

    #[test]
    fn test_last_of_empty_table() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(last(db.connection()).unwrap(), None);
    }

    #[test]
    fn test_insert_and_last() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connection();
        let day = Utc.with_ymd_and_hms(2024, 5, 6, 12, 0, 0).unwrap();

        insert(conn, &record(3, day), day + Duration::seconds(2)).unwrap();
        let next_day = day + Duration::days(1);
        let newer = insert(conn, &record(0, next_day), next_day).unwrap();

        let found = last(conn).unwrap().unwrap();
        assert_eq!(found, newer);
        assert_eq!(found.ncommits, 0);
        assert_eq!(found.pulled_at, next_day + Duration::seconds(1));
    }

    #[test]
    fn test_recent_is_newest_first_and_limited() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connection();
        let day = Utc.with_ymd_and_hms(2024, 5, 6, 12, 0, 0).unwrap();
        for n in 0..5 {
            let at = day + Duration::hours(n);
            insert(conn, &record(n as u64, at), at).unwrap();
        }

        let records = recent(conn, 3).unwrap();
        let counts: Vec<u64> = records.iter().map(|r| r.ncommits).collect();
        assert_eq!(counts, vec![4, 3, 2]);
    }
}
