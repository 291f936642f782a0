//! Commit import
//!
//! Walks the log from the tip backwards in fixed-size pages and inserts every
//! commit it has not seen before. The walk stops at the first commit that is
//! already stored, or at an empty page (the root of history).
//!
//! Import runs inside the update transaction. Any failure, a rejected
//! commit included, propagates and rolls back every commit inserted so far in
//! the run.

use log::{debug, info};
use rusqlite::Connection;

use crate::error::Result;
use crate::history::HistorySource;
use crate::store::commits;

/// Import unseen commits from `branch`. Returns how many were inserted.
pub fn import(
    conn: &Connection,
    source: &dyn HistorySource,
    branch: &str,
    page_size: usize,
) -> Result<u64> {
    let mut imported = 0;
    let mut offset = 0;

    loop {
        let page = source.log(branch, page_size, offset)?;
        if page.is_empty() {
            debug!("reached the root of {} after {} commits", branch, imported);
            break;
        }

        for entry in &page {
            if commits::exists(conn, &entry.sha1)? {
                debug!("stopping at known commit {}", entry.sha1);
                info!("imported {} new commits", imported);
                return Ok(imported);
            }
            commits::insert(conn, entry)?;
            imported += 1;
        }

        offset += page_size;
    }

    info!("imported {} new commits", imported);
    Ok(imported)
}
