//! Dense ranking
//!
//! Contributors are ordered by contribution count, most first. The first
//! group gets rank 1 and every change in count moves to the next rank, so
//! equal counts share a rank and no rank is skipped: counts
//! `[10, 10, 7, 3, 3, 3]` rank as `[1, 1, 2, 3, 3, 3]`.

use log::{debug, info};
use rusqlite::Connection;

use crate::error::Result;
use crate::store::{contributors, RankedContributor};

/// Dense ranks for counts sorted in non-increasing order.
pub fn dense_ranks<I>(counts: I) -> Vec<i64>
where
    I: IntoIterator<Item = u64>,
{
    let mut previous: Option<u64> = None;
    let mut rank = 0;
    counts
        .into_iter()
        .map(|count| {
            if previous != Some(count) {
                rank += 1;
                previous = Some(count);
            }
            rank
        })
        .collect()
}

/// `(contributor id, new rank)` for every contributor whose stored rank
/// differs from its dense rank. `ranked` must be in [`contributors::ranked`]
/// order.
pub fn rank_changes(ranked: &[RankedContributor]) -> Vec<(i64, i64)> {
    let ranks = dense_ranks(ranked.iter().map(|r| r.ncontributions));
    ranked
        .iter()
        .zip(ranks)
        .filter(|(r, rank)| r.contributor.rank != *rank)
        .map(|(r, rank)| (r.contributor.id, rank))
        .collect()
}

/// Recompute and store ranks. Only changed rows are written; returns how many.
pub fn update_ranks(conn: &Connection) -> Result<usize> {
    let ranked = contributors::ranked(conn)?;
    let changes = rank_changes(&ranked);
    for (id, rank) in &changes {
        debug!("contributor {} moves to rank {}", id, rank);
        contributors::set_rank(conn, *id, *rank)?;
    }
    info!(
        "ranked {} contributors, {} ranks changed",
        ranked.len(),
        changes.len()
    );
    Ok(changes.len())
}
