//! Linking commits to contributors.

use std::collections::{BTreeSet, HashMap};

use log::{debug, info, warn};
use rusqlite::Connection;

use crate::error::Result;
use crate::store::{commits, contributions, contributors};

/// Counts from one assignment pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Assignment {
    /// Commits that had no contributions when the pass started.
    pub commits: usize,
    /// Contributions created.
    pub links: usize,
    /// Unlinked commits for which no name survived the ruleset.
    pub nameless: usize,
}

/// Link every commit without contributions to the contributors named in
/// `names_by_commit`, creating contributors on first sight.
pub fn assign(
    conn: &Connection,
    names_by_commit: &HashMap<i64, BTreeSet<String>>,
) -> Result<Assignment> {
    let empty = BTreeSet::new();
    let mut ids: HashMap<&str, i64> = HashMap::new();
    let mut result = Assignment::default();

    for commit_id in commits::without_contributions(conn)? {
        result.commits += 1;
        let names = names_by_commit.get(&commit_id).unwrap_or(&empty);
        if names.is_empty() {
            debug!("commit {} credits nobody", commit_id);
            result.nameless += 1;
            continue;
        }

        for name in names {
            let contributor_id = match ids.get(name.as_str()) {
                Some(id) => *id,
                None => {
                    let id = contributors::find_or_create(conn, name)?;
                    ids.insert(name, id);
                    id
                }
            };
            contributions::link(conn, commit_id, contributor_id)?;
            result.links += 1;
        }
    }

    if result.nameless > 0 {
        warn!(
            "{} of {} unlinked commits credit nobody after name rules",
            result.nameless, result.commits
        );
    }
    info!(
        "assigned {} contributions across {} commits",
        result.links, result.commits
    );
    Ok(result)
}
