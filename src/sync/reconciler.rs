//! Contributor reconciliation
//!
//! The naming ruleset can change between runs and reclassify any commit,
//! however old. So every run re-derives contributor names from every stored
//! commit rather than from the newly imported ones alone, and compares the
//! result with the contributors already stored.
//!
//! Contributors whose name no longer comes out of any commit are "gone".
//! Each gone contributor is deleted and every contribution on the commits
//! it was linked to is cleared, so the assigner can relink those commits
//! from scratch. Commits no gone contributor touched keep their links.

use std::collections::{BTreeSet, HashMap};

use log::{debug, info};
use rusqlite::Connection;

use crate::error::Result;
use crate::names::NameResolver;
use crate::store::{commits, contributions, contributors};

/// Result of a reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Every name the resolver produces over the stored commits.
    pub current_names: BTreeSet<String>,
    /// Names that were stored but are no longer produced.
    pub gone_names: BTreeSet<String>,
    /// Resolved names per commit id, reused by the assigner.
    pub names_by_commit: HashMap<i64, BTreeSet<String>>,
}

/// Resolve every stored commit and drop contributors that are gone.
pub fn reconcile(conn: &Connection, resolver: &NameResolver) -> Result<Reconciliation> {
    let mut current_names = BTreeSet::new();
    let mut names_by_commit = HashMap::new();
    for commit in commits::all(conn)? {
        let names = resolver.resolve(&commit, None);
        current_names.extend(names.iter().cloned());
        names_by_commit.insert(commit.id, names);
    }

    let previous_names = contributors::names(conn)?;
    let gone_names: BTreeSet<String> = previous_names
        .difference(&current_names)
        .cloned()
        .collect();

    for name in &gone_names {
        let Some(contributor) = contributors::find_by_name(conn, name)? else {
            continue;
        };
        let linked = commits::linked_to(conn, contributor.id)?;
        contributors::delete(conn, contributor.id)?;
        let cleared = contributions::clear_for_commits(conn, &linked)?;
        debug!(
            "contributor {:?} is gone: {} commits unlinked ({} other links cleared)",
            name,
            linked.len(),
            cleared
        );
    }

    if !gone_names.is_empty() {
        info!("{} contributors are gone", gone_names.len());
    }

    Ok(Reconciliation {
        current_names,
        gone_names,
        names_by_commit,
    })
}
