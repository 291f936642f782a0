//! Orchestrator for a complete update
//!
//! [`Updater`] sequences the whole synchronization under the `updating` lock:
//!
//! 1. Acquire the lock, failing fast if another update holds it
//! 2. Record `started_at`, pull the source, record `pulled_at`
//! 3. Open one transaction and run import, reconciliation and, when anything
//!    changed, assignment, ranking and first-contribution refresh
//! 4. Commit the transaction
//! 5. Purge the view cache if data changed or a week/month boundary passed
//! 6. Record `ended_at` and store the update audit record
//! 7. Release the lock
//!
//! A failure before step 4 rolls back every write of the run and leaves no
//! audit record. The lock is released on every exit path.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use log::info;

use crate::cache::{DirectoryCache, ViewCache};
use crate::config::{Settings, UPDATE_LOCK_SCOPE};
use crate::error::Result;
use crate::history::{GitHistory, HistorySource};
use crate::lock;
use crate::names::NameResolver;
use crate::store::updates::{self, NewUpdateRecord};
use crate::store::{contributors, Database, UpdateRecord};

use super::{assigner, cache_policy, importer, ranking, reconciler};

type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// What one update did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// The audit record stored for this run.
    pub record: UpdateRecord,
    /// Contributors removed because no commit produces their name anymore.
    pub gone_names: BTreeSet<String>,
    /// Whether contributions and ranks were recomputed.
    pub recomputed: bool,
    /// Contributors whose rank changed.
    pub ranks_changed: usize,
    /// Whether the view cache was purged.
    pub cache_purged: bool,
}

/// Runs updates against one history source, database and view cache.
pub struct Updater {
    settings: Settings,
    history: Box<dyn HistorySource>,
    cache: Box<dyn ViewCache>,
    clock: Clock,
}

impl Updater {
    /// Updater for the git checkout at `repo`, with the cache from `settings`.
    pub fn new(settings: Settings, repo: &Path) -> Self {
        let cache = DirectoryCache::new(settings.cache_dir.clone());
        Self::with_sources(settings, Box::new(GitHistory::new(repo)), Box::new(cache))
    }

    /// Updater with explicit history and cache implementations.
    pub fn with_sources(
        settings: Settings,
        history: Box<dyn HistorySource>,
        cache: Box<dyn ViewCache>,
    ) -> Self {
        Self {
            settings,
            history,
            cache,
            clock: Box::new(Utc::now),
        }
    }

    /// Replace the wall clock used for timestamps and calendar checks.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run one update. Fails with `LockContention` if another is running.
    pub fn update(&self) -> Result<UpdateOutcome> {
        lock::with_lock(&self.settings.lock_dir(), UPDATE_LOCK_SCOPE, || {
            self.update_locked()
        })
    }

    fn update_locked(&self) -> Result<UpdateOutcome> {
        let started_at = (self.clock)();

        // Rules are read fresh so edits between runs take effect.
        let resolver = NameResolver::new(self.settings.name_rules()?)?;
        let mut db = Database::open(&self.settings.database)?;

        self.history.pull()?;
        let pulled_at = (self.clock)();

        let tx = db.transaction()?;
        let ncommits = importer::import(
            &tx,
            self.history.as_ref(),
            &self.settings.branch,
            self.settings.page_size,
        )?;
        let reconciliation = reconciler::reconcile(&tx, &resolver)?;
        let recomputed = cache_policy::needs_update(ncommits, &reconciliation.gone_names);

        let mut ranks_changed = 0;
        if recomputed {
            assigner::assign(&tx, &reconciliation.names_by_commit)?;
            ranks_changed = ranking::update_ranks(&tx)?;
            contributors::refresh_first_contributions(&tx)?;
        }
        tx.commit()?;

        let conn = db.connection();
        let last = updates::last(conn)?.map(|record| record.created_at);
        let cache_purged =
            cache_policy::needs_cache_expiration(recomputed, last, (self.clock)());
        if cache_purged {
            self.cache.purge()?;
        }

        let ended_at = (self.clock)();
        let record = updates::insert(
            conn,
            &NewUpdateRecord {
                ncommits,
                started_at,
                pulled_at,
                ended_at,
            },
            ended_at,
        )?;

        info!(
            "update finished: {} new commits, {} gone contributors, {} rank changes{}",
            ncommits,
            reconciliation.gone_names.len(),
            ranks_changed,
            if cache_purged { ", cache purged" } else { "" }
        );

        Ok(UpdateOutcome {
            record,
            gone_names: reconciliation.gone_names,
            recomputed,
            ranks_changed,
            cache_purged,
        })
    }
}

/// Update from the git checkout at `repo`, with settings discovered the
/// usual way.
pub fn update(repo: &Path) -> Result<UpdateOutcome> {
    let settings = Settings::discover(None)?;
    Updater::new(settings, repo).update()
}
