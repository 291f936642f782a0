//! # Contributor Ranking Library
//!
//! This library keeps a relational store of a repository's commits and the
//! people credited for them in step with its git history. It is designed to
//! be driven by the `contrib-rank` command-line tool, typically from a cron
//! job, but every stage can be used on its own.
//!
//! ## Quick Example
//!
//! ```
//! use contrib_rank::store::{contributors, Database};
//! use contrib_rank::sync::ranking::dense_ranks;
//!
//! // Contributor names become URL slugs
//! assert_eq!(contributors::slug("José Valim"), "josé-valim");
//!
//! // Equal counts share a rank and no rank is skipped
//! assert_eq!(dense_ranks([10, 10, 7, 3]), vec![1, 1, 2, 3]);
//!
//! // The store runs happily in memory
//! let db = Database::open_in_memory().unwrap();
//! assert_eq!(contributors::count(db.connection()).unwrap(), 0);
//! ```
//!
//! ## Core Concepts
//!
//! - **History (`history`, `git`)**: The source of commits. `GitHistory`
//!   shells out to `git`; `MemoryHistory` serves a fixed list.
//! - **Names (`names`)**: Derives the set of credited people from a commit,
//!   applying a denylist and name equivalences read from YAML.
//! - **Store (`store`)**: SQLite tables for commits, contributors, the
//!   contributions joining them and an audit trail of updates.
//! - **Synchronization (`sync`)**: Import, reconciliation, assignment and
//!   ranking, plus the policy deciding when views go stale.
//! - **Coordination (`lock`, `cache`, `config`)**: The single-updater lock,
//!   the purgeable view cache and the settings tying paths together.
//! - **Output (`output`)**: Color decisions for the command-line tool.
//!
//! ## Execution Flow
//!
//! `sync::update` (or `sync::Updater::update`) runs one update:
//!
//! 1.  **Lock**: Take the `updating` lock or fail immediately.
//! 2.  **Pull**: Fast-forward the local checkout.
//! 3.  **Import**: Store commits newer than the newest known one.
//! 4.  **Reconcile**: Drop contributors the current rules no longer produce.
//! 5.  **Assign and Rank**: Link unlinked commits and recompute dense ranks.
//! 6.  **Expire**: Purge cached views when data changed or a week or month
//!     began since the last update.
//! 7.  **Record**: Store an audit record with the run's timings.
//!
//! Steps 3 to 5 share one transaction, so a failed run leaves the store as
//! it found it.

pub mod cache;
pub mod config;
pub mod error;
pub mod git;
pub mod history;
pub mod lock;
pub mod names;
pub mod output;
pub mod store;
pub mod sync;

#[cfg(test)]
mod ranking_proptest;
