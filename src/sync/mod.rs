//! # Synchronization Pipeline
//!
//! Brings the relational store in line with the repository history and the
//! current naming ruleset. The stages run in this order inside one
//! transaction:
//!
//! - [`importer`]: new commits from the tip down to the first known one.
//! - [`reconciler`]: re-resolve names over all commits, drop contributors
//!   that no longer appear, and unlink the commits they touched.
//! - [`assigner`]: link unlinked commits to (possibly new) contributors.
//! - [`ranking`]: dense ranks by contribution count.
//!
//! [`cache_policy`] decides whether derived data and cached views are stale,
//! and [`orchestrator`] runs everything under the update lock.

pub mod assigner;
pub mod cache_policy;
pub mod importer;
pub mod orchestrator;
pub mod ranking;
pub mod reconciler;

pub use orchestrator::{update, UpdateOutcome, Updater};
