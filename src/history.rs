//! # History Sources
//!
//! The update pipeline never shells out to `git` directly. It talks to a
//! [`HistorySource`], which exposes exactly three operations:
//!
//! - **`pull`**: bring the local mirror up to date (side effect only).
//! - **`log`**: a page of commits, newest first, `offset` commits below the tip.
//! - **`detail`**: raw `git show` text for one commit.
//!
//! [`GitHistory`] is the production implementation and wraps the functions
//! in [`crate::git`]. [`MemoryHistory`] serves a fixed list of commits from
//! memory, which makes the whole pipeline testable without a repository on
//! disk.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};

/// One commit as read from the history log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub sha1: String,
    pub author_name: String,
    pub author_email: String,
    pub author_timestamp: DateTime<Utc>,
    pub committer_name: String,
    pub committer_email: String,
    pub committer_timestamp: DateTime<Utc>,
    /// Full commit message, trailers included.
    pub message: String,
    /// True when the commit has more than one parent.
    pub merge: bool,
}

/// Trait for history operations - allows swapping git for an in-memory log
pub trait HistorySource: Send + Sync {
    /// Fetch new upstream history into the local mirror.
    fn pull(&self) -> Result<()>;

    /// Up to `limit` commits reachable from `branch`, newest first, skipping
    /// the `offset` newest ones. An empty page means the root was reached.
    fn log(&self, branch: &str, limit: usize, offset: usize) -> Result<Vec<LogEntry>>;

    /// Raw patch and message text for the commit `sha1`.
    fn detail(&self, sha1: &str) -> Result<String>;
}

/// The default implementation of `HistorySource`, backed by a local git
/// mirror and the system `git` command.
pub struct GitHistory {
    repo: PathBuf,
}

impl GitHistory {
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self { repo: repo.into() }
    }

    pub fn path(&self) -> &Path {
        &self.repo
    }
}

impl HistorySource for GitHistory {
    fn pull(&self) -> Result<()> {
        crate::git::pull(&self.repo)
    }

    fn log(&self, branch: &str, limit: usize, offset: usize) -> Result<Vec<LogEntry>> {
        crate::git::log(&self.repo, branch, limit, offset)
    }

    fn detail(&self, sha1: &str) -> Result<String> {
        crate::git::show(&self.repo, sha1)
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    /// Newest first.
    commits: Vec<LogEntry>,
    pulls: usize,
    log_calls: Vec<(usize, usize)>,
    fail_pull: Option<String>,
    fail_log_from: Option<usize>,
}

/// An in-memory `HistorySource`.
///
/// Commits are held newest first. Clones share state, so a test can keep a
/// handle, hand a clone to the updater, and later push new commits or
/// inspect how the log was paged.
#[derive(Debug, Clone, Default)]
pub struct MemoryHistory {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryHistory {
    /// Create a history from commits ordered newest first.
    pub fn new(commits: Vec<LogEntry>) -> Self {
        let history = Self::default();
        history.lock().commits = commits;
        history
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        // A panic while holding the lock cannot leave the plain-data state
        // half-written, so recover the guard.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Add a commit on top of the tip, as a pull would.
    pub fn push(&self, entry: LogEntry) {
        self.lock().commits.insert(0, entry);
    }

    /// Replace one commit in place, matched by sha1.
    pub fn replace(&self, entry: LogEntry) {
        let mut state = self.lock();
        if let Some(slot) = state.commits.iter_mut().find(|c| c.sha1 == entry.sha1) {
            *slot = entry;
        }
    }

    /// Make every following `pull` fail with `message`.
    pub fn fail_pulls(&self, message: &str) {
        self.lock().fail_pull = Some(message.to_string());
    }

    /// Make every following `log` call at or past `offset` fail.
    pub fn fail_logs_from(&self, offset: usize) {
        self.lock().fail_log_from = Some(offset);
    }

    /// Number of successful `pull` calls so far.
    pub fn pulls(&self) -> usize {
        self.lock().pulls
    }

    /// `(limit, offset)` of every `log` call so far.
    pub fn log_calls(&self) -> Vec<(usize, usize)> {
        self.lock().log_calls.clone()
    }
}

impl HistorySource for MemoryHistory {
    fn pull(&self) -> Result<()> {
        let mut state = self.lock();
        if let Some(message) = &state.fail_pull {
            return Err(Error::GitCommand {
                command: "pull".to_string(),
                repo: PathBuf::from("<memory>"),
                stderr: message.clone(),
            });
        }
        state.pulls += 1;
        Ok(())
    }

    fn log(&self, _branch: &str, limit: usize, offset: usize) -> Result<Vec<LogEntry>> {
        let mut state = self.lock();
        state.log_calls.push((limit, offset));
        if state.fail_log_from.is_some_and(|from| offset >= from) {
            return Err(Error::GitCommand {
                command: format!("log --skip={} --max-count={}", offset, limit),
                repo: PathBuf::from("<memory>"),
                stderr: "fatal: unable to read tree".to_string(),
            });
        }
        Ok(state
            .commits
            .iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    fn detail(&self, sha1: &str) -> Result<String> {
        self.lock()
            .commits
            .iter()
            .find(|c| c.sha1 == sha1)
            .map(|c| {
                format!(
                    "commit {}\nAuthor: {} <{}>\n\n{}\n",
                    c.sha1, c.author_name, c.author_email, c.message
                )
            })
            .ok_or_else(|| Error::GitCommand {
                command: format!("show {}", sha1),
                repo: PathBuf::from("<memory>"),
                stderr: format!("fatal: bad object {}", sha1),
            })
    }
}
