//! Shared test utilities for integration and E2E tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! let fixture = TestFixture::new();
//! let updater = fixture.updater(&history, &cache);
//! ```

use assert_fs::prelude::*;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::path::{Path, PathBuf};
use std::process::Command;

use contrib_rank::cache::MemoryCache;
use contrib_rank::config::Settings;
use contrib_rank::history::{LogEntry, MemoryHistory};
use contrib_rank::sync::Updater;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::{at, entry, sha, GitRepo, TestFixture};
}

/// Deterministic 40-character sha1 for commit number `n`.
pub fn sha(n: u32) -> String {
    format!("{:040x}", n)
}

/// A fixed instant, for clocks and timestamps.
pub fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

/// Commit number `n` by `author`, `n` minutes after 2020-01-01.
pub fn entry(n: u32, author: &str) -> LogEntry {
    let when = at(2020, 1, 1) + Duration::minutes(i64::from(n));
    LogEntry {
        sha1: sha(n),
        author_name: author.to_string(),
        author_email: format!("{}@example.com", author.to_lowercase().replace(' ', ".")),
        author_timestamp: when,
        committer_name: author.to_string(),
        committer_email: format!("{}@example.com", author.to_lowercase().replace(' ', ".")),
        committer_timestamp: when,
        message: format!("Commit {}", n),
        merge: false,
    }
}

/// A temporary directory holding a settings file, database, cache and
/// naming rules.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        let fixture = Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        };
        fixture
            .temp_dir
            .child("settings.yaml")
            .write_str(
                "database: db/contributors.sqlite3\n\
                 cache_dir: cache\n\
                 lock_dir: locks\n\
                 page_size: 4\n\
                 names: names.yaml\n",
            )
            .expect("Failed to write settings");
        fixture.with_names("")
    }

    /// Replace the naming rules file.
    pub fn with_names(self, yaml: &str) -> Self {
        self.write_names(yaml);
        self
    }

    pub fn write_names(&self, yaml: &str) {
        self.temp_dir
            .child("names.yaml")
            .write_str(yaml)
            .expect("Failed to write names");
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// A path inside the fixture directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    pub fn settings_path(&self) -> PathBuf {
        self.path().join("settings.yaml")
    }

    pub fn settings(&self) -> Settings {
        Settings::from_file(&self.settings_path()).expect("Failed to load settings")
    }

    /// Updater over in-memory history and cache, with the clock fixed at `now`.
    #[allow(dead_code)]
    pub fn updater_at(
        &self,
        history: &MemoryHistory,
        cache: &MemoryCache,
        now: DateTime<Utc>,
    ) -> Updater {
        Updater::with_sources(
            self.settings(),
            Box::new(history.clone()),
            Box::new(cache.clone()),
        )
        .with_clock(move || now)
    }

    #[allow(dead_code)]
    pub fn updater(&self, history: &MemoryHistory, cache: &MemoryCache) -> Updater {
        self.updater_at(history, cache, at(2024, 5, 16))
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// An upstream repository and a clone of it, driven with the `git` binary.
#[allow(dead_code)]
pub struct GitRepo {
    pub upstream: PathBuf,
    pub mirror: PathBuf,
}

#[allow(dead_code)]
impl GitRepo {
    /// Create `upstream` with one commit per author and clone it as `mirror`.
    pub fn new(root: &Path, authors: &[&str]) -> Self {
        let repo = Self {
            upstream: root.join("upstream"),
            mirror: root.join("mirror"),
        };
        std::fs::create_dir_all(&repo.upstream).unwrap();
        git(&repo.upstream, &["init", "--quiet", "--initial-branch=main"], "Setup");
        for author in authors {
            repo.commit(author, &format!("Work by {}", author));
        }
        git(
            root,
            &[
                "clone",
                "--quiet",
                repo.upstream.to_str().unwrap(),
                repo.mirror.to_str().unwrap(),
            ],
            "Setup",
        );
        repo
    }

    /// Commit on the upstream as `author`.
    pub fn commit(&self, author: &str, message: &str) {
        git(
            &self.upstream,
            &["commit", "--quiet", "--allow-empty", "-m", message],
            author,
        );
    }

    /// Full sha1 of the mirror's HEAD.
    pub fn mirror_head(&self) -> String {
        let out = git(&self.mirror, &["rev-parse", "HEAD"], "Setup");
        out.trim().to_string()
    }
}

fn git(dir: &Path, args: &[&str], author: &str) -> String {
    let email = format!("{}@example.com", author.to_lowercase().replace(' ', "."));
    let output = Command::new("git")
        .current_dir(dir)
        .args(args)
        .env("GIT_AUTHOR_NAME", author)
        .env("GIT_AUTHOR_EMAIL", &email)
        .env("GIT_COMMITTER_NAME", author)
        .env("GIT_COMMITTER_EMAIL", &email)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .env("HOME", dir)
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}
