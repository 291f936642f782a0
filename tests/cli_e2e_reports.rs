//! End-to-end tests for the read-only commands: `contributors`, `history`,
//! `show`, plus `cache clear`.
//!
//! The database is populated through the library with in-memory history, so
//! none of these need git.

#[allow(dead_code)]
mod common;
use common::prelude::*;

use contrib_rank::cache::MemoryCache;
use contrib_rank::history::MemoryHistory;
use contrib_rank::store::Database;

/// A fixture with a schema but no data.
fn empty() -> TestFixture {
    let fixture = TestFixture::new();
    Database::open(&fixture.settings().database).unwrap();
    fixture
}

/// A fixture whose database already holds one completed update.
fn populated() -> TestFixture {
    let fixture = TestFixture::new();
    let mut credited = entry(4, "Jane Doe");
    credited.message = "Fix the parser [Ann Smith]".to_string();
    let history = MemoryHistory::new(vec![
        credited,
        entry(3, "Bob"),
        entry(2, "Jane Doe"),
        entry(1, "Jane Doe"),
    ]);
    fixture
        .updater(&history, &MemoryCache::new())
        .update()
        .unwrap();
    fixture
}

fn cmd(fixture: &TestFixture) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("contrib-rank");
    cmd.current_dir(fixture.path())
        .arg("--config")
        .arg(fixture.settings_path())
        .arg("--color")
        .arg("never");
    cmd
}

#[test]
fn test_contributors_table() {
    let fixture = populated();
    cmd(&fixture)
        .arg("contributors")
        .assert()
        .success()
        .stdout(predicate::str::contains("RANK"))
        .stdout(predicate::str::contains("    1        3  Jane Doe (jane-doe)"))
        .stdout(predicate::str::contains("    2        1  Bob (bob)"))
        .stdout(predicate::str::contains("    2        1  Ann Smith (ann-smith)"));
}

#[test]
fn test_contributors_limit_and_json() {
    let fixture = populated();
    let output = cmd(&fixture)
        .arg("contributors")
        .arg("--json")
        .arg("--limit")
        .arg("2")
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let list = json.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["name"], "Jane Doe");
    assert_eq!(list[0]["rank"], 1);
    assert_eq!(list[0]["ncontributions"], 3);
    assert_eq!(list[0]["url_id"], "jane-doe");
}

#[test]
fn test_contributors_on_empty_database() {
    let fixture = empty();
    cmd(&fixture)
        .arg("contributors")
        .assert()
        .success()
        .stdout(predicate::str::contains("No contributors yet"));
}

#[test]
fn test_reports_do_not_create_a_missing_database() {
    let fixture = TestFixture::new();
    let database = fixture.settings().database;

    for report in [vec!["contributors"], vec!["history"], vec!["show", "0123"]] {
        cmd(&fixture)
            .args(&report)
            .assert()
            .failure()
            .stderr(predicate::str::contains("Database not found"))
            .stderr(predicate::str::contains("contrib-rank update"));
    }
    assert!(!database.exists());
    assert!(!fixture.path().join("db").exists());
}

#[test]
fn test_history_lists_updates() {
    let fixture = populated();
    cmd(&fixture)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("FINISHED"))
        .stdout(predicate::str::contains("2024-05-16T12:00:00+00:00"));

    let output = cmd(&fixture).arg("history").arg("--json").output().unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[0]["ncommits"], 4);
}

#[test]
fn test_history_empty() {
    let fixture = empty();
    cmd(&fixture)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No updates recorded yet."));
}

#[test]
fn test_show_stored_commit() {
    let fixture = populated();
    // No checkout at --repo: the command falls back to the stored message.
    cmd(&fixture)
        .arg("show")
        .arg(sha(4))
        .arg("--repo")
        .arg(fixture.path().join("missing"))
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("commit {}", sha(4))))
        .stdout(predicate::str::contains("Author:    Jane Doe <jane.doe@example.com>"))
        .stdout(predicate::str::contains("Fix the parser [Ann Smith]"))
        .stdout(predicate::str::contains("Ann Smith (rank 2)"))
        .stdout(predicate::str::contains("Jane Doe (rank 1)"));
}

#[test]
fn test_show_unknown_commit() {
    let fixture = populated();
    cmd(&fixture)
        .arg("show")
        .arg(sha(99))
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not in the database"))
        .stderr(predicate::str::contains("contrib-rank update"));
}

#[test]
fn test_cache_clear() {
    let fixture = TestFixture::new();
    fixture.child("cache/contributors/bob.html").write_str("<p>Bob</p>").unwrap();

    cmd(&fixture)
        .arg("cache")
        .arg("clear")
        .assert()
        .success()
        .stdout(predicate::str::contains("[OK] Cleared"));

    fixture.child("cache").assert(predicate::path::is_dir());
    fixture
        .child("cache/contributors")
        .assert(predicate::path::missing());
}

#[test]
fn test_bad_settings_are_reported() {
    let fixture = TestFixture::new();
    fixture.child("settings.yaml").write_str("page_size: 0\n").unwrap();
    cmd(&fixture)
        .arg("contributors")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load settings"))
        .stderr(predicate::str::contains("page_size must be at least 1"));
}
