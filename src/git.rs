//! Thin wrappers over the system `git` binary.
//!
//! Authentication (SSH keys, credential helpers) is whatever the account
//! running the update has configured.

use std::path::Path;
use std::process::Command;

use chrono::{DateTime, TimeZone, Utc};

use crate::error::{Error, Result};
use crate::history::LogEntry;

const FIELD_SEP: char = '\u{1f}';
const RECORD_SEP: char = '\u{1e}';

/// `git log` format: one record per commit, fields separated by US, records
/// terminated by RS. The body goes last because it may contain newlines.
const LOG_FORMAT: &str = "%H%x1f%P%x1f%an%x1f%ae%x1f%at%x1f%cn%x1f%ce%x1f%ct%x1f%B%x1e";

fn run_git(repo: &Path, args: &[&str]) -> Result<String> {
    let command = args.join(" ");
    let output = Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(args)
        .output()
        .map_err(|e| Error::GitCommand {
            command: command.clone(),
            repo: repo.to_path_buf(),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(Error::GitCommand {
            command,
            repo: repo.to_path_buf(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Fetch and fast-forward the mirror at `repo`.
pub fn pull(repo: &Path) -> Result<()> {
    run_git(repo, &["pull", "--quiet", "--ff-only"]).map(|_| ())
}

/// Read up to `limit` commits reachable from `branch`, newest first, after
/// skipping the first `offset`.
pub fn log(repo: &Path, branch: &str, limit: usize, offset: usize) -> Result<Vec<LogEntry>> {
    let max_count = format!("--max-count={}", limit);
    let skip = format!("--skip={}", offset);
    let format = format!("--format={}", LOG_FORMAT);
    let stdout = run_git(repo, &["log", &max_count, &skip, &format, branch, "--"])?;
    parse_log(&stdout)
}

/// Raw `git show` text for one commit: headers, full message and patch.
pub fn show(repo: &Path, sha1: &str) -> Result<String> {
    run_git(repo, &["show", "--format=fuller", "--stat", "--patch", sha1])
}

/// Parse the output of `git log --format=LOG_FORMAT`.
pub fn parse_log(stdout: &str) -> Result<Vec<LogEntry>> {
    stdout
        .split(RECORD_SEP)
        .map(|record| record.trim_start_matches('\n'))
        .filter(|record| !record.trim().is_empty())
        .map(parse_record)
        .collect()
}

fn parse_record(record: &str) -> Result<LogEntry> {
    let fields: Vec<&str> = record.splitn(9, FIELD_SEP).collect();
    if fields.len() != 9 {
        return Err(Error::HistoryParse {
            message: format!("expected 9 fields per commit, got {}", fields.len()),
        });
    }

    Ok(LogEntry {
        sha1: fields[0].to_string(),
        merge: fields[1].split_whitespace().count() > 1,
        author_name: fields[2].to_string(),
        author_email: fields[3].to_string(),
        author_timestamp: parse_timestamp(fields[4])?,
        committer_name: fields[5].to_string(),
        committer_email: fields[6].to_string(),
        committer_timestamp: parse_timestamp(fields[7])?,
        message: fields[8].trim_end().to_string(),
    })
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
        .ok_or_else(|| Error::HistoryParse {
            message: format!("invalid unix timestamp '{}'", raw),
        })
}
