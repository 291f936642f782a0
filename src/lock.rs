//! Process-wide exclusive lock
//!
//! A scope is locked by taking an exclusive advisory lock on
//! `<dir>/<scope>.lock`. The returned [`LockGuard`] owns the open file and
//! unlocks it when dropped, which covers early returns, `?` propagation and
//! unwinding panics alike. If the process dies the kernel closes the file
//! and the lock goes with it. Acquisition never waits: if another process
//! holds the lock the caller gets [`Error::LockContention`].
//!
//! The file itself stays on disk between runs and holds the pid of the
//! last owner.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::{Error, Result};

/// Held lock on a scope; released on drop.
#[derive(Debug)]
pub struct LockGuard {
    scope: String,
    path: PathBuf,
    file: File,
}

impl LockGuard {
    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            log::warn!("failed to release lock {}: {}", self.path.display(), e);
        } else {
            log::debug!("released lock '{}'", self.scope);
        }
    }
}

/// Path of the lock file for `scope` under `dir`.
pub fn lock_path(dir: &Path, scope: &str) -> PathBuf {
    dir.join(format!("{}.lock", scope))
}

fn is_contended(e: &io::Error) -> bool {
    e.kind() == io::ErrorKind::WouldBlock
        || e.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

fn open(dir: &Path, scope: &str) -> Result<(File, PathBuf)> {
    fs::create_dir_all(dir)?;
    let path = lock_path(dir, scope);
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(&path)?;
    Ok((file, path))
}

/// Take the lock for `scope`, failing immediately if it is held.
pub fn acquire(dir: &Path, scope: &str) -> Result<LockGuard> {
    let (file, path) = open(dir, scope)?;

    match file.try_lock_exclusive() {
        Ok(()) => {}
        Err(e) if is_contended(&e) => {
            log::warn!("lock '{}' is already held ({})", scope, path.display());
            return Err(Error::LockContention {
                scope: scope.to_string(),
                path,
            });
        }
        Err(e) => return Err(e.into()),
    }

    let mut guard = LockGuard {
        scope: scope.to_string(),
        path,
        file,
    };
    guard.file.set_len(0)?;
    writeln!(guard.file, "{}", std::process::id())?;
    log::debug!("acquired lock '{}'", scope);
    Ok(guard)
}

/// Whether some process currently holds the lock for `scope`.
pub fn is_held(dir: &Path, scope: &str) -> Result<bool> {
    let path = lock_path(dir, scope);
    if !path.exists() {
        return Ok(false);
    }
    let (file, _) = open(dir, scope)?;
    match file.try_lock_exclusive() {
        Ok(()) => {
            FileExt::unlock(&file)?;
            Ok(false)
        }
        Err(e) if is_contended(&e) => Ok(true),
        Err(e) => Err(e.into()),
    }
}

/// Run `f` while holding the lock for `scope`.
pub fn with_lock<T>(dir: &Path, scope: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    let _guard = acquire(dir, scope)?;
    f()
}
