//! Rendered-view cache
//!
//! Pages derived from the contributor tables (rankings, per-contributor
//! commit lists) are cached by whatever serves them. The updater can only
//! invalidate that cache wholesale: [`ViewCache::purge`] drops everything.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::{Error, Result};

/// A cache of rendered views that can only be purged as a whole.
pub trait ViewCache: Send + Sync {
    /// Remove every cached entry. Synchronous and destructive.
    fn purge(&self) -> Result<()>;
}

/// Cache stored as files under one directory.
#[derive(Debug, Clone)]
pub struct DirectoryCache {
    root: PathBuf,
}

impl DirectoryCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ViewCache for DirectoryCache {
    fn purge(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root)?;
            return Ok(());
        }

        let cache_error = |path: &Path, e: std::io::Error| Error::Cache {
            message: format!("failed to remove {}: {}", path.display(), e),
        };

        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.is_dir() {
                fs::remove_dir_all(&path).map_err(|e| cache_error(&path, e))?;
            } else {
                fs::remove_file(&path).map_err(|e| cache_error(&path, e))?;
            }
        }
        log::debug!("purged view cache at {}", self.root.display());
        Ok(())
    }
}

/// In-process cache that only counts purges.
///
/// Clones share the counter.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    purges: Arc<AtomicUsize>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of purges so far.
    pub fn purges(&self) -> usize {
        self.purges.load(Ordering::SeqCst)
    }
}

impl ViewCache for MemoryCache {
    fn purge(&self) -> Result<()> {
        self.purges.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
