//! # Settings
//!
//! Where the updater keeps its state and how it walks history. Settings are
//! read from a small YAML file; every key is optional:
//!
//! ```yaml
//! database: /var/lib/contrib-rank/contributors.sqlite3
//! cache_dir: /var/cache/contrib-rank
//! lock_dir: /run/contrib-rank
//! branch: main
//! page_size: 100
//! names: /etc/contrib-rank/names.yaml
//! ```
//!
//! ## Lookup
//!
//! 1. An explicit path (`--config` or `CONTRIB_RANK_CONFIG`).
//! 2. `.contrib-rank.yaml` in the working directory, if present.
//! 3. Built-in defaults under the platform data and cache directories.
//!
//! Relative paths inside a settings file are resolved against the directory
//! containing that file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::names::NameRules;

/// Environment variable naming the settings file.
pub const CONFIG_ENV: &str = "CONTRIB_RANK_CONFIG";

/// Settings file picked up from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".contrib-rank.yaml";

pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Scope of the lock held for the duration of an update.
pub const UPDATE_LOCK_SCOPE: &str = "updating";

fn default_database() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from(".contrib-rank"))
        .join("contrib-rank")
        .join("contributors.sqlite3")
}

fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".contrib-rank-cache"))
        .join("contrib-rank")
}

fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// SQLite database file.
    #[serde(default = "default_database")]
    pub database: PathBuf,
    /// Directory holding the rendered-view cache.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
    /// Directory for the update lock file. Defaults to the database's directory.
    #[serde(default)]
    pub lock_dir: Option<PathBuf>,
    /// Branch whose history is imported.
    #[serde(default = "default_branch")]
    pub branch: String,
    /// Commits requested per `log` page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Naming ruleset file. Absent means no denylist and no equivalences.
    #[serde(default)]
    pub names: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: default_database(),
            cache_dir: default_cache_dir(),
            lock_dir: None,
            branch: default_branch(),
            page_size: default_page_size(),
            names: None,
        }
    }
}

impl Settings {
    /// Parse settings from YAML. Relative paths stay relative.
    pub fn parse(yaml: &str) -> Result<Self> {
        let settings: Settings = if yaml.trim().is_empty() {
            Settings::default()
        } else {
            serde_yaml::from_str(yaml).map_err(|e| Error::ConfigParse {
                message: e.to_string(),
                hint: Some(
                    "Known keys: database, cache_dir, lock_dir, branch, page_size, names"
                        .to_string(),
                ),
            })?
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from `path`, resolving relative paths against its directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::ConfigParse {
            message: format!("cannot read {}: {}", path.display(), e),
            hint: Some(format!(
                "Create the file or unset {} to use the defaults",
                CONFIG_ENV
            )),
        })?;
        let mut settings = Self::parse(&content)?;
        if let Some(base) = path.parent() {
            settings.resolve_relative_to(base);
        }
        Ok(settings)
    }

    /// Find and load settings following the lookup order in the module docs.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
            return Self::from_file(Path::new(&path));
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            return Self::from_file(local);
        }
        Ok(Self::default())
    }

    fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::ConfigParse {
                message: "page_size must be at least 1".to_string(),
                hint: Some(format!(
                    "Remove page_size to use the default of {}",
                    DEFAULT_PAGE_SIZE
                )),
            });
        }
        if self.branch.trim().is_empty() {
            return Err(Error::ConfigParse {
                message: "branch must not be empty".to_string(),
                hint: None,
            });
        }
        Ok(())
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.database);
        resolve(&mut self.cache_dir);
        if let Some(dir) = self.lock_dir.as_mut() {
            resolve(dir);
        }
        if let Some(names) = self.names.as_mut() {
            resolve(names);
        }
    }

    /// Directory where the update lock file lives.
    pub fn lock_dir(&self) -> PathBuf {
        match &self.lock_dir {
            Some(dir) => dir.clone(),
            None => self
                .database
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }

    /// Load the naming ruleset. Read fresh on every call so edits made
    /// between runs take effect.
    pub fn name_rules(&self) -> Result<NameRules> {
        match &self.names {
            Some(path) => NameRules::from_file(path),
            None => Ok(NameRules::default()),
        }
    }
}
