//! # Contributor Name Resolution
//!
//! Maps a commit to the set of canonical contributor names it credits.
//!
//! Candidates are collected from the author name, a bracketed credit at the
//! end of the message (`Fix the thing. [Jane Doe, John Roe]`) and any
//! `Co-authored-by:` trailers. Each candidate is split on `,`, `&` and
//! `and`, mapped through the equivalence table of the [`NameRules`], and
//! dropped if it is on the denylist.
//!
//! Bracketed text is not always a credit. CI directives such as
//! `[skip ci]` or `[wip]` and issue keys such as `[JIRA-123]` are skipped
//! before the rules apply. Anything else in brackets, like `[docs]`, is
//! taken as a name and has to be denylisted.
//!
//! The ruleset lives in a YAML file that operators edit between runs:
//!
//! ```yaml
//! denylist:
//!   - root
//!   - docs
//!   - typo
//! equivalences:
//!   Bob: Robert
//!   "jane": Jane Doe
//! ```
//!
//! Resolution is a pure function of the commit and the ruleset, so the same
//! commit always yields the same names until the file changes.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::store::Commit;

/// The externally configured naming ruleset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRules {
    /// Names that never become contributors. Compared case-insensitively.
    #[serde(default)]
    pub denylist: Vec<String>,
    /// Alias to canonical name.
    #[serde(default)]
    pub equivalences: HashMap<String, String>,
}

impl NameRules {
    /// Parse a ruleset from YAML. An empty document is an empty ruleset.
    pub fn parse(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let rules: NameRules = serde_yaml::from_str(yaml)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Load a ruleset from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::ConfigParse {
            message: format!("cannot read names file {}: {}", path.display(), e),
            hint: Some("Check the `names` entry of your settings".to_string()),
        })?;
        Self::parse(&content)
    }

    fn validate(&self) -> Result<()> {
        for (alias, canonical) in &self.equivalences {
            if canonical.trim().is_empty() {
                return Err(Error::ConfigParse {
                    message: format!("equivalence for '{}' maps to an empty name", alias),
                    hint: Some("Use the denylist to drop a name entirely".to_string()),
                });
            }
            if self.equivalences.contains_key(canonical.as_str()) && canonical != alias {
                return Err(Error::ConfigParse {
                    message: format!(
                        "equivalence chain: '{}' -> '{}' -> '{}'",
                        alias, canonical, self.equivalences[canonical.as_str()]
                    ),
                    hint: Some(format!("Map '{}' directly to the final name", alias)),
                });
            }
        }
        Ok(())
    }
}

/// Resolves commits to canonical contributor names.
#[derive(Debug, Clone)]
pub struct NameResolver {
    rules: NameRules,
    denied: HashSet<String>,
    bracket_credit: Regex,
    co_author: Regex,
    separator: Regex,
    tag: Regex,
}

impl NameResolver {
    pub fn new(rules: NameRules) -> Result<Self> {
        let denied = rules
            .denylist
            .iter()
            .map(|name| name.trim().to_lowercase())
            .collect();
        Ok(Self {
            rules,
            denied,
            bracket_credit: Regex::new(r"\[([^\[\]]+)\]\s*$")?,
            co_author: Regex::new(r"(?mi)^\s*co-authored-by:\s*([^<\n]*?)\s*(?:<[^>\n]*>)?\s*$")?,
            separator: Regex::new(r"\s*,\s*|\s+&\s+|\s+and\s+")?,
            tag: Regex::new(
                r"(?i)^(?:skip[ -]?ci|ci[ -]?skip|no[ -]?ci|skip[ -]checks?|wip|draft|[a-z][a-z0-9_]*-\d+)$",
            )?,
        })
    }

    pub fn rules(&self) -> &NameRules {
        &self.rules
    }

    /// Canonical names credited by `commit`.
    ///
    /// `detail` is the raw `git show` text of the commit; co-author trailers
    /// found there are credited as well.
    pub fn resolve(&self, commit: &Commit, detail: Option<&str>) -> BTreeSet<String> {
        let mut candidates = vec![commit.author_name.clone()];
        candidates.extend(self.message_credits(&commit.message));
        if let Some(detail) = detail {
            candidates.extend(self.co_authors(detail));
        }

        candidates
            .iter()
            .flat_map(|candidate| self.separator.split(candidate))
            .filter_map(|name| self.canonicalize(name))
            .collect()
    }

    fn message_credits(&self, message: &str) -> Vec<String> {
        let mut credits = Vec::new();
        let first_paragraph = message.split("\n\n").next().unwrap_or_default().trim();
        let whole = message.trim();

        for text in [first_paragraph, whole] {
            if let Some(captures) = self.bracket_credit.captures(text) {
                for part in self.separator.split(&captures[1]) {
                    let part = part.trim();
                    if self.tag.is_match(part) || credits.iter().any(|c| c == part) {
                        continue;
                    }
                    credits.push(part.to_string());
                }
            }
        }
        credits.extend(self.co_authors(message));
        credits
    }

    fn co_authors(&self, text: &str) -> Vec<String> {
        self.co_author
            .captures_iter(text)
            .map(|captures| captures[1].to_string())
            .collect()
    }

    fn canonicalize(&self, raw: &str) -> Option<String> {
        let name = raw.trim();
        if name.is_empty() || !name.chars().any(char::is_alphabetic) {
            return None;
        }
        if self.is_denied(name) {
            return None;
        }

        let canonical = self
            .rules
            .equivalences
            .get(name)
            .map(|c| c.trim())
            .unwrap_or(name);
        if self.is_denied(canonical) {
            return None;
        }
        Some(canonical.to_string())
    }

    fn is_denied(&self, name: &str) -> bool {
        self.denied.contains(&name.to_lowercase())
    }
}
