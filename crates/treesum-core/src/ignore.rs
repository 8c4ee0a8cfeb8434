//! Ignore rules that prune the repository walk
//!
//! A rule set is a pair of exact path-segment names and glob patterns, read
//! from a JSON document:
//!
//! ```json
//! { "names": [".git", "node_modules"], "regexes": ["*.lock", "build/*"] }
//! ```
//!
//! Despite the field name, `regexes` holds shell-style globs (`patterns` is
//! accepted as well). A pattern matches either the whole relative path or
//! any single segment of it.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Component, Path};

use globset::{GlobBuilder, GlobMatcher};
use serde::Deserialize;

use crate::error::Result;

#[derive(Debug, Default, Deserialize)]
struct IgnoreDocument {
    #[serde(default)]
    names: Vec<String>,
    #[serde(default, alias = "patterns")]
    regexes: Vec<String>,
}

/// Immutable set of ignore rules, loaded once per run
#[derive(Debug, Clone, Default)]
pub struct IgnoreRuleSet {
    names: BTreeSet<String>,
    patterns: Vec<String>,
    matchers: Vec<GlobMatcher>,
}

impl IgnoreRuleSet {
    /// A rule set that ignores nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a rule set from names and glob patterns.
    ///
    /// Patterns that fail to compile are dropped with a warning.
    pub fn new<N, P>(names: N, patterns: P) -> Self
    where
        N: IntoIterator,
        N::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        let mut rules = Self {
            names: names.into_iter().map(Into::into).collect(),
            ..Self::default()
        };
        for pattern in patterns {
            rules.push_pattern(pattern.into());
        }
        rules
    }

    /// Parse a rule document
    pub fn from_json(content: &str) -> Result<Self> {
        let doc: IgnoreDocument = serde_json::from_str(content)?;
        Ok(Self::new(doc.names, doc.regexes))
    }

    /// Load rules from a file, degrading to the empty rule set if the file
    /// is unreadable or malformed.
    pub fn load(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignore rules unreadable, ignoring nothing");
                return Self::empty();
            }
        };

        match Self::from_json(&content) {
            Ok(rules) => {
                tracing::debug!(
                    path = %path.display(),
                    names = rules.names.len(),
                    patterns = rules.patterns.len(),
                    "loaded ignore rules"
                );
                rules
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignore rules malformed, ignoring nothing");
                Self::empty()
            }
        }
    }

    /// Copy of this rule set with one more exact name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.names.insert(name.into());
        self
    }

    /// Copy of this rule set with one more glob pattern
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.push_pattern(pattern.into());
        self
    }

    fn push_pattern(&mut self, pattern: String) {
        match GlobBuilder::new(&pattern).literal_separator(false).build() {
            Ok(glob) => {
                self.matchers.push(glob.compile_matcher());
                self.patterns.push(pattern);
            }
            Err(e) => {
                tracing::warn!(pattern = %pattern, error = %e, "dropping invalid ignore pattern");
            }
        }
    }

    /// Exact names in this rule set
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Glob patterns in this rule set, in load order
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// True if the set has no rules at all
    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.matchers.is_empty()
    }

    /// Decide whether `path` is excluded, judged relative to `base_path`.
    ///
    /// Pure: the target does not need to exist. The base itself is never
    /// ignored.
    pub fn should_ignore(&self, path: &Path, base_path: &Path) -> bool {
        let relative = path.strip_prefix(base_path).unwrap_or(path);
        let segments: Vec<Cow<'_, str>> = relative
            .components()
            .filter_map(|component| match component {
                Component::Normal(segment) => Some(segment.to_string_lossy()),
                _ => None,
            })
            .collect();

        if segments.is_empty() {
            return false;
        }

        if segments
            .iter()
            .any(|segment| self.names.contains(segment.as_ref()))
        {
            return true;
        }

        let joined = segments.join("/");
        self.matchers.iter().any(|matcher| {
            matcher.is_match(joined.as_str())
                || segments
                    .iter()
                    .any(|segment| matcher.is_match(segment.as_ref()))
        })
    }
}
