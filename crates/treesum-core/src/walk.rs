//! Top-down repository walk
//!
//! Walks the tree in pre-order, pruning ignored directories before they are
//! entered, and summarizes every eligible file along the way. The result is
//! the per-directory list of file summaries the rollup starts from.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use walkdir::WalkDir;

use crate::classify;
use crate::ignore::IgnoreRuleSet;
use crate::summarize::Summarizer;
use crate::trace_time;

/// Directory (relative to the repository root, root = empty path) to the
/// summaries collected for it, in discovery order.
///
/// Only directories with at least one summary have an entry. The value is
/// owned by a single run and handed from the walk to the rollup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectorySummaries {
    entries: BTreeMap<PathBuf, Vec<String>>,
}

impl DirectorySummaries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a summary to a directory's list
    pub fn push(&mut self, directory: impl Into<PathBuf>, summary: String) {
        self.entries
            .entry(directory.into())
            .or_default()
            .push(summary);
    }

    /// Summaries collected for a directory
    pub fn get(&self, directory: &Path) -> Option<&[String]> {
        self.entries.get(directory).map(Vec::as_slice)
    }

    /// Remove and return a directory's list (empty if absent)
    pub fn take(&mut self, directory: &Path) -> Vec<String> {
        self.entries.remove(directory).unwrap_or_default()
    }

    /// Directories with an entry, in lexical order
    pub fn directories(&self) -> impl Iterator<Item = &Path> {
        self.entries.keys().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Walk `root`, summarizing every eligible file.
///
/// Ignored directories are never entered. Entries are visited in file-name
/// order and symbolic links are not followed.
#[tracing::instrument(skip_all, fields(root = %root.display()))]
pub fn walk(root: &Path, rules: &IgnoreRuleSet, summarizer: &Summarizer<'_>) -> DirectorySummaries {
    let start = Instant::now();
    let mut summaries = DirectorySummaries::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !rules.should_ignore(entry.path(), root)
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if rules.should_ignore(path, root) || !classify::is_text_eligible(path) {
            tracing::trace!(path = %path.display(), "excluded");
            summarizer.metrics().record_file_excluded();
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        if let Some(summary) = summarizer.summarize_file(path, relative) {
            let directory = relative.parent().map(Path::to_path_buf).unwrap_or_default();
            summaries.push(directory, summary);
        }
    }

    trace_time!(start, "walk", directories = summaries.len());
    summaries
}
