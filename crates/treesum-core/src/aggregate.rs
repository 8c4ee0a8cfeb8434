//! Bottom-up directory rollup
//!
//! Every directory that collected file summaries, and every ancestor of
//! one up to the repository root, is an aggregation point. Points are
//! processed deepest first so a directory's child rollups are on disk
//! before the directory itself is rolled up.
//!
//! A point folds in its own file summaries and the rollups of its immediate
//! child points only. Deeper descendants are already represented inside
//! those child rollups, so each one reaches the repository summary exactly
//! once.

use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::summarize::Summarizer;
use crate::trace_time;
use crate::walk::DirectorySummaries;

/// Number of path components below the repository root
pub fn depth(relative: &Path) -> usize {
    relative.components().count()
}

/// Aggregation points in processing order: descending depth, lexical
/// within a depth.
pub fn aggregation_order(summaries: &DirectorySummaries) -> Vec<PathBuf> {
    let mut points: BTreeSet<PathBuf> = BTreeSet::new();
    for directory in summaries.directories() {
        let mut current = Some(directory);
        while let Some(dir) = current {
            if !points.insert(dir.to_path_buf()) {
                break;
            }
            current = dir.parent();
        }
    }

    let mut ordered: Vec<PathBuf> = points.into_iter().collect();
    ordered.sort_by_key(|dir| Reverse(depth(dir)));
    ordered
}

/// Roll up every aggregation point, writing directory and repository
/// records through the summarizer.
#[tracing::instrument(skip_all, fields(directories = summaries.len()))]
pub fn aggregate(mut summaries: DirectorySummaries, summarizer: &Summarizer<'_>) {
    let start = Instant::now();
    let order = aggregation_order(&summaries);

    for directory in &order {
        let mut parts = summaries.take(directory);

        let children = order
            .iter()
            .filter(|candidate| candidate.parent() == Some(directory.as_path()));
        for child in children {
            if let Some(rollup) = summarizer.existing_rollup(child) {
                parts.push(rollup);
            }
        }

        summarizer.summarize_directory(directory, &parts);
    }

    trace_time!(start, "aggregate", points = order.len());
}
