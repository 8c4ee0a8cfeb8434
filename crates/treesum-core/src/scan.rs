//! Run driver: walk, then roll up
//!
//! A scan is strictly sequential. The walk phase summarizes files and
//! finishes before the rollup phase starts. Per-item failures never fail
//! the run; whatever subset of records was produced is kept, and the next
//! run picks up where this one stopped.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;

use serde::Serialize;

use crate::aggregate;
use crate::error::{Result, TreesumError};
use crate::ignore::IgnoreRuleSet;
use crate::log_scan_metrics;
use crate::logging::ScanMetrics;
use crate::oracle::SummarizationOracle;
use crate::store::SummaryStore;
use crate::summarize::Summarizer;
use crate::trace_time;
use crate::walk;

/// What a scan did, by item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub files_summarized: u64,
    pub files_cached: u64,
    pub files_skipped: u64,
    pub files_excluded: u64,
    pub files_failed: u64,
    pub directories_summarized: u64,
    pub directories_cached: u64,
    pub directories_failed: u64,
    pub oracle_calls: u64,
}

impl ScanReport {
    /// True if some item could not be summarized this run
    pub fn has_failures(&self) -> bool {
        self.files_failed > 0 || self.directories_failed > 0
    }
}

/// Extend `rules` so a metadata root inside `root` is never walked.
///
/// Both paths are resolved before they are compared, so `..` hops and
/// symbolic links in either spelling do not hide the containment. The whole
/// relative path is matched literally, so siblings sharing its first
/// segment are unaffected.
pub fn exclude_metadata_root(rules: IgnoreRuleSet, root: &Path, metadata_root: &Path) -> IgnoreRuleSet {
    let root = resolve_lenient(root);
    let metadata_root = resolve_lenient(metadata_root);
    match metadata_root.strip_prefix(&root) {
        Ok(inside) if !inside.as_os_str().is_empty() => {
            let pattern = crate::store::paths::relative_label(inside);
            rules.with_pattern(globset::escape(&pattern))
        }
        _ => rules,
    }
}

/// Canonical form of `path`, which need not exist.
///
/// The longest existing prefix is canonicalized and the remaining
/// components are appended lexically.
fn resolve_lenient(path: &Path) -> PathBuf {
    let components: Vec<Component<'_>> = path.components().collect();

    for split in (0..=components.len()).rev() {
        let head: PathBuf = components[..split].iter().collect();
        let head = if head.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            head
        };

        if let Ok(mut resolved) = fs::canonicalize(&head) {
            for component in &components[split..] {
                match component {
                    Component::ParentDir => {
                        resolved.pop();
                    }
                    Component::CurDir => {}
                    other => resolved.push(other),
                }
            }
            return resolved;
        }
    }

    path.to_path_buf()
}

/// One configured scan of a repository
pub struct Scanner<'a> {
    root: PathBuf,
    store: SummaryStore,
    rules: IgnoreRuleSet,
    oracle: &'a dyn SummarizationOracle,
}

impl<'a> Scanner<'a> {
    /// Prepare a scan of `root`, writing records under `metadata_root`.
    ///
    /// When the metadata root lies inside the repository it is kept out of
    /// the walk.
    pub fn new(
        root: &Path,
        metadata_root: &Path,
        rules: IgnoreRuleSet,
        oracle: &'a dyn SummarizationOracle,
    ) -> Result<Self> {
        if !root.is_dir() {
            return Err(TreesumError::RepositoryNotFound {
                path: root.to_path_buf(),
            });
        }

        Ok(Self {
            root: root.to_path_buf(),
            store: SummaryStore::new(metadata_root),
            rules: exclude_metadata_root(rules, root, metadata_root),
            oracle,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn store(&self) -> &SummaryStore {
        &self.store
    }

    pub fn rules(&self) -> &IgnoreRuleSet {
        &self.rules
    }

    /// Run both phases to completion
    #[tracing::instrument(skip_all, fields(root = %self.root.display()))]
    pub fn run(&self) -> ScanReport {
        let start = Instant::now();
        let metrics = ScanMetrics::new();
        let summarizer = Summarizer::new(&self.store, self.oracle, &metrics);

        tracing::info!(metadata = %self.store.root().display(), "scanning repository files");
        let summaries = walk::walk(&self.root, &self.rules, &summarizer);

        tracing::info!("generating directory summaries");
        aggregate::aggregate(summaries, &summarizer);

        log_scan_metrics!(&metrics, "scan");
        trace_time!(start, "scan");

        let report = metrics.snapshot();
        tracing::info!(
            files = report.files_summarized + report.files_cached,
            directories = report.directories_summarized + report.directories_cached,
            oracle_calls = report.oracle_calls,
            "scan complete"
        );
        report
    }
}
