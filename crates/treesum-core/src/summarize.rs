//! Per-item summarization through the store and the oracle
//!
//! Each operation here returns `Option<String>`: `None` uniformly means
//! "this item contributes nothing to this run", whether the item was empty,
//! the oracle failed, or a record could not be read back.

use std::fs;
use std::path::Path;

use crate::logging::ScanMetrics;
use crate::oracle::{self, SummarizationOracle};
use crate::store::{SummaryKey, SummaryStore};

/// Store, oracle and counters shared by the walk and the rollup
pub struct Summarizer<'a> {
    store: &'a SummaryStore,
    oracle: &'a dyn SummarizationOracle,
    metrics: &'a ScanMetrics,
}

impl<'a> Summarizer<'a> {
    pub fn new(
        store: &'a SummaryStore,
        oracle: &'a dyn SummarizationOracle,
        metrics: &'a ScanMetrics,
    ) -> Self {
        Self {
            store,
            oracle,
            metrics,
        }
    }

    pub fn store(&self) -> &SummaryStore {
        self.store
    }

    pub fn metrics(&self) -> &ScanMetrics {
        self.metrics
    }

    /// Summary of one eligible file at `path` (relative path `relative`).
    ///
    /// An existing record is returned without calling the oracle.
    /// Whitespace-only files produce nothing and leave no record.
    pub fn summarize_file(&self, path: &Path, relative: &Path) -> Option<String> {
        let key = SummaryKey::file(relative);
        let label = key.label();

        if self.store.exists(&key) {
            tracing::debug!(path = %label, "summary already exists");
            self.metrics.record_file_cached();
            return self.store.read(&key);
        }

        let content = match fs::read(path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read file");
                self.metrics.record_file_failed();
                return None;
            }
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %label, "skipping empty file");
            self.metrics.record_file_skipped();
            return None;
        }

        tracing::info!(path = %label, "generating file summary");
        match self.ask(&content, &oracle::file_context(&label)) {
            Some(summary) => {
                self.store.write(&key, &summary, &label);
                self.metrics.record_file_summarized();
                Some(summary)
            }
            None => {
                self.metrics.record_file_failed();
                None
            }
        }
    }

    /// Rollup of a directory from its collected parts.
    ///
    /// No record is produced for an empty part list, and an existing record
    /// is never regenerated.
    pub fn summarize_directory(&self, relative: &Path, parts: &[String]) -> Option<String> {
        let key = SummaryKey::directory(relative);
        let label = key.label();

        if parts.is_empty() {
            tracing::debug!(path = %label, "no summaries to aggregate");
            return None;
        }

        if self.store.exists(&key) {
            tracing::debug!(path = %label, "directory summary already exists");
            self.metrics.record_directory_cached();
            return self.store.read(&key);
        }

        tracing::info!(path = %label, parts = parts.len(), "generating directory summary");
        match self.ask(&parts.join("\n\n"), &oracle::directory_context(&label)) {
            Some(summary) => {
                self.store.write(&key, &summary, &label);
                self.metrics.record_directory_summarized();
                Some(summary)
            }
            None => {
                self.metrics.record_directory_failed();
                None
            }
        }
    }

    /// Body of an already-written directory rollup, if any
    pub fn existing_rollup(&self, relative: &Path) -> Option<String> {
        self.store.read(&SummaryKey::directory(relative))
    }

    fn ask(&self, content: &str, context: &str) -> Option<String> {
        self.metrics.record_oracle_call();
        match self.oracle.summarize(content, context) {
            Ok(summary) if !summary.trim().is_empty() => Some(summary.trim().to_string()),
            Ok(_) => {
                tracing::warn!(context, "oracle returned an empty summary");
                None
            }
            Err(e) => {
                tracing::warn!(context, error = %e, "failed to generate summary");
                None
            }
        }
    }
}
