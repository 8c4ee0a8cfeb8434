//! Summary store for treesum
//!
//! A path-keyed cache of summary text, persisted as small markdown
//! documents under a metadata root that mirrors the source tree. Every
//! record looks like:
//!
//! ```text
//! # Summary: src/lib.rs
//!
//! <summary text>
//! ```
//!
//! The existence of a record is its only validity signal. Records are
//! written once and never rewritten or deleted by the store.

pub mod paths;

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub use paths::{
    SummaryKey, DIRECTORY_SUMMARY_FILE, FILE_SUMMARY_SUFFIX, REPOSITORY_LABEL,
    REPOSITORY_SUMMARY_FILE,
};

const TITLE_PREFIX: &str = "# Summary: ";
const HEADER_LINES: usize = 2;

/// Persisted summary records rooted at a metadata directory
#[derive(Debug, Clone)]
pub struct SummaryStore {
    root: PathBuf,
}

impl SummaryStore {
    /// Open a store rooted at `metadata_root`. Nothing is created until the
    /// first write.
    pub fn new(metadata_root: impl Into<PathBuf>) -> Self {
        Self {
            root: metadata_root.into(),
        }
    }

    /// Metadata root of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File holding the record for `key`
    pub fn record_path(&self, key: &SummaryKey) -> PathBuf {
        key.record_path(&self.root)
    }

    /// True iff a record for `key` is present
    pub fn exists(&self, key: &SummaryKey) -> bool {
        self.record_path(key).is_file()
    }

    /// Read back the summary body of a record.
    ///
    /// `None` when the record is missing, unreadable, or has no body after
    /// its two header lines.
    pub fn read(&self, key: &SummaryKey) -> Option<String> {
        let path = self.record_path(key);
        match fs::read_to_string(&path) {
            Ok(content) => parse_record(&content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read summary record");
                None
            }
        }
    }

    /// Persist a record for `key`, titled with `source_label`.
    ///
    /// The record is written to a temporary sibling and renamed into place,
    /// so a failed write never leaves a partial record. Returns false on
    /// I/O failure; callers carry on without the cache entry.
    pub fn write(&self, key: &SummaryKey, text: &str, source_label: &str) -> bool {
        let path = self.record_path(key);
        match write_record(&path, &render_record(text, source_label)) {
            Ok(()) => {
                tracing::trace!(path = %path.display(), "summary record written");
                true
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to save summary record");
                false
            }
        }
    }
}

/// Render a record document
pub fn render_record(text: &str, source_label: &str) -> String {
    format!("{TITLE_PREFIX}{source_label}\n\n{text}\n")
}

/// Extract the body of a record document, skipping the title and blank line
pub fn parse_record(content: &str) -> Option<String> {
    let lines: Vec<&str> = content.lines().collect();
    if lines.len() <= HEADER_LINES {
        return None;
    }

    let body = lines[HEADER_LINES..].join("\n");
    let body = body.trim();
    if body.is_empty() {
        None
    } else {
        Some(body.to_string())
    }
}

fn write_record(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut temp: OsString = path.as_os_str().to_owned();
    temp.push(".tmp");
    let temp = PathBuf::from(temp);

    let result = fs::write(&temp, content).and_then(|()| fs::rename(&temp, path));
    if result.is_err() {
        let _ = fs::remove_file(&temp);
    }
    result
}
