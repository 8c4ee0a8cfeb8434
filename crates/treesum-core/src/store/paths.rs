//! Record paths inside the metadata root
//!
//! The metadata root mirrors the source tree:
//! - file `src/lib.rs` -> `src/lib.rs.summary.md`
//! - directory `src` -> `src/_directory_summary.md`
//! - repository root -> `_repository_summary.md`

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// Suffix appended to a file's name for its record
pub const FILE_SUMMARY_SUFFIX: &str = ".summary.md";

/// Record name inside a mirrored directory
pub const DIRECTORY_SUMMARY_FILE: &str = "_directory_summary.md";

/// Record name for the repository rollup, at the top of the metadata root
pub const REPOSITORY_SUMMARY_FILE: &str = "_repository_summary.md";

/// Label used for the repository root in titles and oracle context
pub const REPOSITORY_LABEL: &str = "repository root";

/// Key of one summary record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SummaryKey {
    /// A file, by path relative to the repository root
    File(PathBuf),
    /// A directory other than the root, by relative path
    Directory(PathBuf),
    /// The repository root's rollup
    Repository,
}

impl SummaryKey {
    /// Key for a file
    pub fn file(relative: impl Into<PathBuf>) -> Self {
        SummaryKey::File(relative.into())
    }

    /// Key for a directory; an empty relative path is the repository root
    pub fn directory(relative: impl Into<PathBuf>) -> Self {
        let relative = relative.into();
        if is_root(&relative) {
            SummaryKey::Repository
        } else {
            SummaryKey::Directory(relative)
        }
    }

    /// Where this record lives under `metadata_root`
    pub fn record_path(&self, metadata_root: &Path) -> PathBuf {
        match self {
            SummaryKey::File(relative) => {
                let mut path: OsString = metadata_root.join(relative).into_os_string();
                path.push(FILE_SUMMARY_SUFFIX);
                PathBuf::from(path)
            }
            SummaryKey::Directory(relative) => {
                metadata_root.join(relative).join(DIRECTORY_SUMMARY_FILE)
            }
            SummaryKey::Repository => metadata_root.join(REPOSITORY_SUMMARY_FILE),
        }
    }

    /// Human label for titles and oracle context: the `/`-separated
    /// relative path, or [`REPOSITORY_LABEL`]
    pub fn label(&self) -> String {
        match self {
            SummaryKey::File(relative) | SummaryKey::Directory(relative) => {
                relative_label(relative)
            }
            SummaryKey::Repository => REPOSITORY_LABEL.to_string(),
        }
    }
}

/// Render a relative path with `/` separators regardless of platform
pub fn relative_label(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(segment) => Some(segment.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// True for the empty (or `.`) relative path
pub fn is_root(relative: &Path) -> bool {
    relative
        .components()
        .all(|component| matches!(component, Component::CurDir))
}
