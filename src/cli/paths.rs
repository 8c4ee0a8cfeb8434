//! Path resolution utilities for CLI commands

use std::env;
use std::path::{Component, Path, PathBuf};

/// Resolve the root path a command works against.
///
/// If a path is provided, returns it. Otherwise, falls back to the current
/// working directory, or "." if that cannot be determined.
pub fn resolve_root_path(root: Option<PathBuf>) -> PathBuf {
    root.unwrap_or_else(|| env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Anchor a possibly relative path at `base`
pub fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Path of `path` inside `repo`, with `.` components dropped.
///
/// `path` is first resolved against `cwd`. If that lands outside the
/// repository, a relative `path` is taken as relative to the repository
/// itself. `None` if the path cannot name anything inside the repository.
pub fn repo_relative(cwd: &Path, repo: &Path, path: &Path) -> Option<PathBuf> {
    let absolute = resolve_against(cwd, path);
    let relative = match absolute.strip_prefix(repo) {
        Ok(inside) => inside,
        Err(_) if path.is_relative() => path,
        Err(_) => return None,
    };

    let mut cleaned = PathBuf::new();
    for component in relative.components() {
        match component {
            Component::Normal(segment) => cleaned.push(segment),
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(cleaned)
}
