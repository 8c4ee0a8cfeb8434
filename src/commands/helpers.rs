//! Shared helpers for commands that read a repository

use std::path::{Path, PathBuf};

use treesum_core::config::ScanConfig;
use treesum_core::error::{Result, TreesumError};
use treesum_core::ignore::IgnoreRuleSet;

use crate::commands::dispatch::CommandContext;

/// Ignore rules for a run.
///
/// A file named on the command line must exist. One named in the config is
/// loaded leniently, and with neither nothing is ignored.
pub fn load_ignore_rules(
    ctx: &CommandContext,
    config: &ScanConfig,
    flag: Option<&Path>,
) -> Result<IgnoreRuleSet> {
    if let Some(path) = flag {
        let path = ctx.resolve(path);
        if !path.is_file() {
            return Err(TreesumError::IgnoreFileNotFound { path });
        }
        return Ok(IgnoreRuleSet::load(&path));
    }

    match &config.ignore_file {
        Some(path) => Ok(IgnoreRuleSet::load(&ctx.resolve(path))),
        None => Ok(IgnoreRuleSet::empty()),
    }
}

/// Metadata root for `repo`: the flag (relative to the working directory)
/// or the configured directory (relative to the repository).
pub fn metadata_root(
    ctx: &CommandContext,
    config: &ScanConfig,
    repo: &Path,
    flag: Option<&Path>,
) -> PathBuf {
    match flag {
        Some(path) => ctx.resolve(path),
        None => config.metadata_root(repo),
    }
}

/// Repository root for commands that take `--repo`
pub fn repository_root(ctx: &CommandContext, repo: Option<&Path>) -> Result<PathBuf> {
    let root = match repo {
        Some(path) => ctx.resolve(path),
        None => ctx.cwd.clone(),
    };
    if !root.is_dir() {
        return Err(TreesumError::RepositoryNotFound { path: root });
    }
    Ok(root)
}
