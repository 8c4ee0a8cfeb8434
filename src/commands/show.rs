//! `treesum show` command - print a recorded summary
//!
//! Reads the store only; the oracle is never contacted.

use std::path::Path;

use treesum_core::error::{Result, TreesumError};
use treesum_core::store::{SummaryKey, SummaryStore};

use crate::cli::paths::repo_relative;
use crate::commands::dispatch::CommandContext;
use crate::commands::helpers::{metadata_root, repository_root};
use crate::output_by_format_result;

/// Execute the show command
pub fn execute(
    ctx: &CommandContext,
    path: &Path,
    repo: Option<&Path>,
    metadata_dir: Option<&Path>,
) -> Result<()> {
    let root = repository_root(ctx, repo)?;
    let config = ctx.load_config()?;
    let store = SummaryStore::new(metadata_root(ctx, &config, &root, metadata_dir));

    let relative = repo_relative(ctx.cwd, &root, path)
        .ok_or_else(|| TreesumError::invalid_value("path", path.display()))?;
    let key = if root.join(&relative).is_dir() {
        SummaryKey::directory(&relative)
    } else {
        SummaryKey::file(&relative)
    };

    let summary = store
        .read(&key)
        .ok_or_else(|| TreesumError::RecordNotFound {
            label: key.label(),
            path: store.record_path(&key),
        })?;

    output_by_format_result!(ctx.cli.format,
        json => {
            let output = serde_json::json!({
                "path": key.label(),
                "kind": kind(&key),
                "record": store.record_path(&key).display().to_string(),
                "summary": summary,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        },
        human => {
            println!("{}", summary);
        }
    )
}

fn kind(key: &SummaryKey) -> &'static str {
    match key {
        SummaryKey::File(_) => "file",
        SummaryKey::Directory(_) => "directory",
        SummaryKey::Repository => "repository",
    }
}
