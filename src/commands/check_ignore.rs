//! `treesum check-ignore` command - explain what a scan would skip

use std::path::Path;

use serde::Serialize;

use treesum_core::classify;
use treesum_core::error::{Result, TreesumError};
use treesum_core::scan::exclude_metadata_root;
use treesum_core::store::paths::relative_label;

use crate::cli::paths::repo_relative;
use crate::commands::dispatch::CommandContext;
use crate::commands::helpers::{load_ignore_rules, repository_root};
use crate::output_by_format_result;

#[derive(Debug, Serialize)]
struct Verdict {
    path: String,
    ignored: bool,
    /// Only known for existing files that are not ignored
    binary: Option<bool>,
}

impl Verdict {
    fn status(&self) -> &'static str {
        match (self.ignored, self.binary) {
            (true, _) => "ignored",
            (false, Some(true)) => "binary",
            (false, _) => "included",
        }
    }
}

/// Execute the check-ignore command
pub fn execute(
    ctx: &CommandContext,
    paths: &[std::path::PathBuf],
    repo: Option<&Path>,
    ignore_file: Option<&Path>,
) -> Result<()> {
    let root = repository_root(ctx, repo)?;
    let config = ctx.load_config()?;
    let rules = exclude_metadata_root(
        load_ignore_rules(ctx, &config, ignore_file)?,
        &root,
        &config.metadata_root(&root),
    );

    let mut verdicts = Vec::with_capacity(paths.len());
    for path in paths {
        let relative = repo_relative(ctx.cwd, &root, path)
            .ok_or_else(|| TreesumError::invalid_value("path", path.display()))?;
        let target = root.join(&relative);
        let ignored = rules.should_ignore(&target, &root);
        let binary = (!ignored && target.is_file()).then(|| !classify::is_text_eligible(&target));

        let label = if relative.as_os_str().is_empty() {
            ".".to_string()
        } else {
            relative_label(&relative)
        };
        verdicts.push(Verdict {
            path: label,
            ignored,
            binary,
        });
    }

    output_by_format_result!(ctx.cli.format,
        json => {
            println!("{}", serde_json::to_string_pretty(&verdicts)?);
            Ok(())
        },
        human => {
            for verdict in &verdicts {
                println!("{}\t{}", verdict.status(), verdict.path);
            }
        }
    )
}
