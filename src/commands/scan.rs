//! `treesum scan` command - summarize a repository
//!
//! Files are summarized first, then directories bottom up. Records already
//! on disk are reused, so an interrupted scan resumes where it stopped.

use std::path::Path;

use treesum_core::error::{Result, TreesumError};
use treesum_core::oracle::ChatCompletionsOracle;
use treesum_core::scan::{ScanReport, Scanner};

use crate::commands::dispatch::{trace_command, CommandContext};
use crate::commands::helpers::{load_ignore_rules, metadata_root};
use crate::output_by_format_result;

/// Execute the scan command
pub fn execute(
    ctx: &CommandContext,
    path: &Path,
    metadata_dir: Option<&Path>,
    ignore_file: Option<&Path>,
) -> Result<()> {
    let root = ctx.resolve(path);
    if !root.is_dir() {
        return Err(TreesumError::RepositoryNotFound { path: root });
    }

    let config = ctx.load_config()?;
    trace_command!(ctx.cli, ctx.start, "load_config");

    let rules = load_ignore_rules(ctx, &config, ignore_file)?;
    let metadata = metadata_root(ctx, &config, &root, metadata_dir);

    let oracle = ChatCompletionsOracle::from_config(&config.oracle)?;
    tracing::debug!(endpoint = oracle.endpoint(), model = oracle.model(), "oracle ready");

    let scanner = Scanner::new(&root, &metadata, rules, &oracle)?;
    let report = scanner.run();
    trace_command!(ctx.cli, ctx.start, "scan");

    output_by_format_result!(ctx.cli.format,
        json => {
            let output = serde_json::json!({
                "root": root.display().to_string(),
                "metadata": metadata.display().to_string(),
                "report": report,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        },
        human => {
            if !ctx.cli.quiet {
                print_report(&root, &metadata, &report);
            }
        }
    )
}

fn print_report(root: &Path, metadata: &Path, report: &ScanReport) {
    println!("Scanned {}", root.display());
    println!(
        "  files:       {} summarized, {} cached, {} skipped, {} excluded, {} failed",
        report.files_summarized,
        report.files_cached,
        report.files_skipped,
        report.files_excluded,
        report.files_failed
    );
    println!(
        "  directories: {} summarized, {} cached, {} failed",
        report.directories_summarized, report.directories_cached, report.directories_failed
    );
    println!("  oracle calls: {}", report.oracle_calls);
    println!("Summaries in {}", metadata.display());
    if report.has_failures() {
        println!("Some items could not be summarized; run the scan again to retry them.");
    }
}
