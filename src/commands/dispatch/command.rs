//! Command trait and context for dispatching commands

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::cli::{Cli, Commands};
use crate::cli::paths::resolve_against;
use treesum_core::config::ScanConfig;
use treesum_core::error::Result;

/// Shared context for command execution
pub struct CommandContext<'a> {
    pub cli: &'a Cli,
    pub cwd: &'a PathBuf,
    pub start: Instant,
}

impl<'a> CommandContext<'a> {
    pub fn new(cli: &'a Cli, cwd: &'a PathBuf, start: Instant) -> Self {
        Self { cli, cwd, start }
    }

    /// Anchor a user-supplied path at the working directory
    pub fn resolve(&self, path: &Path) -> PathBuf {
        resolve_against(self.cwd, path)
    }

    /// Configuration for this invocation, environment overrides applied
    pub fn load_config(&self) -> Result<ScanConfig> {
        let explicit = self.cli.config.as_deref().map(|path| self.resolve(path));
        ScanConfig::discover(explicit.as_deref(), self.cwd)
    }
}

/// Trait for commands that can be executed
pub trait Command {
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

impl Command for Commands {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Commands::Scan {
                path,
                metadata_dir,
                ignore_file,
            } => crate::commands::scan::execute(
                ctx,
                path,
                metadata_dir.as_deref(),
                ignore_file.as_deref(),
            ),
            Commands::Show {
                path,
                repo,
                metadata_dir,
            } => crate::commands::show::execute(ctx, path, repo.as_deref(), metadata_dir.as_deref()),
            Commands::CheckIgnore {
                paths,
                repo,
                ignore_file,
            } => crate::commands::check_ignore::execute(
                ctx,
                paths,
                repo.as_deref(),
                ignore_file.as_deref(),
            ),
        }
    }
}

/// No-op command (when no subcommand is provided)
pub struct NoCommand;

impl Command for NoCommand {
    fn execute(&self, _ctx: &CommandContext) -> Result<()> {
        println!("treesum {}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Hierarchical summaries of a source repository.");
        println!();
        println!("Run `treesum --help` for usage information.");
        Ok(())
    }
}
