//! Command dispatch logic for treesum

use std::time::Instant;

use crate::cli::paths::resolve_root_path;
use crate::cli::Cli;
use tracing::debug;
use treesum_core::error::Result;

mod command;
mod macros;

pub(crate) use command::CommandContext;
use command::{Command, NoCommand};
pub(crate) use macros::trace_command;

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    let cwd = resolve_root_path(None);

    debug!(elapsed = ?start.elapsed(), "resolve_cwd");

    let ctx = CommandContext::new(cli, &cwd, start);

    match &cli.command {
        None => NoCommand.execute(&ctx),
        Some(cmd) => cmd.execute(&ctx),
    }
}
