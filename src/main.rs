//! treesum - hierarchical repository summaries
//!
//! Walks a repository, summarizes every text file through a language model,
//! and rolls the results up into per-directory and repository summaries.

mod cli;
mod commands;

use std::env;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use cli::Cli;
use treesum_core::error::{ExitCode as TreesumExitCode, TreesumError};
use treesum_core::format::OutputFormat;
use treesum_core::logging;

fn main() -> ExitCode {
    let start = Instant::now();

    let argv_format_json = argv_requests_json();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // clap can fail before `Cli.format` exists, so look at argv for
            // a JSON request and answer with the structured envelope.
            if argv_format_json {
                let treesum_error = match err.kind() {
                    clap::error::ErrorKind::DisplayHelp
                    | clap::error::ErrorKind::DisplayVersion => err.exit(),
                    clap::error::ErrorKind::ValueValidation
                    | clap::error::ErrorKind::InvalidValue
                    | clap::error::ErrorKind::InvalidSubcommand
                    | clap::error::ErrorKind::UnknownArgument
                    | clap::error::ErrorKind::ArgumentConflict
                    | clap::error::ErrorKind::MissingRequiredArgument
                    | clap::error::ErrorKind::MissingSubcommand => {
                        TreesumError::UsageError(err.to_string())
                    }
                    _ => TreesumError::Other(err.to_string()),
                };

                eprintln!("{}", treesum_error.to_json());
                return ExitCode::from(treesum_error.exit_code() as u8);
            }

            err.exit();
        }
    };

    let log_level = if cli.quiet && cli.log_level.is_none() {
        Some("warn")
    } else {
        cli.log_level.as_deref()
    };
    if let Err(e) = logging::init_tracing(cli.verbose, log_level, cli.log_json) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::debug!(elapsed = ?start.elapsed(), "parse_args");

    match commands::dispatch::run(&cli, start) {
        Ok(()) => ExitCode::from(TreesumExitCode::Success as u8),
        Err(e) => {
            let exit_code = e.exit_code();

            if cli.format == OutputFormat::Json {
                eprintln!("{}", e.to_json());
            } else if !cli.quiet {
                eprintln!("error: {}", e);
            }

            ExitCode::from(exit_code as u8)
        }
    }
}

fn argv_requests_json() -> bool {
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--format" {
            if args.next().is_some_and(|v| v == "json") {
                return true;
            }
        } else if arg == "--format=json" {
            return true;
        }
    }
    false
}
