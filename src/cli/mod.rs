//! CLI argument parsing for treesum
//!
//! Global flags: --format, --quiet, --verbose, --log-level, --log-json, --config

pub mod format;
pub mod parse;
pub mod paths;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use parse::parse_output_format;
use treesum_core::format::OutputFormat;

/// treesum - hierarchical repository summaries
#[derive(Parser, Debug)]
#[command(name = "treesum")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (human or json)
    #[arg(long, global = true, value_parser = parse_output_format, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Report timing for major phases
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log level filter (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Configuration file (default: ./treesum.toml, then the user config)
    #[arg(long, global = true, env = "TREESUM_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarize a repository, reusing every summary already on disk
    Scan {
        /// Repository root
        path: PathBuf,

        /// Where summary records are written (default: <PATH>/scanner_metadata)
        #[arg(long)]
        metadata_dir: Option<PathBuf>,

        /// JSON ignore rules ({"names": [...], "regexes": [...]})
        #[arg(long)]
        ignore_file: Option<PathBuf>,
    },

    /// Print the recorded summary of a file or directory
    Show {
        /// File or directory inside the repository
        path: PathBuf,

        /// Repository root (default: current directory)
        #[arg(long)]
        repo: Option<PathBuf>,

        /// Metadata directory the records live in
        #[arg(long)]
        metadata_dir: Option<PathBuf>,
    },

    /// Report whether paths would be left out of a scan
    CheckIgnore {
        /// Paths to test
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Repository root (default: current directory)
        #[arg(long)]
        repo: Option<PathBuf>,

        /// JSON ignore rules
        #[arg(long)]
        ignore_file: Option<PathBuf>,
    },
}
