//! CLI argument parsing for forksh.
//!
//! Uses clap derive macros for declarative argument definitions.

use clap::Parser;
use std::path::PathBuf;

/// forksh: a minimal Unix shell.
///
/// Runs simple commands, background jobs (`cmd args &`), a single pipe
/// (`a | b`), and one input or output redirect (`cmd < file`, `cmd > file`).
/// Operators must be separate words.
#[derive(Parser, Debug)]
#[command(name = "forksh")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a YAML config file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Run a single command line and exit.
    #[arg(short = 'c', value_name = "COMMAND")]
    pub command: Option<String>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
