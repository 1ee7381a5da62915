//! forksh: a minimal Unix shell.
//!
//! This is the entry point for the `forksh` binary. It parses arguments,
//! loads configuration, installs the signal policy and then either runs a
//! single `-c` command or the interactive prompt loop.

mod cli;
mod repl;

use cli::Cli;
use forksh::config::Config;
use forksh::error::{ShellError, report};
use forksh::exit_codes;
use forksh::{Dispatcher, lifecycle};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    match run(cli) {
        Ok(code) => ExitCode::from(code as u8),
        Err(err) => {
            report(&err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

fn run(cli: Cli) -> Result<i32, ShellError> {
    let config = Config::resolve(cli.config.as_deref())?;
    lifecycle::prepare()?;

    let dispatcher = Dispatcher::new(&config);

    let code = match cli.command {
        Some(line) => match repl::run_line(&dispatcher, &line) {
            Some(status) if !status.is_success() => exit_codes::USER_ERROR,
            _ => exit_codes::SUCCESS,
        },
        None => {
            let stdin = std::io::stdin();
            repl::run(&dispatcher, &config.prompt, stdin.lock(), std::io::stdout())
                .map_err(|source| ShellError::Resource {
                    what: "read",
                    source,
                })?;
            exit_codes::SUCCESS
        }
    };

    lifecycle::finalize()?;
    Ok(code)
}
