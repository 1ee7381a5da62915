//! Error types for forksh.
//!
//! Uses thiserror for derive macros. Every variant renders as the text that
//! follows `Error: ` in a diagnostic line on stderr.

use crate::exit_codes;
use nix::errno::Errno;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for shell operations.
#[derive(Error, Debug)]
pub enum ShellError {
    /// A signal disposition could not be installed.
    #[error("sigaction failed - {0}")]
    Setup(Errno),

    /// The OS refused to create a new process.
    #[error("fork error: {0}")]
    Spawn(std::io::Error),

    /// A redirect target could not be opened.
    #[error("open failed - {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A shell-side resource (pipe, event log, input) could not be used.
    #[error("{what} failed - {source}")]
    Resource {
        what: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// The program image could not be replaced.
    #[error("execvp failed - {program}: {source}")]
    Exec {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// `waitpid` failed for a reason other than ECHILD or EINTR.
    #[error("waitpid failed - {0}")]
    Wait(Errno),

    /// The command line does not have the shape its operator implies.
    #[error("{0}")]
    Malformed(String),

    /// Configuration could not be read or is invalid.
    #[error("{0}")]
    Config(String),
}

impl ShellError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ShellError::Setup(_) => exit_codes::SETUP_FAILURE,
            ShellError::Spawn(_) => exit_codes::SPAWN_FAILURE,
            ShellError::Open { .. } => exit_codes::USER_ERROR,
            ShellError::Resource { .. } => exit_codes::SPAWN_FAILURE,
            ShellError::Exec { .. } => exit_codes::USER_ERROR,
            ShellError::Wait(_) => exit_codes::WAIT_FAILURE,
            ShellError::Malformed(_) => exit_codes::USER_ERROR,
            ShellError::Config(_) => exit_codes::USER_ERROR,
        }
    }

    /// Whether the failure belongs to a single child rather than to the
    /// orchestration. Child-local failures are reported but do not turn a
    /// dispatch into a failure.
    pub fn is_child_local(&self) -> bool {
        matches!(self, ShellError::Exec { .. } | ShellError::Open { .. })
    }
}

/// Result type alias for shell operations.
pub type Result<T> = std::result::Result<T, ShellError>;

/// Print a diagnostic for `err` to stderr.
pub fn report(err: &ShellError) {
    eprintln!("Error: {}", err);
}
