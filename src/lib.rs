//! forksh: command-execution engine for a line-oriented Unix shell.
//!
//! Given an already tokenized command line, the engine classifies its shape
//! (simple, background, pipe, input or output redirect), starts the processes
//! that realize it with their standard streams wired up, and reports whether
//! that orchestration succeeded.
//!
//! ```no_run
//! use forksh::{Dispatcher, lifecycle};
//!
//! lifecycle::prepare()?;
//! let dispatcher = Dispatcher::default();
//! let line: Vec<String> = ["ls", "-l", "|", "wc", "-l"].map(String::from).to_vec();
//! let status = dispatcher.dispatch(&line);
//! assert!(status.is_success());
//! lifecycle::finalize()?;
//! # Ok::<(), forksh::error::ShellError>(())
//! ```

pub mod classify;
pub mod config;
pub mod dispatch;
pub mod divide;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod lifecycle;
pub mod signals;

#[cfg(test)]
pub(crate) mod test_support;

pub use classify::{CommandShape, classify};
pub use dispatch::{DispatchStatus, Dispatcher};

/// Dispatch `arglist` with default settings and return `1` if the shell
/// orchestrated it successfully, `0` otherwise.
pub fn process_arglist(arglist: &[String]) -> i32 {
    Dispatcher::default().dispatch(arglist).as_raw()
}
