//! Signal dispositions for the shell and its children.
//!
//! The shell ignores SIGINT so the interrupt key never kills it, and ignores
//! SIGCHLD so the kernel reaps terminated children that nobody waits on.
//! Foreground children restore SIGINT to its default before exec; background
//! children keep the inherited "ignore".
//!
//! Both dispositions survive `exec`, which is what makes this work: an ignored
//! signal stays ignored in the new program image.

use crate::error::{Result, ShellError};
use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet, Signal, sigaction};

/// Which signal policy a spawned child runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildPolicy {
    /// Interrupt terminates the job.
    Foreground,
    /// Interrupt stays ignored, as inherited from the shell.
    Background,
}

impl ChildPolicy {
    /// Apply this policy inside a freshly forked child.
    ///
    /// Runs between fork and exec, so it performs nothing but a `sigaction`.
    pub fn apply_in_child(self) -> nix::Result<()> {
        match self {
            ChildPolicy::Foreground => install_foreground_policy(),
            ChildPolicy::Background => Ok(()),
        }
    }
}

fn set_disposition(signal: Signal, handler: SigHandler) -> nix::Result<()> {
    let action = SigAction::new(handler, SaFlags::SA_RESTART, SigSet::empty());
    // SAFETY: only SIG_IGN and SIG_DFL are installed, never a Rust handler.
    unsafe { sigaction(signal, &action) }.map(|_| ())
}

/// Make the current process ignore SIGINT and SIGCHLD.
///
/// Must run once before the first dispatch. A failure here leaves signal
/// semantics undefined, so callers treat it as fatal.
pub fn install_shell_policy() -> Result<()> {
    set_disposition(Signal::SIGINT, SigHandler::SigIgn).map_err(ShellError::Setup)?;
    set_disposition(Signal::SIGCHLD, SigHandler::SigIgn).map_err(ShellError::Setup)?;
    Ok(())
}

/// Reset SIGINT to its default disposition.
pub fn install_foreground_policy() -> nix::Result<()> {
    set_disposition(Signal::SIGINT, SigHandler::SigDfl)
}
