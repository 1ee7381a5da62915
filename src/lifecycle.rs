//! Startup and shutdown hooks around the dispatch loop.

use crate::error::Result;
use crate::signals::install_shell_policy;

/// Run once before the first dispatch.
///
/// Installs the shell's signal policy. An error here is fatal: the caller
/// must exit rather than dispatch with undefined signal semantics.
pub fn prepare() -> Result<()> {
    install_shell_policy()
}

/// Run once after the last dispatch. Nothing needs undoing today.
pub fn finalize() -> Result<()> {
    Ok(())
}
