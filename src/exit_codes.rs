//! Exit code constants for the forksh driver.
//!
//! - 0: Success
//! - 1: User error (bad config, malformed command line, failed `-c` dispatch)
//! - 2: Setup failure (signal policy could not be installed)
//! - 3: Spawn failure (process or channel creation failed)
//! - 4: Wait failure (unexpected `waitpid` error)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad configuration, malformed command line.
pub const USER_ERROR: i32 = 1;

/// Signal policy installation failed; the shell cannot run safely.
pub const SETUP_FAILURE: i32 = 2;

/// Process or pipe creation failed at the orchestration level.
pub const SPAWN_FAILURE: i32 = 3;

/// Waiting on a foreground child failed unexpectedly.
pub const WAIT_FAILURE: i32 = 4;
