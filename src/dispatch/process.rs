//! Declarative process launch.
//!
//! A [`Launch`] names the program, the signal policy the child runs under and
//! what its stdin/stdout are bound to. Each [`StreamBinding`] owns its
//! descriptor. Spawning consumes the launch, so the parent's copies of every
//! pipe endpoint and file are closed as soon as the child exists, and all of
//! them are close-on-exec so no program inherits a descriptor it was not
//! given.
//!
//! Children are started with a plain `fork` + `execvp`. A child whose exec
//! fails writes its own diagnostic and exits with status 1; the parent only
//! ever sees fork-level failures.

use crate::error::{Result, ShellError};
use crate::signals::ChildPolicy;
use nix::errno::Errno;
use nix::libc::{_exit, STDIN_FILENO, STDOUT_FILENO};
use nix::sys::signal::Signal;
use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
use nix::unistd::{ForkResult, Pid, dup2, execvp, fork, write};
use std::ffi::CString;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, PipeReader, PipeWriter};
use std::os::fd::{AsFd, AsRawFd, OwnedFd};
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

/// What a child's standard stream is connected to.
#[derive(Debug, Default)]
pub enum StreamBinding {
    /// Same stream as the shell.
    #[default]
    Inherit,
    /// Read end of a pipe channel.
    PipeRead(PipeReader),
    /// Write end of a pipe channel.
    PipeWrite(PipeWriter),
    /// An opened file.
    File(File),
}

impl StreamBinding {
    /// Open `path` read-only.
    pub fn read_file(path: &Path) -> Result<Self> {
        File::open(path)
            .map(StreamBinding::File)
            .map_err(|source| ShellError::Open {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Open `path` write-only, creating it with `mode` (less umask) or
    /// truncating it.
    pub fn truncate_file(path: &Path, mode: u32) -> Result<Self> {
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(mode)
            .open(path)
            .map(StreamBinding::File)
            .map_err(|source| ShellError::Open {
                path: path.to_path_buf(),
                source,
            })
    }

    fn into_fd(self) -> Option<OwnedFd> {
        match self {
            StreamBinding::Inherit => None,
            StreamBinding::PipeRead(reader) => Some(reader.into()),
            StreamBinding::PipeWrite(writer) => Some(writer.into()),
            StreamBinding::File(file) => Some(file.into()),
        }
    }
}

/// Create a pipe channel. Both endpoints are close-on-exec.
pub fn pipe_channel() -> Result<(PipeReader, PipeWriter)> {
    io::pipe().map_err(|source| ShellError::Resource {
        what: "pipe",
        source,
    })
}

/// Error for a launch with nothing to execute, attributed to `program`.
pub(crate) fn empty_command(program: &str) -> ShellError {
    ShellError::Exec {
        program: program.to_string(),
        source: io::Error::new(io::ErrorKind::InvalidInput, "empty command"),
    }
}

/// A process waiting to be started.
#[derive(Debug)]
pub struct Launch<'a> {
    argv: &'a [String],
    policy: ChildPolicy,
    stdin: StreamBinding,
    stdout: StreamBinding,
}

impl<'a> Launch<'a> {
    pub fn new(argv: &'a [String], policy: ChildPolicy) -> Self {
        Self {
            argv,
            policy,
            stdin: StreamBinding::Inherit,
            stdout: StreamBinding::Inherit,
        }
    }

    pub fn stdin(mut self, binding: StreamBinding) -> Self {
        self.stdin = binding;
        self
    }

    pub fn stdout(mut self, binding: StreamBinding) -> Self {
        self.stdout = binding;
        self
    }

    pub fn argv(&self) -> &[String] {
        self.argv
    }

    /// Start the process.
    ///
    /// A failed `fork` comes back as [`ShellError::Spawn`]. An argument list
    /// that cannot be handed to `execvp` at all comes back as
    /// [`ShellError::Exec`]. Everything after the fork (policy installation,
    /// stream wiring, exec) fails inside the child, which reports on stderr
    /// and exits with status 1.
    pub fn spawn(self) -> Result<Job> {
        let Some(program) = self.argv.first() else {
            return Err(empty_command(""));
        };

        let args = self
            .argv
            .iter()
            .map(|arg| CString::new(arg.as_str()))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|err| ShellError::Exec {
                program: program.clone(),
                source: io::Error::new(io::ErrorKind::InvalidInput, err),
            })?;
        let diagnostic = format!("Error: execvp failed - {}: ", program);

        let stdin = self.stdin.into_fd();
        let stdout = self.stdout.into_fd();

        // SAFETY: the child never returns from `exec_child`; it execs or
        // calls `_exit`.
        match unsafe { fork() } {
            Ok(ForkResult::Child) => exec_child(
                self.policy,
                stdin.as_ref(),
                stdout.as_ref(),
                &args,
                diagnostic.as_bytes(),
            ),
            Ok(ForkResult::Parent { child }) => Ok(Job {
                pid: child,
                program: program.clone(),
            }),
            Err(errno) => Err(ShellError::Spawn(io::Error::from(errno))),
        }
        // `stdin` and `stdout` drop here, closing the parent's copies.
    }
}

/// Child side of a launch. Only descriptor shuffling, `sigaction`, `execvp`
/// and raw writes to stderr happen here.
fn exec_child(
    policy: ChildPolicy,
    stdin: Option<&OwnedFd>,
    stdout: Option<&OwnedFd>,
    args: &[CString],
    diagnostic: &[u8],
) -> ! {
    if let Err(errno) = policy.apply_in_child() {
        child_exit(b"Error: sigaction failed - ", errno);
    }

    for (binding, target) in [(stdin, STDIN_FILENO), (stdout, STDOUT_FILENO)] {
        let Some(fd) = binding else {
            continue;
        };
        if let Err(errno) = dup2(fd.as_raw_fd(), target) {
            child_exit(b"Error: dup2 failed - ", errno);
        }
    }

    let Err(errno) = execvp(&args[0], args);
    child_exit(diagnostic, errno)
}

fn child_exit(prefix: &[u8], errno: Errno) -> ! {
    let stderr = io::stderr();
    for part in [prefix, errno.desc().as_bytes(), &b"\n"[..]] {
        let _ = write(stderr.as_fd(), part);
    }
    unsafe { _exit(1) }
}

/// How the shell waits on a foreground child.
pub type Waiter = fn(Pid) -> nix::Result<WaitStatus>;

/// Block until `pid` exits or stops.
pub fn wait_foreground(pid: Pid) -> nix::Result<WaitStatus> {
    waitpid(pid, Some(WaitPidFlag::WUNTRACED))
}

/// A running child process.
#[derive(Debug)]
pub struct Job {
    pid: Pid,
    program: String,
}

impl Job {
    pub fn pid(&self) -> u32 {
        self.pid.as_raw() as u32
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Block until the child exits or stops.
    pub fn wait(self) -> Result<WaitOutcome> {
        self.wait_with(wait_foreground)
    }

    /// Wait using `waiter` in place of `waitpid`.
    pub fn wait_with(self, waiter: Waiter) -> Result<WaitOutcome> {
        settle(waiter(self.pid))
    }

    /// Give up the handle without waiting. The kernel reaps the process
    /// once it exits because the shell ignores SIGCHLD.
    pub fn release(self) {}
}

/// How a wait on a foreground child ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Exited(i32),
    Signaled(Signal),
    Stopped(Signal),
    /// The child was already reaped, or the wait was interrupted.
    Unobserved,
}

impl fmt::Display for WaitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitOutcome::Exited(code) => write!(f, "exited({})", code),
            WaitOutcome::Signaled(sig) => write!(f, "signaled({})", sig),
            WaitOutcome::Stopped(sig) => write!(f, "stopped({})", sig),
            WaitOutcome::Unobserved => write!(f, "unobserved"),
        }
    }
}

/// Interpret a `waitpid` result.
///
/// ECHILD and EINTR are expected: with SIGCHLD ignored the kernel may reap
/// the child before we look, and a signal may cut the wait short.
pub(crate) fn settle(result: nix::Result<WaitStatus>) -> Result<WaitOutcome> {
    match result {
        Ok(WaitStatus::Exited(_, code)) => Ok(WaitOutcome::Exited(code)),
        Ok(WaitStatus::Signaled(_, sig, _)) => Ok(WaitOutcome::Signaled(sig)),
        Ok(WaitStatus::Stopped(_, sig)) => Ok(WaitOutcome::Stopped(sig)),
        Ok(_) => Ok(WaitOutcome::Unobserved),
        Err(Errno::ECHILD | Errno::EINTR) => Ok(WaitOutcome::Unobserved),
        Err(errno) => Err(ShellError::Wait(errno)),
    }
}
