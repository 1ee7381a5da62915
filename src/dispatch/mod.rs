//! Command dispatch.
//!
//! Turns one token sequence into running processes according to its
//! [`CommandShape`], waits where the shape calls for it, and reports a coarse
//! status. The status says whether the shell managed to spawn, wire and wait;
//! it never reflects the executed program's own exit code.
//!
//! Failures that belong to a single child (a missing input file, an unknown
//! executable) are reported on stderr but do not fail the dispatch. Failures
//! of the orchestration itself (fork, pipe creation, an unexpected `waitpid`
//! error, a malformed command line) do.

mod process;


pub use process::{Job, Launch, StreamBinding, WaitOutcome, Waiter, pipe_channel, wait_foreground};

use process::empty_command;

use crate::classify::{CommandShape, classify};
use crate::config::Config;
use crate::divide::{Split, divide};
use crate::error::{Result, ShellError, report};
use crate::events::{Event, EventAction, EventLog};
use crate::signals::ChildPolicy;
use serde_json::json;
use std::path::Path;

/// Outcome of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStatus {
    Success,
    Failure,
}

impl DispatchStatus {
    /// Integer form for callers that speak the C-style contract:
    /// `1` for success, `0` for failure.
    pub fn as_raw(self) -> i32 {
        match self {
            DispatchStatus::Success => 1,
            DispatchStatus::Failure => 0,
        }
    }

    pub fn is_success(self) -> bool {
        self == DispatchStatus::Success
    }
}

/// Spawns and wires processes for classified command lines.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    output_mode: u32,
    events: Option<EventLog>,
    waiter: Waiter,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Dispatcher {
    pub fn new(config: &Config) -> Self {
        Self {
            output_mode: config.output_mode,
            events: config.event_log.clone().map(EventLog::new),
            waiter: wait_foreground,
        }
    }

    /// Wait on foreground children with `waiter` instead of `waitpid`.
    #[cfg(test)]
    pub(crate) fn with_waiter(mut self, waiter: Waiter) -> Self {
        self.waiter = waiter;
        self
    }

    /// Classify `tokens` and run them.
    ///
    /// Any failure is reported on stderr before this returns.
    pub fn dispatch(&self, tokens: &[String]) -> DispatchStatus {
        if tokens.is_empty() {
            self.fail(&ShellError::Malformed("No command given".to_string()));
            return DispatchStatus::Failure;
        }

        self.dispatch_shape(classify(tokens), tokens)
    }

    /// Run `tokens` as `shape` without classifying them again.
    pub fn dispatch_shape(&self, shape: CommandShape, tokens: &[String]) -> DispatchStatus {
        match self.run(shape, tokens) {
            Ok(()) => DispatchStatus::Success,
            Err(err) => {
                self.fail(&err);
                DispatchStatus::Failure
            }
        }
    }

    fn run(&self, shape: CommandShape, tokens: &[String]) -> Result<()> {
        match shape {
            CommandShape::Simple => self.run_simple(tokens),
            CommandShape::Background => self.run_background(tokens),
            CommandShape::Pipe => self.run_pipe(self.split(shape, tokens)?),
            CommandShape::InputRedirect => self.run_input_redirect(self.split(shape, tokens)?),
            CommandShape::OutputRedirect => self.run_output_redirect(self.split(shape, tokens)?),
        }
    }

    fn split<'a>(&self, shape: CommandShape, tokens: &'a [String]) -> Result<Split<'a, String>> {
        let separator = shape.separator().ok_or_else(|| {
            ShellError::Malformed(format!("{} commands have no separator", shape))
        })?;
        divide(tokens, separator)
    }

    fn run_simple(&self, tokens: &[String]) -> Result<()> {
        let job = self.start(Launch::new(tokens, ChildPolicy::Foreground), CommandShape::Simple)?;
        self.wait(job)
    }

    fn run_background(&self, tokens: &[String]) -> Result<()> {
        // The last token is taken to be the operator, whatever it holds.
        let argv = &tokens[..tokens.len().saturating_sub(1)];
        if argv.is_empty() {
            let program = tokens.first().map(String::as_str).unwrap_or_default();
            self.absorb::<Job>(Err(empty_command(program)))?;
            return Ok(());
        }

        if let Some(job) = self.start(
            Launch::new(argv, ChildPolicy::Background),
            CommandShape::Background,
        )? {
            self.record(Event::new(EventAction::Background).with_pid(job.pid()));
            job.release();
        }
        Ok(())
    }

    fn run_pipe(&self, split: Split<'_, String>) -> Result<()> {
        let (reader, writer) = pipe_channel()?;

        let left = self.start(
            Launch::new(split.left, ChildPolicy::Foreground).stdout(StreamBinding::PipeWrite(writer)),
            CommandShape::Pipe,
        )?;
        let right = self.start(
            Launch::new(split.right, ChildPolicy::Foreground).stdin(StreamBinding::PipeRead(reader)),
            CommandShape::Pipe,
        )?;

        // The writer closed when the left child started, the reader when the
        // right one did. Neither is open in the shell by now.
        let left_wait = self.wait(left);
        let right_wait = self.wait(right);

        match (left_wait, right_wait) {
            (Err(first), Err(second)) => {
                self.fail(&first);
                Err(second)
            }
            (first, second) => first.and(second),
        }
    }

    fn run_input_redirect(&self, split: Split<'_, String>) -> Result<()> {
        let Some(input) = self.absorb(StreamBinding::read_file(Path::new(&split.right[0])))? else {
            return Ok(());
        };

        let job = self.start(
            Launch::new(split.left, ChildPolicy::Foreground).stdin(input),
            CommandShape::InputRedirect,
        )?;
        self.wait(job)
    }

    fn run_output_redirect(&self, split: Split<'_, String>) -> Result<()> {
        let output = StreamBinding::truncate_file(Path::new(&split.right[0]), self.output_mode);
        let Some(output) = self.absorb(output)? else {
            return Ok(());
        };

        let job = self.start(
            Launch::new(split.left, ChildPolicy::Foreground).stdout(output),
            CommandShape::OutputRedirect,
        )?;
        self.wait(job)
    }

    /// Spawn `launch`, logging the new process.
    fn start(&self, launch: Launch<'_>, shape: CommandShape) -> Result<Option<Job>> {
        let argv = launch.argv().to_vec();
        let job = self.absorb(launch.spawn())?;

        if let Some(job) = &job {
            self.record(
                Event::new(EventAction::Spawn)
                    .with_pid(job.pid())
                    .with_details(json!({"shape": shape.to_string(), "argv": argv})),
            );
        }
        Ok(job)
    }

    /// Report a child-local failure and carry on without that child.
    fn absorb<T>(&self, result: Result<T>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_child_local() => {
                self.fail(&err);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn wait(&self, job: Option<Job>) -> Result<()> {
        let Some(job) = job else {
            return Ok(());
        };

        let pid = job.pid();
        let program = job.program().to_string();
        let outcome = job.wait_with(self.waiter)?;
        self.record(
            Event::new(EventAction::Complete)
                .with_pid(pid)
                .with_details(json!({"program": program, "outcome": outcome.to_string()})),
        );
        Ok(())
    }

    fn fail(&self, err: &ShellError) {
        report(err);
        self.record(
            Event::new(EventAction::Failure)
                .with_details(json!({"error": err.to_string(), "child_local": err.is_child_local()})),
        );
    }

    fn record(&self, event: Event) {
        let Some(log) = &self.events else {
            return;
        };
        if let Err(err) = log.append(&event) {
            report(&err);
        }
    }
}
