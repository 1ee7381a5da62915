//! Prompt loop feeding the dispatcher.
//!
//! Lines are split on whitespace only; there is no quoting and no built-in
//! commands.

use forksh::{DispatchStatus, Dispatcher};
use std::io::{self, BufRead, Write};

/// Split a raw line into tokens.
pub fn tokenize(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

/// Dispatch one raw line. Blank lines are not dispatched.
pub fn run_line(dispatcher: &Dispatcher, line: &str) -> Option<DispatchStatus> {
    let tokens = tokenize(line);
    if tokens.is_empty() {
        return None;
    }
    Some(dispatcher.dispatch(&tokens))
}

/// Prompt, read and dispatch until end of input.
pub fn run<R: BufRead, W: Write>(
    dispatcher: &Dispatcher,
    prompt: &str,
    input: R,
    mut output: W,
) -> io::Result<()> {
    let mut lines = input.lines();
    loop {
        write!(output, "{}", prompt)?;
        output.flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        // A failed dispatch has already been reported; keep prompting.
        run_line(dispatcher, &line?);
    }
    writeln!(output)?;
    Ok(())
}
