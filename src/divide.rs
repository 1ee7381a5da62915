//! Splitting a command line at an operator token.
//!
//! Unlike classification, the split point must *equal* the separator. The
//! input is never modified; both sides are sub-slices of it.

use crate::error::{Result, ShellError};

/// The two commands on either side of a separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split<'a, S> {
    pub left: &'a [S],
    pub right: &'a [S],
}

/// Index of the first token exactly equal to `separator`.
pub fn find_separator<S: AsRef<str>>(tokens: &[S], separator: &str) -> Option<usize> {
    tokens.iter().position(|t| t.as_ref() == separator)
}

/// Split `tokens` around the first exact `separator`.
///
/// Both sides must be non-empty: the left side holds the executable, and the
/// first token of the right side is either an executable or a file path.
pub fn divide<'a, S: AsRef<str>>(tokens: &'a [S], separator: &str) -> Result<Split<'a, S>> {
    let index = find_separator(tokens, separator).ok_or_else(|| {
        ShellError::Malformed(format!(
            "expected a standalone '{}' token; operators must be separated by spaces",
            separator
        ))
    })?;

    let (left, rest) = tokens.split_at(index);
    let right = &rest[1..];

    if left.is_empty() {
        return Err(ShellError::Malformed(format!(
            "missing command before '{}'",
            separator
        )));
    }
    if right.is_empty() {
        return Err(ShellError::Malformed(format!(
            "missing operand after '{}'",
            separator
        )));
    }

    Ok(Split { left, right })
}
