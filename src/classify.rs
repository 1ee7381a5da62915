//! Command-shape classification.
//!
//! Classification looks for special characters *inside* tokens, not for
//! operator tokens. `a&b` is a background command even though no token equals
//! `&`. This is intentionally not a parser.

use std::fmt;

/// How a command line is realized as processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandShape {
    /// One foreground process.
    Simple,
    /// One process the shell does not wait for.
    Background,
    /// Two processes joined by a pipe.
    Pipe,
    /// One process reading stdin from a file.
    InputRedirect,
    /// One process writing stdout to a file.
    OutputRedirect,
}

impl CommandShape {
    /// The exact token that splits a binary shape into two sides.
    pub fn separator(self) -> Option<&'static str> {
        match self {
            CommandShape::Pipe => Some("|"),
            CommandShape::InputRedirect => Some("<"),
            CommandShape::OutputRedirect => Some(">"),
            CommandShape::Simple | CommandShape::Background => None,
        }
    }
}

impl fmt::Display for CommandShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandShape::Simple => write!(f, "simple"),
            CommandShape::Background => write!(f, "background"),
            CommandShape::Pipe => write!(f, "pipe"),
            CommandShape::InputRedirect => write!(f, "input_redirect"),
            CommandShape::OutputRedirect => write!(f, "output_redirect"),
        }
    }
}

// Priority order matters: a token may contain several of these.
const SCAN_ORDER: [(char, CommandShape); 4] = [
    ('&', CommandShape::Background),
    ('|', CommandShape::Pipe),
    ('<', CommandShape::InputRedirect),
    ('>', CommandShape::OutputRedirect),
];

/// Classify a token sequence.
///
/// The first character in `& | < >` order that appears anywhere in any token
/// wins; no match means [`CommandShape::Simple`].
pub fn classify<S: AsRef<str>>(tokens: &[S]) -> CommandShape {
    SCAN_ORDER
        .iter()
        .find(|(ch, _)| tokens.iter().any(|t| t.as_ref().contains(*ch)))
        .map(|&(_, shape)| shape)
        .unwrap_or(CommandShape::Simple)
}
