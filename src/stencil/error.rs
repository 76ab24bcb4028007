//! Error types surfaced by the lexer.
//!
//! Recoverable lexical ambiguity (unterminated tags, unknown directives,
//! malformed placeholders) is never an error: the offending grammar replays
//! the buffer and the bytes degrade to raw text. Only two conditions reach
//! the caller: a grammar violating the replay contract, and a fault reported
//! by the pluggable host tokenizer.

use std::fmt;

/// Errors that can occur during lexing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    /// A grammar replayed the buffer to an offset that was never issued.
    /// This indicates a bug in a grammar implementation, not bad input.
    InvalidReplay {
        /// The offset the grammar asked to replay to.
        offset: usize,
        /// The highest offset the buffer had issued, if any.
        issued: Option<usize>,
    },
    /// The host tokenizer failed on an embedded code block.
    HostSyntax(String),
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::InvalidReplay { offset, issued } => match issued {
                Some(issued) => write!(
                    f,
                    "invalid replay to offset {} (highest issued offset is {})",
                    offset, issued
                ),
                None => write!(f, "invalid replay to offset {} (nothing issued yet)", offset),
            },
            LexError::HostSyntax(msg) => write!(f, "host tokenizer error: {}", msg),
        }
    }
}

impl std::error::Error for LexError {}
