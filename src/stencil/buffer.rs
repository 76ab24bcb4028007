//! The shared, replayable cursor every grammar reads from.
//!
//!     A `Buffer` is a cursor over an immutable stream of lexemes: the raw
//!     characters of the source document for the first stage, the previous
//!     stage's output for every later one. Grammars pull items with
//!     [`next`](Buffer::next), peek with [`lookahead_byte`](Buffer::lookahead_byte)
//!     and, after a failed recognition attempt, rewind with
//!     [`replay`](Buffer::replay) so the same bytes are re-offered to the
//!     rest of the stage. Replay never mutates the stream, only the cursor,
//!     so the items produced after a rewind are identical to an un-rewound
//!     read.

use crate::stencil::error::LexError;
use crate::stencil::token::{Byte, Lexeme};

/// Seekable cursor over a lexeme stream.
#[derive(Debug, Clone)]
pub struct Buffer {
    /// The stream, in ascending offset order.
    items: Vec<Lexeme>,
    /// Index of the next item to issue.
    pos: usize,
    /// Highest offset issued so far; the replay contract is checked
    /// against this high-water mark.
    issued: Option<usize>,
}

impl Buffer {
    /// Build a buffer over the raw characters of a source document.
    pub fn from_source(source: &str) -> Self {
        let items = source
            .char_indices()
            .map(|(offset, ch)| Lexeme::Byte(Byte { ch, offset }))
            .collect();
        Buffer::new(items)
    }

    /// Build a buffer over a previous stage's output.
    pub fn new(items: Vec<Lexeme>) -> Self {
        Buffer {
            items,
            pos: 0,
            issued: None,
        }
    }

    /// Issue the next item, or `None` at end of input.
    pub fn next(&mut self) -> Option<Lexeme> {
        let item = self.items.get(self.pos)?.clone();
        self.pos += 1;
        let offset = item.offset();
        self.issued = Some(self.issued.map_or(offset, |high| high.max(offset)));
        Some(item)
    }

    /// Offset of the most recently issued item, if any.
    pub fn offset(&self) -> Option<usize> {
        if self.pos == 0 {
            None
        } else {
            Some(self.items[self.pos - 1].offset())
        }
    }

    /// Peek at the `n`-th upcoming item without consuming it.
    pub fn lookahead(&self, n: usize) -> Option<&Lexeme> {
        self.items.get(self.pos + n)
    }

    /// Peek at the character of the `n`-th upcoming item.
    ///
    /// Returns `None` at end of input or when that item is a token from an
    /// upstream stage rather than a plain byte.
    pub fn lookahead_byte(&self, n: usize) -> Option<char> {
        match self.lookahead(n)? {
            Lexeme::Byte(b) => Some(b.ch),
            Lexeme::Token(_) => None,
        }
    }

    /// Consume and return the remaining run of plain bytes as text.
    ///
    /// Stops at the first upstream token or end of input. Used when handing
    /// the rest of the document to a host tokenizer; the caller replays back
    /// to the end of whatever the host actually consumed.
    pub fn next_bytes(&mut self) -> String {
        let mut out = String::new();
        while let Some(Lexeme::Byte(b)) = self.items.get(self.pos) {
            out.push(b.ch);
            let offset = b.offset;
            self.pos += 1;
            self.issued = Some(self.issued.map_or(offset, |high| high.max(offset)));
        }
        out
    }

    /// Rewind so items with an offset greater than `offset` are re-issued.
    ///
    /// The item at `offset` itself is not re-issued -- a grammar that yields
    /// a trigger byte and replays to that byte's offset resumes scanning at
    /// the following character.
    ///
    /// Replaying to an offset greater than any already-issued offset is a
    /// contract violation and fails with [`LexError::InvalidReplay`].
    pub fn replay(&mut self, offset: usize) -> Result<(), LexError> {
        match self.issued {
            Some(high) if offset <= high => {
                self.pos = self.items.partition_point(|item| item.offset() <= offset);
                Ok(())
            }
            issued => Err(LexError::InvalidReplay { offset, issued }),
        }
    }

    /// Consume the buffer back into its remaining items.
    ///
    /// Used by stages that pass the unprocessed tail through unchanged.
    pub fn drain(&mut self) -> Vec<Lexeme> {
        let rest = self.items.split_off(self.pos);
        if let Some(last) = rest.last() {
            let offset = last.offset();
            self.issued = Some(self.issued.map_or(offset, |high| high.max(offset)));
        }
        self.pos = self.items.len();
        rest
    }
}
