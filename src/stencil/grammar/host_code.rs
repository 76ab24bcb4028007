//! Host-language code blocks: `<? ... ?>`.
//!
//!     Runs before the markup stage so a code block is packed into a single
//!     opaque token before `<` is ever considered a tag trigger. The block's
//!     internal structure comes from a pluggable [`HostTokenizer`]; the
//!     grammar itself only needs the position of the first close marker to
//!     know how much source the block covers. A block with no close marker
//!     is not a block at all and replays as plain text.

use crate::stencil::buffer::Buffer;
use crate::stencil::error::LexError;
use crate::stencil::grammar::Grammar;
use crate::stencil::host::{EmbeddedHostTokenizer, HostTokenKind, HostTokenizer};
use crate::stencil::token::{Lexeme, Token, TokenKind};

/// Recognizer for embedded host-language code blocks.
pub struct HostCodeGrammar {
    tokenizer: Box<dyn HostTokenizer>,
}

impl HostCodeGrammar {
    pub fn new() -> Self {
        HostCodeGrammar {
            tokenizer: Box::new(EmbeddedHostTokenizer),
        }
    }

    /// Use a custom host-language tokenizer.
    pub fn with_tokenizer(tokenizer: impl HostTokenizer + 'static) -> Self {
        HostCodeGrammar {
            tokenizer: Box::new(tokenizer),
        }
    }
}

impl Default for HostCodeGrammar {
    fn default() -> Self {
        HostCodeGrammar::new()
    }
}

impl Grammar for HostCodeGrammar {
    fn parse(&self, src: &mut Buffer) -> Result<Vec<Lexeme>, LexError> {
        let mut out = Vec::new();

        while let Some(n) = src.next() {
            let triggered = n.as_byte().is_some_and(|b| b.ch == '<')
                && src.lookahead_byte(0) == Some('?');
            let Some(b) = n.as_byte().copied().filter(|_| triggered) else {
                out.push(n);
                continue;
            };

            // hand the whole remaining byte run to the host tokenizer, then
            // replay back to the end of what the block actually covers
            let mut code = String::from('<');
            code.push_str(&src.next_bytes());

            let mut host_tokens = self.tokenizer.tokenize(&code)?;
            let close = host_tokens
                .iter()
                .position(|t| t.kind == HostTokenKind::CloseMarker);

            let Some(close) = close else {
                out.push(n);
                src.replay(b.offset)?;
                continue;
            };

            host_tokens.truncate(close + 1);
            let consumed: usize = host_tokens
                .last()
                .map(|t| t.offset + t.content.len())
                .unwrap_or_default();

            let children = host_tokens
                .into_iter()
                .map(|t| Lexeme::Token(t.into_token(b.offset)))
                .collect();
            out.push(Lexeme::Token(Token::pack(TokenKind::HostCode, children)));

            src.replay(b.offset + consumed - 1)?;
        }

        Ok(out)
    }
}
