//! Host-language tokenizer boundary.
//!
//!     The lexer treats embedded host-language code blocks as opaque: it
//!     only needs to know where a block ends and what tokens it contains so
//!     the compile stage does not re-lex it. That knowledge comes through
//!     the [`HostTokenizer`] trait -- the core has zero knowledge of the
//!     host language's grammar.
//!
//! Default Tokenizer
//!
//!     [`EmbeddedHostTokenizer`] is a logos-based default that understands
//!     just enough structure to delimit a block: open and close markers,
//!     quoted strings and comments (so a close marker inside either does
//!     not end the block) and opaque code fragments in between. Anything
//!     the patterns do not match degrades into a fragment, so the default
//!     tokenizer never faults; a real host-language frontend plugged in
//!     through the trait may.

use logos::Logos;

use crate::stencil::error::LexError;
use crate::stencil::token::{Token, TokenKind};

/// Classification of a host token, normalized for the core's needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum HostTokenKind {
    /// An opening code marker (`<?`, long or echo form).
    OpenMarker,
    /// The closing code marker (`?>`).
    CloseMarker,
    /// Anything else: code, strings, comments, whitespace.
    Fragment,
}

/// One token produced by a host tokenizer; offsets are relative to the
/// text handed to [`HostTokenizer::tokenize`].
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HostToken {
    pub kind: HostTokenKind,
    pub offset: usize,
    pub content: String,
}

impl HostToken {
    /// Convert into a lexer token as a child of a host-code token, shifting
    /// the offset into document coordinates.
    pub(crate) fn into_token(self, base: usize) -> Token {
        let kind = match self.kind {
            HostTokenKind::OpenMarker => TokenKind::HostOpen,
            HostTokenKind::CloseMarker => TokenKind::HostClose,
            HostTokenKind::Fragment => TokenKind::HostFragment,
        };
        Token::new(kind, base + self.offset, self.content)
    }
}

/// Pluggable tokenizer for embedded host-language code.
pub trait HostTokenizer {
    /// Tokenize `source`, which starts at an opening code marker. The
    /// returned list must cover the input contiguously from the start at
    /// least up to (and including) the first close marker, so the caller
    /// can reconstruct the exact byte span it consumed.
    fn tokenize(&self, source: &str) -> Result<Vec<HostToken>, LexError>;
}

#[derive(Logos, Debug, PartialEq)]
enum RawHostToken {
    #[token("<?=")]
    #[token("<?php")]
    #[token("<?")]
    OpenMarker,

    #[token("?>")]
    CloseMarker,

    #[regex(r"//[^\n]*")]
    #[regex(r"#[^\n]*")]
    #[regex(r"/\*([^*]|\*[^/])*\*?\*/")]
    Comment,

    #[regex(r#""([^"\\]|\\.)*""#)]
    #[regex(r"'([^'\\]|\\.)*'")]
    QuotedString,

    #[regex(r"[^<?/#'\x22]+")]
    Chunk,
}

/// Logos-based default host tokenizer.
#[derive(Debug, Default)]
pub struct EmbeddedHostTokenizer;

impl HostTokenizer for EmbeddedHostTokenizer {
    fn tokenize(&self, source: &str) -> Result<Vec<HostToken>, LexError> {
        let mut tokens: Vec<HostToken> = Vec::new();
        let mut lexer = RawHostToken::lexer(source);

        while let Some(result) = lexer.next() {
            let span = lexer.span();
            let kind = match result {
                Ok(RawHostToken::OpenMarker) => HostTokenKind::OpenMarker,
                Ok(RawHostToken::CloseMarker) => HostTokenKind::CloseMarker,
                // unmatched bytes degrade to fragments too
                Ok(_) | Err(_) => HostTokenKind::Fragment,
            };

            // merge adjacent fragments so the child list stays compact
            if kind == HostTokenKind::Fragment {
                if let Some(last) = tokens.last_mut() {
                    if last.kind == HostTokenKind::Fragment {
                        last.content.push_str(&source[span]);
                        continue;
                    }
                }
            }

            tokens.push(HostToken {
                kind,
                offset: span.start,
                content: source[span].to_string(),
            });
        }

        Ok(tokens)
    }
}
