//! Fluent assertion API for token streams
//!
//! # Lexer Testing Guidelines
//!
//! Token-stream tests must assert the actual shape of the stream, not
//! generalities. Counting tokens alone tells you nothing when a grammar
//! mis-classifies a span; the kind, offset and content of each token is
//! what the AST stage depends on.
//!
//! This module provides two tools that should be used together:
//!
//! 1. **[assert_tokens](fn@assert_tokens)** - For comprehensive stream
//!    verification with contextual failure messages
//! 2. **round_trips** - Every stream test should also assert the stream
//!    reconstructs its source, because losslessness is the one invariant
//!    every grammar must uphold
//!
//! ```rust-example
//! use crate::stencil::testing::assert_tokens;
//!
//! assert_tokens(&tokens)
//!     .round_trips("<a>{{ $x }}</a>")
//!     .count(9)
//!     .token(3, |t| {
//!         t.kind(TokenKind::EchoOpen).offset(3).content("{{")
//!     });
//! ```

use crate::stencil::token::{detokenize, Token, TokenKind};

/// Create an assertion builder for a token stream
pub fn assert_tokens(tokens: &[Token]) -> TokensAssertion<'_> {
    TokensAssertion { tokens }
}

pub struct TokensAssertion<'a> {
    tokens: &'a [Token],
}

impl<'a> TokensAssertion<'a> {
    /// Assert the number of top-level tokens
    pub fn count(self, expected: usize) -> Self {
        assert_eq!(
            self.tokens.len(),
            expected,
            "Expected {} tokens, found {}: [{}]",
            expected,
            self.tokens.len(),
            summarize(self.tokens)
        );
        self
    }

    /// Assert the stream reconstructs the given source exactly
    pub fn round_trips(self, source: &str) -> Self {
        let rebuilt = detokenize(self.tokens);
        assert_eq!(
            rebuilt, source,
            "Stream does not reconstruct its source: [{}]",
            summarize(self.tokens)
        );
        self
    }

    /// Assert on a specific token by index
    pub fn token<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(TokenAssertion<'a>) -> TokenAssertion<'a>,
    {
        assert!(
            index < self.tokens.len(),
            "Token index {} out of bounds (stream has {} tokens: [{}])",
            index,
            self.tokens.len(),
            summarize(self.tokens)
        );
        assertion(TokenAssertion {
            token: &self.tokens[index],
            context: format!("tokens[{}]", index),
        });
        self
    }
}

pub struct TokenAssertion<'a> {
    token: &'a Token,
    context: String,
}

impl<'a> TokenAssertion<'a> {
    pub fn kind(self, expected: TokenKind) -> Self {
        assert_eq!(
            self.token.kind, expected,
            "{}: expected kind {}, found {}",
            self.context, expected, self.token.kind
        );
        self
    }

    pub fn offset(self, expected: usize) -> Self {
        assert_eq!(
            self.token.offset, expected,
            "{}: expected offset {}, found {}",
            self.context, expected, self.token.offset
        );
        self
    }

    pub fn content(self, expected: &str) -> Self {
        assert_eq!(
            self.token.content, expected,
            "{}: expected content {:?}, found {:?}",
            self.context, expected, self.token.content
        );
        self
    }

    pub fn child_count(self, expected: usize) -> Self {
        assert_eq!(
            self.token.children.len(),
            expected,
            "{}: expected {} children, found {}: [{}]",
            self.context,
            expected,
            self.token.children.len(),
            summarize(&self.token.children)
        );
        self
    }

    /// Assert on a child token by index
    pub fn child<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(TokenAssertion<'a>) -> TokenAssertion<'a>,
    {
        assert!(
            index < self.token.children.len(),
            "{}: child index {} out of bounds ({} children)",
            self.context,
            index,
            self.token.children.len()
        );
        assertion(TokenAssertion {
            token: &self.token.children[index],
            context: format!("{}.children[{}]", self.context, index),
        });
        self
    }
}

fn summarize(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| format!("{}@{}", t.kind, t.offset))
        .collect::<Vec<_>>()
        .join(", ")
}
