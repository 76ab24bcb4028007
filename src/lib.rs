//! # stencil
//!
//! A backtracking lexer for mixed-syntax template documents.
//!
//! A template document interleaves literal markup with embedded host-language
//! code blocks, echo tags, directive calls and inline placeholder bindings.
//! Each of these micro-grammars is implemented as a separate [`Grammar`]
//! stage; the [`Lexer`] runs the stages in order over a shared, replayable
//! [`Buffer`] and produces one ordered token stream for a downstream AST
//! builder.
//!
//! The central contract of the whole crate is losslessness: concatenating the
//! content of every emitted token, in order, reproduces the source text
//! exactly. Near-miss syntax (an unterminated tag, an unknown directive, a
//! malformed placeholder) never errors -- the offending grammar replays the
//! buffer and the bytes degrade to raw text.

#![allow(rustdoc::invalid_html_tags)]

pub mod stencil;

pub use stencil::buffer::Buffer;
pub use stencil::error::LexError;
pub use stencil::grammar::{
    DeclareGrammar, DirectiveRegistry, DynamicGrammar, Grammar, HostCodeGrammar, InlineGrammar,
    MarkupGrammar, RawTextGrammar,
};
pub use stencil::host::{EmbeddedHostTokenizer, HostToken, HostTokenKind, HostTokenizer};
pub use stencil::lexer::Lexer;
pub use stencil::token::{detokenize, Byte, Lexeme, Token, TokenKind};
