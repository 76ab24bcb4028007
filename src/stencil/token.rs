//! Token types shared across the lexer stages and tooling.
//!
//!     Two kinds of items flow through the pipeline: a [`Byte`] is a single
//!     source character that no grammar has claimed yet, a [`Token`] is a
//!     classified span. A grammar stage receives a mixed stream of both and
//!     passes through whatever it does not recognize, so later stages (and
//!     ultimately the raw-text fold) still see every unclaimed byte.
//!
//! Source Preservation
//!
//!     Token content is the reconstructed source text of the covered span.
//!     Concatenating the content of every emitted item, in emission order,
//!     must reproduce the source exactly -- no byte is ever dropped or
//!     duplicated, including after a backtracking replay. Every stage in this
//!     crate is written against that invariant and the round-trip tests
//!     enforce it.

use std::fmt;

/// A single source character with its absolute byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Byte {
    /// The character itself.
    pub ch: char,
    /// Byte offset of the character in the source document.
    pub offset: usize,
}

/// Classification of a [`Token`].
///
/// Kinds are grouped by the grammar that produces them; the `Display`
/// implementation renders the grammar-qualified name used by tooling output
/// (e.g. `MARKUP:OPEN`, `DYNAMIC:BODY`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TokenKind {
    /// Literal text produced by the terminal raw-text fold.
    Raw,

    // Markup grammar
    MarkupOpen,
    MarkupOpenShort,
    MarkupClose,
    MarkupCloseShort,
    MarkupKeyword,
    MarkupEqual,
    MarkupAttribute,
    MarkupWhitespace,
    MarkupVerbatim,

    // Dynamic grammar (echo tags and directives)
    EchoOpen,
    EchoClose,
    RawEchoOpen,
    RawEchoClose,
    Body,
    BodyOpen,
    BodyClose,
    Directive,
    DirectiveKeyword,
    DirectiveWhitespace,

    // Declare option-list grammar
    DeclareKeyword,
    DeclareEqual,
    DeclareComma,
    DeclareQuoted,

    // Inline placeholder grammar
    InlineOpen,
    InlineClose,
    InlineName,
    InlineSeparator,
    InlineDefault,

    // Host-code grammar
    HostCode,
    HostOpen,
    HostClose,
    HostFragment,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Raw => "RAW",
            TokenKind::MarkupOpen => "MARKUP:OPEN",
            TokenKind::MarkupOpenShort => "MARKUP:OPEN_SHORT",
            TokenKind::MarkupClose => "MARKUP:CLOSE",
            TokenKind::MarkupCloseShort => "MARKUP:CLOSE_SHORT",
            TokenKind::MarkupKeyword => "MARKUP:KEYWORD",
            TokenKind::MarkupEqual => "MARKUP:EQUAL",
            TokenKind::MarkupAttribute => "MARKUP:ATTRIBUTE",
            TokenKind::MarkupWhitespace => "MARKUP:WHITESPACE",
            TokenKind::MarkupVerbatim => "MARKUP:VERBATIM",
            TokenKind::EchoOpen => "DYNAMIC:ECHO_OPEN",
            TokenKind::EchoClose => "DYNAMIC:ECHO_CLOSE",
            TokenKind::RawEchoOpen => "DYNAMIC:RAW_ECHO_OPEN",
            TokenKind::RawEchoClose => "DYNAMIC:RAW_ECHO_CLOSE",
            TokenKind::Body => "DYNAMIC:BODY",
            TokenKind::BodyOpen => "DYNAMIC:BODY_OPEN",
            TokenKind::BodyClose => "DYNAMIC:BODY_CLOSE",
            TokenKind::Directive => "DYNAMIC:DIRECTIVE",
            TokenKind::DirectiveKeyword => "DYNAMIC:KEYWORD",
            TokenKind::DirectiveWhitespace => "DYNAMIC:WHITESPACE",
            TokenKind::DeclareKeyword => "DECLARE:KEYWORD",
            TokenKind::DeclareEqual => "DECLARE:EQUAL",
            TokenKind::DeclareComma => "DECLARE:COMMA",
            TokenKind::DeclareQuoted => "DECLARE:QUOTED",
            TokenKind::InlineOpen => "INLINE:OPEN",
            TokenKind::InlineClose => "INLINE:CLOSE",
            TokenKind::InlineName => "INLINE:NAME",
            TokenKind::InlineSeparator => "INLINE:SEPARATOR",
            TokenKind::InlineDefault => "INLINE:DEFAULT",
            TokenKind::HostCode => "HOST:CODE",
            TokenKind::HostOpen => "HOST:OPEN",
            TokenKind::HostClose => "HOST:CLOSE",
            TokenKind::HostFragment => "HOST:FRAGMENT",
        };
        write!(f, "{}", name)
    }
}

/// A classified span of source text.
///
/// `children` is populated when a token was assembled from other tokens: the
/// host-code grammar attaches the host tokenizer's token list so a later
/// compile stage does not re-tokenize the block, and a markup keyword or
/// attribute that swallowed an upstream token (an echo tag inside a tag head)
/// keeps that token nested here.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Token {
    /// Classification of the span.
    pub kind: TokenKind,
    /// Byte offset of the first character of the span.
    pub offset: usize,
    /// Reconstructed source text of the span.
    pub content: String,
    /// Nested tokens folded into this one, if any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Token>,
}

impl Token {
    /// Create a token with no nested children.
    pub fn new(kind: TokenKind, offset: usize, content: impl Into<String>) -> Self {
        Token {
            kind,
            offset,
            content: content.into(),
            children: Vec::new(),
        }
    }

    /// Pack a run of accumulated lexemes into one token.
    ///
    /// Bytes contribute their character; tokens contribute their content and
    /// survive as children. The packed token starts at the offset of the
    /// first part.
    ///
    /// # Panics
    ///
    /// Panics if `parts` is empty; grammars only flush non-empty
    /// accumulators.
    pub fn pack(kind: TokenKind, parts: Vec<Lexeme>) -> Self {
        let offset = parts[0].offset();
        let mut token = Token::new(kind, offset, String::new());
        for part in parts {
            match part {
                Lexeme::Byte(b) => token.content.push(b.ch),
                Lexeme::Token(t) => {
                    token.content.push_str(&t.content);
                    token.children.push(t);
                }
            }
        }
        token
    }

    /// Byte offset one past the last character of this token's content.
    pub fn end_offset(&self) -> usize {
        self.offset + self.content.len()
    }
}

/// One item of a lexer stream: an unclaimed source character or a classified
/// token injected by an upstream stage.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Lexeme {
    Byte(Byte),
    Token(Token),
}

impl Lexeme {
    /// Byte offset of the start of this item.
    pub fn offset(&self) -> usize {
        match self {
            Lexeme::Byte(b) => b.offset,
            Lexeme::Token(t) => t.offset,
        }
    }

    pub fn as_byte(&self) -> Option<&Byte> {
        match self {
            Lexeme::Byte(b) => Some(b),
            Lexeme::Token(_) => None,
        }
    }
}

/// Reconstruct source text from a token stream.
///
/// The inverse of lexing: concatenates token content in order. Used by the
/// round-trip tests and the `check` subcommand of the CLI.
pub fn detokenize(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        out.push_str(&token.content);
    }
    out
}
