//! Dynamic grammar: echo tags and directive calls.
//!
//!     Recognizes two bracket-delimited echo forms -- plain `{{ ... }}` and
//!     raw (unescaped) `{!! ... !!}` -- plus `@keyword(...)` directive
//!     calls. The delimiter sequences are not fixed: the reserved
//!     `@declare(...)` directive rewrites them for the remainder of the
//!     document, which is the one place runtime-mutable lexer configuration
//!     occurs. The configuration lives in the matchers created at the top
//!     of each `parse` call, so one document's declare never leaks into the
//!     next.
//!
//! Escaping
//!
//!     A doubled trigger (`@@`) or a trigger directly followed by an active
//!     open sequence (`@{{`) is an escape: the first trigger byte is
//!     suppressed and the following bytes re-scan normally, so `@{{ x }}`
//!     renders a literal `{{ x }}`.
//!
//! Unknown Directives
//!
//!     When a directive registry is attached, a keyword the registry does
//!     not know simply replays as literal text. Without a registry every
//!     well-formed directive is accepted and left for the AST stage to
//!     interpret.

mod braces;
mod directive;

pub use braces::BracesMatcher;
pub use directive::DirectiveAttempt;

use crate::stencil::buffer::Buffer;
use crate::stencil::error::LexError;
use crate::stencil::grammar::{DeclareGrammar, Grammar};
use crate::stencil::lexer::Lexer;
use crate::stencil::token::{Lexeme, TokenKind};

/// The character that triggers directive scanning.
pub const DIRECTIVE_CHAR: char = '@';

/// The one directive the lexer itself interprets.
pub const DECLARE_DIRECTIVE: &str = "declare";

/// External collaborator that decides whether a keyword is a known
/// directive.
pub trait DirectiveRegistry {
    fn has_directive(&self, keyword: &str) -> bool;
}

impl<F> DirectiveRegistry for F
where
    F: Fn(&str) -> bool,
{
    fn has_directive(&self, keyword: &str) -> bool {
        self(keyword)
    }
}

/// Recognizer for echo tags and directive calls.
#[derive(Default)]
pub struct DynamicGrammar {
    registry: Option<Box<dyn DirectiveRegistry>>,
}

impl DynamicGrammar {
    pub fn new() -> Self {
        DynamicGrammar { registry: None }
    }

    /// Attach a directive registry; unknown keywords then degrade to raw
    /// text instead of being tokenized.
    pub fn with_registry(registry: impl DirectiveRegistry + 'static) -> Self {
        DynamicGrammar {
            registry: Some(Box::new(registry)),
        }
    }

    fn knows_directive(&self, keyword: &str) -> bool {
        self.registry
            .as_ref()
            .map_or(true, |registry| registry.has_directive(keyword))
    }
}

impl Grammar for DynamicGrammar {
    fn parse(&self, src: &mut Buffer) -> Result<Vec<Lexeme>, LexError> {
        // per-pass delimiter configuration, mutated only by @declare
        let mut echo = BracesMatcher::new("{{", "}}", TokenKind::EchoOpen, TokenKind::EchoClose);
        let mut raw = BracesMatcher::new(
            "{!!",
            "!!}",
            TokenKind::RawEchoOpen,
            TokenKind::RawEchoClose,
        );

        let mut out = Vec::new();
        while let Some(n) = src.next() {
            let Some(b) = n.as_byte().copied() else {
                out.push(n);
                continue;
            };

            if b.ch == DIRECTIVE_CHAR {
                if echo.opens_ahead(src)
                    || raw.opens_ahead(src)
                    || src.lookahead_byte(0) == Some(DIRECTIVE_CHAR)
                {
                    // escaped sequence: suppress the trigger byte
                    if let Some(escaped) = src.next() {
                        out.push(escaped);
                    }
                    continue;
                }

                let mut directive = DirectiveAttempt::new(b.offset);
                if directive.parse(src)? {
                    let last_offset = directive.last_offset();

                    if directive.keyword().eq_ignore_ascii_case(DECLARE_DIRECTIVE) {
                        apply_declare(directive.body(), &mut echo, &mut raw)?;
                    } else if !self.knows_directive(directive.keyword()) {
                        // unknown directive, treat as plain text
                        out.push(n);
                        src.replay(b.offset)?;
                        continue;
                    } else {
                        out.extend(directive.into_tokens().into_iter().map(Lexeme::Token));
                    }

                    src.replay(last_offset)?;
                    continue;
                }

                src.replay(b.offset)?;
            }

            let matcher = if echo.starts(src, &b) {
                Some(&echo)
            } else if raw.starts(src, &b) {
                Some(&raw)
            } else {
                None
            };

            if let Some(matcher) = matcher {
                if let Some(tokens) = matcher.parse(src, &b)? {
                    out.extend(tokens.into_iter().map(Lexeme::Token));
                    continue;
                }
                src.replay(b.offset)?;
            }

            out.push(n);
        }

        Ok(out)
    }
}

/// Apply a `@declare(...)` body to the two echo matchers.
fn apply_declare(
    body: Option<&str>,
    echo: &mut BracesMatcher,
    raw: &mut BracesMatcher,
) -> Result<(), LexError> {
    let Some(body) = body else {
        return Ok(());
    };

    for (option, value) in fetch_options(body)? {
        let value = value.unwrap_or_default();
        let value = value.trim_matches(|ch: char| matches!(ch, '\'' | '"' | ' '));
        match option.as_str() {
            "syntax" => {
                echo.set_active(value != "off");
                raw.set_active(value != "off");
                if value == "default" {
                    echo.set_start_sequence("{{");
                    echo.set_end_sequence("}}");
                    raw.set_start_sequence("{!!");
                    raw.set_end_sequence("!!}");
                }
            }
            "open" => echo.set_start_sequence(value),
            "close" => echo.set_end_sequence(value),
            "openRaw" => raw.set_start_sequence(value),
            "closeRaw" => raw.set_end_sequence(value),
            // unrecognized options are ignored, forward-compatible
            _ => {}
        }
    }

    Ok(())
}

/// Pair up the declare body's option tokens.
///
/// A nested lexer runs the option-list grammar over the body text; keyword
/// and quoted tokens alternate into key/value pairs, commas flush a key
/// with no value, anything else is ignored.
fn fetch_options(body: &str) -> Result<Vec<(String, Option<String>)>, LexError> {
    let mut lexer = Lexer::new();
    lexer.add_grammar(DeclareGrammar);

    let mut options = Vec::new();
    let mut keyword: Option<String> = None;

    for token in lexer.parse(body)? {
        let value = match token.kind {
            TokenKind::DeclareKeyword => token.content,
            TokenKind::DeclareQuoted => {
                let quote = token.content.chars().next().unwrap_or('"');
                token.content.trim_matches(quote).to_string()
            }
            TokenKind::DeclareComma => {
                if let Some(key) = keyword.take() {
                    options.push((key, None));
                }
                continue;
            }
            _ => continue,
        };

        match keyword.take() {
            Some(key) => options.push((key, Some(value))),
            None => keyword = Some(value),
        }
    }

    Ok(options)
}
