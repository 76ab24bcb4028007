//! Inline placeholder bindings: `${name|default}`.
//!
//! A narrower binding form usable independently of the other grammars,
//! typically combined with the markup grammar. The name is restricted to
//! keyword characters; the optional default after `|` may contain quoted
//! segments scanned verbatim. Anything malformed replays as literal text.

use crate::stencil::buffer::Buffer;
use crate::stencil::error::LexError;
use crate::stencil::grammar::{is_keyword_char, Grammar};
use crate::stencil::token::{Lexeme, Token, TokenKind};

/// Recognizer for inline placeholder bindings.
#[derive(Debug, Default)]
pub struct InlineGrammar;

impl Grammar for InlineGrammar {
    fn parse(&self, src: &mut Buffer) -> Result<Vec<Lexeme>, LexError> {
        let mut out = Vec::new();

        while let Some(n) = src.next() {
            let triggered = n.as_byte().is_some_and(|b| b.ch == '$')
                && src.lookahead_byte(0) == Some('{');
            let Some(b) = n.as_byte().copied().filter(|_| triggered) else {
                out.push(n);
                continue;
            };

            match InlineAttempt::new().parse(src, b.offset)? {
                Some(tokens) => out.extend(tokens.into_iter().map(Lexeme::Token)),
                None => {
                    out.push(n);
                    src.replay(b.offset)?;
                }
            }
        }

        Ok(out)
    }
}

/// State for one placeholder recognition attempt.
struct InlineAttempt {
    tokens: Vec<Token>,
    name: Vec<Lexeme>,
    /// `Some` once the separator has been seen.
    default: Option<Vec<Lexeme>>,
}

impl InlineAttempt {
    fn new() -> Self {
        InlineAttempt {
            tokens: Vec::new(),
            name: Vec::new(),
            default: None,
        }
    }

    /// Scan a placeholder whose `$` sits at `offset`; the `{` is consumed
    /// here. Returns `None` on any invalidity.
    fn parse(mut self, src: &mut Buffer, offset: usize) -> Result<Option<Vec<Token>>, LexError> {
        self.tokens
            .push(Token::new(TokenKind::InlineOpen, offset, "${"));
        src.next(); // the '{' verified by the caller's lookahead

        let mut closed = false;
        while let Some(n) = src.next() {
            let Some(b) = n.as_byte().copied() else {
                // no other grammars are allowed inside a binding
                return Ok(None);
            };

            match b.ch {
                '"' | '\'' => {
                    let Some(default) = self.default.as_mut() else {
                        // quotes are not allowed in names
                        return Ok(None);
                    };
                    default.push(n);
                    while let Some(nn) = src.next() {
                        let close = nn.as_byte().is_some_and(|c| c.ch == b.ch);
                        default.push(nn);
                        if close {
                            break;
                        }
                    }
                }

                '}' => {
                    self.flush_name();
                    self.flush_default();
                    self.tokens
                        .push(Token::new(TokenKind::InlineClose, b.offset, "}"));
                    closed = true;
                    break;
                }

                '|' => {
                    self.flush_name();
                    self.flush_default();
                    self.tokens
                        .push(Token::new(TokenKind::InlineSeparator, b.offset, "|"));
                    self.default = Some(Vec::new());
                }

                _ => {
                    if let Some(default) = self.default.as_mut() {
                        // defaults allow arbitrary text
                        default.push(n);
                    } else if is_keyword_char(b.ch) {
                        self.name.push(n);
                    } else {
                        return Ok(None);
                    }
                }
            }
        }

        if closed && self.is_valid() {
            Ok(Some(self.tokens))
        } else {
            Ok(None)
        }
    }

    /// A binding needs a name; a separator needs a default; only one
    /// default is allowed.
    fn is_valid(&self) -> bool {
        if self.tokens.len() < 3 {
            return false;
        }

        let mut has_name = false;
        let mut has_default: Option<bool> = None;
        for token in &self.tokens {
            match token.kind {
                TokenKind::InlineName => has_name = true,
                TokenKind::InlineSeparator if has_default.is_none() => {
                    has_default = Some(false);
                }
                TokenKind::InlineDefault => {
                    if has_default == Some(true) {
                        // multiple default values
                        return false;
                    }
                    has_default = Some(true);
                }
                _ => {}
            }
        }

        has_name && has_default != Some(false)
    }

    fn flush_name(&mut self) {
        if self.name.is_empty() {
            return;
        }
        self.tokens.push(Token::pack(
            TokenKind::InlineName,
            std::mem::take(&mut self.name),
        ));
    }

    fn flush_default(&mut self) {
        let Some(default) = self.default.take() else {
            return;
        };
        if default.is_empty() {
            self.default = Some(default);
            return;
        }
        self.tokens
            .push(Token::pack(TokenKind::InlineDefault, default));
        self.default = Some(Vec::new());
    }
}
