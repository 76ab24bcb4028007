//! Directive-call matcher: `@keyword`, optionally followed by a
//! balanced-paren body honoring quoted strings.

use crate::stencil::buffer::Buffer;
use crate::stencil::error::LexError;
use crate::stencil::grammar::is_keyword_char;
use crate::stencil::token::{Lexeme, Token, TokenKind};

/// State for one directive recognition attempt.
pub struct DirectiveAttempt {
    tokens: Vec<Token>,
    name: Vec<Lexeme>,
    body: Vec<Lexeme>,
    has_whitespace: bool,
}

impl DirectiveAttempt {
    /// Start an attempt at the trigger byte's offset; the trigger itself is
    /// already consumed by the caller.
    pub fn new(offset: usize) -> Self {
        DirectiveAttempt {
            tokens: vec![Token::new(TokenKind::Directive, offset, "@")],
            name: Vec::new(),
            body: Vec::new(),
            has_whitespace: false,
        }
    }

    /// Scan the directive. Returns `true` on acceptance; the caller then
    /// replays the buffer to [`last_offset`](Self::last_offset) and takes
    /// the tokens. On rejection the caller replays to the trigger.
    pub fn parse(&mut self, src: &mut Buffer) -> Result<bool, LexError> {
        while let Some(n) = src.next() {
            let Some(b) = n.as_byte().copied() else {
                // no other grammars are allowed inside a directive head
                break;
            };

            match b.ch {
                '(' => {
                    self.flush_name();
                    self.tokens
                        .push(Token::new(TokenKind::BodyOpen, b.offset, "("));
                    return self.parse_body(src);
                }

                ch if ch.is_whitespace() => {
                    self.has_whitespace = true;
                    if !self.name.is_empty() {
                        self.flush_name();
                        self.tokens.push(Token::new(
                            TokenKind::DirectiveWhitespace,
                            b.offset,
                            ch.to_string(),
                        ));
                    } else if self.last_is_whitespace() {
                        if let Some(last) = self.tokens.last_mut() {
                            last.content.push(ch);
                        }
                    } else {
                        // whitespace straight after the trigger
                        return Ok(false);
                    }
                }

                _ if self.has_whitespace => {
                    // first non-whitespace after the gap ends the directive
                    return Ok(self.finalize());
                }

                ch if !is_keyword_char(ch) => {
                    self.flush_name();
                    return Ok(self.finalize());
                }

                _ => self.name.push(n),
            }
        }

        self.flush_name();
        Ok(self.finalize())
    }

    /// Scan the parenthesized body; `(` already consumed, nesting level 1.
    fn parse_body(&mut self, src: &mut Buffer) -> Result<bool, LexError> {
        let mut level = 1u32;

        while let Some(n) = src.next() {
            let Some(b) = n.as_byte().copied() else {
                self.flush_body();
                return Ok(self.finalize());
            };

            match b.ch {
                '"' | '\'' => {
                    self.body.push(n);
                    while let Some(nn) = src.next() {
                        let close = nn.as_byte().is_some_and(|c| c.ch == b.ch);
                        self.body.push(nn);
                        if close {
                            break;
                        }
                    }
                }

                '(' => {
                    self.body.push(n);
                    level += 1;
                }

                ')' => {
                    level -= 1;
                    if level == 0 {
                        self.flush_body();
                        self.tokens
                            .push(Token::new(TokenKind::BodyClose, b.offset, ")"));
                        return Ok(self.finalize());
                    }
                    self.body.push(n);
                }

                _ => self.body.push(n),
            }
        }

        // end of input with the body still open; finalize rejects the
        // unbalanced attempt
        Ok(self.finalize())
    }

    /// Trim trailing whitespace tokens, then check shape: a keyword is
    /// required and a body open must have its close.
    fn finalize(&mut self) -> bool {
        while self
            .tokens
            .last()
            .is_some_and(|t| t.kind == TokenKind::DirectiveWhitespace)
        {
            self.tokens.pop();
        }

        let mut body_open = false;
        let mut has_keyword = false;
        for token in &self.tokens {
            match token.kind {
                TokenKind::BodyOpen => body_open = true,
                TokenKind::BodyClose => body_open = false,
                TokenKind::DirectiveKeyword => has_keyword = true,
                _ => {}
            }
        }

        has_keyword && !body_open
    }

    /// The directive keyword.
    pub fn keyword(&self) -> &str {
        self.tokens
            .iter()
            .find(|t| t.kind == TokenKind::DirectiveKeyword)
            .map(|t| t.content.as_str())
            .unwrap_or_default()
    }

    /// The parenthesized body content, without the parens.
    pub fn body(&self) -> Option<&str> {
        self.tokens
            .iter()
            .find(|t| t.kind == TokenKind::Body)
            .map(|t| t.content.as_str())
    }

    /// Offset of the last character covered by the directive's tokens;
    /// replaying here resumes scanning right after the directive.
    pub fn last_offset(&self) -> usize {
        self.tokens
            .last()
            .map(|t| t.end_offset().saturating_sub(1))
            .unwrap_or_default()
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    fn last_is_whitespace(&self) -> bool {
        self.tokens
            .last()
            .is_some_and(|t| t.kind == TokenKind::DirectiveWhitespace)
    }

    fn flush_name(&mut self) {
        if self.name.is_empty() {
            return;
        }
        self.tokens.push(Token::pack(
            TokenKind::DirectiveKeyword,
            std::mem::take(&mut self.name),
        ));
    }

    fn flush_body(&mut self) {
        if self.body.is_empty() {
            return;
        }
        self.tokens
            .push(Token::pack(TokenKind::Body, std::mem::take(&mut self.body)));
    }
}
