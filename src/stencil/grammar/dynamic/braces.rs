//! Bracket-pair echo matcher.
//!
//! One `BracesMatcher` handles one echo form: a configurable open/close
//! sequence pair plus an active flag. The dynamic grammar owns two of these
//! (plain and raw echo) and the `declare` directive rewrites their
//! configuration mid-document.

use crate::stencil::buffer::Buffer;
use crate::stencil::error::LexError;
use crate::stencil::token::{Byte, Lexeme, Token, TokenKind};

#[derive(Debug, Clone)]
pub struct BracesMatcher {
    start: String,
    end: String,
    open_kind: TokenKind,
    close_kind: TokenKind,
    active: bool,
}

impl BracesMatcher {
    pub fn new(start: &str, end: &str, open_kind: TokenKind, close_kind: TokenKind) -> Self {
        BracesMatcher {
            start: start.to_string(),
            end: end.to_string(),
            open_kind,
            close_kind,
            active: true,
        }
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn set_start_sequence(&mut self, start: &str) {
        self.start = start.to_string();
    }

    pub fn set_end_sequence(&mut self, end: &str) {
        self.end = end.to_string();
    }

    /// True when the just-issued byte begins the open sequence and the
    /// lookahead completes it.
    pub fn starts(&self, src: &Buffer, b: &Byte) -> bool {
        if !self.active {
            return false;
        }
        let mut chars = self.start.chars();
        match chars.next() {
            Some(first) if first == b.ch => {}
            _ => return false,
        }
        chars
            .enumerate()
            .all(|(i, ch)| src.lookahead_byte(i) == Some(ch))
    }

    /// True when the upcoming (not yet issued) bytes spell the open
    /// sequence. Used for escape detection after the directive trigger.
    pub fn opens_ahead(&self, src: &Buffer) -> bool {
        self.active
            && !self.start.is_empty()
            && self
                .start
                .chars()
                .enumerate()
                .all(|(i, ch)| src.lookahead_byte(i) == Some(ch))
    }

    /// True when the just-issued byte begins the close sequence.
    fn ends(&self, src: &Buffer, b: &Byte) -> bool {
        let mut chars = self.end.chars();
        match chars.next() {
            Some(first) if first == b.ch => {}
            _ => return false,
        }
        chars
            .enumerate()
            .all(|(i, ch)| src.lookahead_byte(i) == Some(ch))
    }

    /// Scan an echo construct whose open sequence begins at `b`.
    ///
    /// The body honors single- and double-quoted strings, so a close
    /// sequence inside quotes stays part of the body. Returns `None` when
    /// the close sequence never arrives; the caller replays.
    pub fn parse(&self, src: &mut Buffer, b: &Byte) -> Result<Option<Vec<Token>>, LexError> {
        let open = Token::new(self.open_kind, b.offset, self.start.clone());
        // consume the rest of the open sequence, verified by starts()
        for _ in self.start.chars().skip(1) {
            src.next();
        }

        let mut body: Vec<Lexeme> = Vec::new();
        while let Some(n) = src.next() {
            let Some(nb) = n.as_byte().copied() else {
                body.push(n);
                continue;
            };

            match nb.ch {
                '"' | '\'' => {
                    body.push(n);
                    while let Some(nn) = src.next() {
                        let close = nn.as_byte().is_some_and(|c| c.ch == nb.ch);
                        body.push(nn);
                        if close {
                            break;
                        }
                    }
                }

                _ if self.ends(src, &nb) => {
                    let close = Token::new(self.close_kind, nb.offset, self.end.clone());
                    for _ in self.end.chars().skip(1) {
                        src.next();
                    }

                    let mut tokens = vec![open];
                    if !body.is_empty() {
                        tokens.push(Token::pack(TokenKind::Body, body));
                    }
                    tokens.push(close);
                    return Ok(Some(tokens));
                }

                _ => body.push(n),
            }
        }

        // unterminated echo is ambiguous with plain text
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> BracesMatcher {
        BracesMatcher::new("{{", "}}", TokenKind::EchoOpen, TokenKind::EchoClose)
    }

    fn first_byte(src: &mut Buffer) -> Byte {
        match src.next() {
            Some(Lexeme::Byte(b)) => b,
            other => panic!("expected byte, got {:?}", other),
        }
    }

    #[test]
    fn test_starts_requires_full_open_sequence() {
        let mut src = Buffer::from_source("{x");
        let b = first_byte(&mut src);
        assert!(!matcher().starts(&src, &b));
    }

    #[test]
    fn test_inactive_matcher_never_starts() {
        let mut src = Buffer::from_source("{{ x }}");
        let b = first_byte(&mut src);
        let mut m = matcher();
        m.set_active(false);
        assert!(!m.starts(&src, &b));
    }

    #[test]
    fn test_parse_emits_open_body_close() {
        let mut src = Buffer::from_source("{{ x }}");
        let b = first_byte(&mut src);
        let tokens = matcher().parse(&mut src, &b).unwrap().unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::new(TokenKind::EchoOpen, 0, "{{"),
                Token::new(TokenKind::Body, 2, " x "),
                Token::new(TokenKind::EchoClose, 5, "}}"),
            ]
        );
    }

    #[test]
    fn test_close_sequence_inside_quotes_stays_in_body() {
        let mut src = Buffer::from_source("{{ \"}}\" }}");
        let b = first_byte(&mut src);
        let tokens = matcher().parse(&mut src, &b).unwrap().unwrap();
        assert_eq!(tokens[1], Token::new(TokenKind::Body, 2, " \"}}\" "));
    }

    #[test]
    fn test_unterminated_echo_rejects() {
        let mut src = Buffer::from_source("{{ x ");
        let b = first_byte(&mut src);
        assert_eq!(matcher().parse(&mut src, &b).unwrap(), None);
    }
}
