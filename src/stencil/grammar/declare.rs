//! Option-list grammar for the `declare` directive body.
//!
//! Tokenizes comma-separated `key: value`, `key = value` or `key "quoted"`
//! pairs into keyword, equal, comma and quoted tokens. Anything else (the
//! separating whitespace, stray punctuation) passes through as bytes; the
//! option-pairing stage simply ignores the resulting raw tokens, which is
//! what keeps unknown syntax forward-compatible.

use crate::stencil::buffer::Buffer;
use crate::stencil::error::LexError;
use crate::stencil::grammar::Grammar;
use crate::stencil::token::{Lexeme, Token, TokenKind};

fn is_option_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-')
}

/// Tokenizer for declare option lists.
#[derive(Debug, Default)]
pub struct DeclareGrammar;

impl Grammar for DeclareGrammar {
    fn parse(&self, src: &mut Buffer) -> Result<Vec<Lexeme>, LexError> {
        let mut out = Vec::new();
        let mut keyword: Vec<Lexeme> = Vec::new();

        let flush = |keyword: &mut Vec<Lexeme>, out: &mut Vec<Lexeme>| {
            if !keyword.is_empty() {
                out.push(Lexeme::Token(Token::pack(
                    TokenKind::DeclareKeyword,
                    std::mem::take(keyword),
                )));
            }
        };

        while let Some(n) = src.next() {
            let Some(b) = n.as_byte().copied() else {
                flush(&mut keyword, &mut out);
                out.push(n);
                continue;
            };

            match b.ch {
                '"' | '\'' => {
                    flush(&mut keyword, &mut out);
                    let mut quoted = vec![n];
                    while let Some(nn) = src.next() {
                        let close = nn.as_byte().is_some_and(|c| c.ch == b.ch);
                        quoted.push(nn);
                        if close {
                            break;
                        }
                    }
                    out.push(Lexeme::Token(Token::pack(TokenKind::DeclareQuoted, quoted)));
                }

                '=' | ':' => {
                    flush(&mut keyword, &mut out);
                    out.push(Lexeme::Token(Token::new(
                        TokenKind::DeclareEqual,
                        b.offset,
                        b.ch.to_string(),
                    )));
                }

                ',' => {
                    flush(&mut keyword, &mut out);
                    out.push(Lexeme::Token(Token::new(
                        TokenKind::DeclareComma,
                        b.offset,
                        ",",
                    )));
                }

                ch if is_option_char(ch) => keyword.push(n),

                _ => {
                    flush(&mut keyword, &mut out);
                    out.push(n);
                }
            }
        }

        flush(&mut keyword, &mut out);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stencil::lexer::Lexer;

    fn lex(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new();
        lexer.add_grammar(DeclareGrammar);
        lexer.parse(source).unwrap()
    }

    #[test]
    fn test_keyword_equal_quoted() {
        assert_eq!(
            lex("syntax = \"off\""),
            vec![
                Token::new(TokenKind::DeclareKeyword, 0, "syntax"),
                Token::new(TokenKind::Raw, 6, " "),
                Token::new(TokenKind::DeclareEqual, 7, "="),
                Token::new(TokenKind::Raw, 8, " "),
                Token::new(TokenKind::DeclareQuoted, 9, "\"off\""),
            ]
        );
    }

    #[test]
    fn test_comma_separated_pairs() {
        assert_eq!(
            lex("open:'[[',close:']]'"),
            vec![
                Token::new(TokenKind::DeclareKeyword, 0, "open"),
                Token::new(TokenKind::DeclareEqual, 4, ":"),
                Token::new(TokenKind::DeclareQuoted, 5, "'[['"),
                Token::new(TokenKind::DeclareComma, 9, ","),
                Token::new(TokenKind::DeclareKeyword, 10, "close"),
                Token::new(TokenKind::DeclareEqual, 15, ":"),
                Token::new(TokenKind::DeclareQuoted, 16, "']]'"),
            ]
        );
    }

    #[test]
    fn test_unquoted_value() {
        assert_eq!(
            lex("syntax=off"),
            vec![
                Token::new(TokenKind::DeclareKeyword, 0, "syntax"),
                Token::new(TokenKind::DeclareEqual, 6, "="),
                Token::new(TokenKind::DeclareKeyword, 7, "off"),
            ]
        );
    }
}
