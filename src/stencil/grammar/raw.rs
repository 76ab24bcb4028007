//! Terminal raw-text fold.
//!
//! Coalesces every run of unclaimed bytes into a single `Raw` token and
//! passes classified tokens through untouched. This is always the last
//! stage of the pipeline, so the lexer's output contains only tokens.

use crate::stencil::buffer::Buffer;
use crate::stencil::error::LexError;
use crate::stencil::grammar::Grammar;
use crate::stencil::token::{Lexeme, Token, TokenKind};

/// Folds leftover bytes into literal-text tokens.
#[derive(Debug, Default)]
pub struct RawTextGrammar;

impl Grammar for RawTextGrammar {
    fn parse(&self, src: &mut Buffer) -> Result<Vec<Lexeme>, LexError> {
        let mut out = Vec::new();
        let mut run: Vec<Lexeme> = Vec::new();

        while let Some(n) = src.next() {
            match n {
                Lexeme::Byte(_) => run.push(n),
                Lexeme::Token(_) => {
                    if !run.is_empty() {
                        out.push(Lexeme::Token(Token::pack(
                            TokenKind::Raw,
                            std::mem::take(&mut run),
                        )));
                    }
                    out.push(n);
                }
            }
        }

        if !run.is_empty() {
            out.push(Lexeme::Token(Token::pack(TokenKind::Raw, run)));
        }

        Ok(out)
    }
}
