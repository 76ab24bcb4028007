//! The staged lexer driver.
//!
//!     A `Lexer` owns an ordered list of grammar stages. Parsing runs the
//!     source through each stage in turn: the first stage reads the raw
//!     characters, every later stage reads the previous stage's output, and
//!     a final raw-text fold packs any bytes no stage claimed into plain
//!     text tokens. Stage order matters: a stage only sees constructs the
//!     earlier stages left as bytes, and its tokens pass through the later
//!     stages opaquely.

use crate::stencil::buffer::Buffer;
use crate::stencil::error::LexError;
use crate::stencil::grammar::{Grammar, RawTextGrammar};
use crate::stencil::token::{Lexeme, Token, TokenKind};

/// A configurable, multi-stage template lexer.
#[derive(Default)]
pub struct Lexer {
    grammars: Vec<Box<dyn Grammar>>,
}

impl Lexer {
    /// A lexer with no stages; it packs the whole document into raw text.
    pub fn new() -> Self {
        Lexer {
            grammars: Vec::new(),
        }
    }

    /// Append a grammar stage. Stages run in insertion order.
    pub fn add_grammar(&mut self, grammar: impl Grammar + 'static) -> &mut Self {
        self.grammars.push(Box::new(grammar));
        self
    }

    /// Tokenize a source document.
    pub fn parse(&self, source: &str) -> Result<Vec<Token>, LexError> {
        let mut items: Vec<Lexeme> = {
            let mut src = Buffer::from_source(source);
            src.drain()
        };

        for grammar in &self.grammars {
            items = grammar.parse(&mut Buffer::new(items))?;
        }
        items = RawTextGrammar.parse(&mut Buffer::new(items))?;

        Ok(items
            .into_iter()
            .map(|item| match item {
                Lexeme::Token(token) => token,
                // the raw fold leaves no loose bytes, but stay total
                Lexeme::Byte(b) => Token::new(TokenKind::Raw, b.offset, b.ch.to_string()),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stencil::grammar::{DynamicGrammar, InlineGrammar, MarkupGrammar};
    use crate::stencil::token::detokenize;

    #[test]
    fn test_empty_source() {
        assert_eq!(Lexer::new().parse("").unwrap(), vec![]);
    }

    #[test]
    fn test_no_stages_packs_raw_text() {
        assert_eq!(
            Lexer::new().parse("hello").unwrap(),
            vec![Token::new(TokenKind::Raw, 0, "hello")]
        );
    }

    #[test]
    fn test_stages_compose() {
        let mut lexer = Lexer::new();
        lexer
            .add_grammar(DynamicGrammar::new())
            .add_grammar(InlineGrammar)
            .add_grammar(MarkupGrammar::new());

        let tokens = lexer.parse("<a href=\"${url}\">{{ $title }}</a>").unwrap();
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::MarkupOpen,
                TokenKind::MarkupKeyword,
                TokenKind::MarkupWhitespace,
                TokenKind::MarkupKeyword,
                TokenKind::MarkupEqual,
                TokenKind::MarkupAttribute,
                TokenKind::MarkupClose,
                TokenKind::EchoOpen,
                TokenKind::Body,
                TokenKind::EchoClose,
                TokenKind::MarkupOpenShort,
                TokenKind::MarkupKeyword,
                TokenKind::MarkupClose,
            ]
        );

        // the placeholder survives as children of the attribute token
        let attribute = &tokens[5];
        assert_eq!(attribute.content, "\"${url}\"");
        assert_eq!(attribute.children[0].kind, TokenKind::InlineOpen);
    }

    #[test]
    fn test_composed_stages_round_trip() {
        let mut lexer = Lexer::new();
        lexer
            .add_grammar(DynamicGrammar::new())
            .add_grammar(InlineGrammar)
            .add_grammar(MarkupGrammar::new());

        let source = "<p class=\"x\">@foreach($items as $i) {{ $i }} @endforeach</p>";
        assert_eq!(detokenize(&lexer.parse(source).unwrap()), source);
    }
}
