//! Property-based tests for the lexer pipeline
//!
//! These tests ensure the pipeline never panics and never loses bytes on
//! generated documents mixing template constructs with near-miss syntax.
//!
//! Escape sequences (`@@`, `@` before an open delimiter) are deliberately
//! absent from the generators: an escape consumes its escape character by
//! design, so escaped documents are the one case exact reconstruction does
//! not cover.

use proptest::prelude::*;
use stencil::{detokenize, DynamicGrammar, InlineGrammar, Lexer, MarkupGrammar, Token};

fn lex(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new();
    lexer
        .add_grammar(DynamicGrammar::new())
        .add_grammar(InlineGrammar)
        .add_grammar(MarkupGrammar::new());
    lexer.parse(source).unwrap()
}

/// Plain text without trigger or escape characters
fn text_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,;:!-]{0,12}"
}

/// Well-formed and near-miss template fragments
fn fragment_strategy() -> impl Strategy<Value = String> {
    let fixed = prop::sample::select(vec![
        "{{ $var }}",
        "{!! $raw !!}",
        "@if($cond)",
        "@endif",
        "${name|fallback}",
        "<tag attr=\"value\">",
        "</tag>",
        "<br/>",
        // near-misses that must degrade to raw text
        "{{ $open",
        "<tag attr=\"",
        "${broken",
        "<",
        ">",
        "{",
        "}",
        "\"",
    ])
    .prop_map(|fragment| fragment.to_string());

    prop_oneof![text_strategy(), fixed]
}

fn document_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(fragment_strategy(), 0..16).prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn test_lexing_never_panics(input in document_strategy()) {
        let _tokens = lex(&input);
    }

    #[test]
    fn test_stream_reconstructs_source(input in document_strategy()) {
        let tokens = lex(&input);
        prop_assert_eq!(detokenize(&tokens), input);
    }

    #[test]
    fn test_top_level_offsets_are_contiguous(input in document_strategy()) {
        let tokens = lex(&input);
        let mut end = 0usize;
        for token in &tokens {
            prop_assert_eq!(token.offset, end);
            end += token.content.len();
        }
        prop_assert_eq!(end, input.len());
    }

    #[test]
    fn test_lexing_is_deterministic(input in document_strategy()) {
        prop_assert_eq!(lex(&input), lex(&input));
    }

    #[test]
    fn test_plain_text_never_tokenizes(input in text_strategy()) {
        let tokens = lex(&input);
        prop_assert!(tokens.len() <= 1);
        if let Some(token) = tokens.first() {
            prop_assert_eq!(token.content.as_str(), input.as_str());
        }
    }
}
