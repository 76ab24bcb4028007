//! Integration tests for the markup tag grammar
//!
//! These tests pin the exact token stream (kind, offset, content) produced
//! for tag heads, malformed heads and verbatim element bodies, since the
//! AST stage depends on all three fields.

use rstest::rstest;
use stencil::stencil::testing::assert_tokens;
use stencil::{Lexer, MarkupGrammar, Token, TokenKind};

fn lex(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new();
    lexer.add_grammar(MarkupGrammar::new());
    lexer.parse(source).unwrap()
}

#[test]
fn test_raw() {
    assert_eq!(lex("raw body"), vec![Token::new(TokenKind::Raw, 0, "raw body")]);
}

#[test]
fn test_tag_offset() {
    assert_eq!(
        lex("<<tag>"),
        vec![
            Token::new(TokenKind::Raw, 0, "<"),
            Token::new(TokenKind::MarkupOpen, 1, "<"),
            Token::new(TokenKind::MarkupKeyword, 2, "tag"),
            Token::new(TokenKind::MarkupClose, 5, ">"),
        ]
    );
}

#[test]
fn test_tag_close_short() {
    assert_eq!(
        lex("<tag/>"),
        vec![
            Token::new(TokenKind::MarkupOpen, 0, "<"),
            Token::new(TokenKind::MarkupKeyword, 1, "tag"),
            Token::new(TokenKind::MarkupCloseShort, 4, "/>"),
        ]
    );
}

#[test]
fn test_tag_attribute() {
    assert_eq!(
        lex("<tag param=\"value\"/>"),
        vec![
            Token::new(TokenKind::MarkupOpen, 0, "<"),
            Token::new(TokenKind::MarkupKeyword, 1, "tag"),
            Token::new(TokenKind::MarkupWhitespace, 4, " "),
            Token::new(TokenKind::MarkupKeyword, 5, "param"),
            Token::new(TokenKind::MarkupEqual, 10, "="),
            Token::new(TokenKind::MarkupAttribute, 11, "\"value\""),
            Token::new(TokenKind::MarkupCloseShort, 18, "/>"),
        ]
    );
}

// every malformed head degrades to one raw token covering the whole input
#[rstest]
#[case("<tag param=\"value\"")]
#[case("<tag param=\"value\"/")]
#[case("<tag param=\"value\"<>")]
#[case("<#tag param=\"value\">")]
#[case("<tag param=\"value")]
#[case("<>")]
#[case("<\"\">")]
#[case("<=>")]
#[case("< \"=\" keyword >")]
fn test_malformed_head_degrades_to_raw(#[case] source: &str) {
    assert_eq!(lex(source), vec![Token::new(TokenKind::Raw, 0, source)]);
}

#[test]
fn test_malformed_head_followed_by_valid_tag() {
    assert_eq!(
        lex("<tag param=\"value\"<tag>"),
        vec![
            Token::new(TokenKind::Raw, 0, "<tag param=\"value\""),
            Token::new(TokenKind::MarkupOpen, 18, "<"),
            Token::new(TokenKind::MarkupKeyword, 19, "tag"),
            Token::new(TokenKind::MarkupClose, 22, ">"),
        ]
    );
}

#[test]
fn test_bare_attribute_keyword() {
    assert_eq!(
        lex("<a href=\"x\" disabled>"),
        vec![
            Token::new(TokenKind::MarkupOpen, 0, "<"),
            Token::new(TokenKind::MarkupKeyword, 1, "a"),
            Token::new(TokenKind::MarkupWhitespace, 2, " "),
            Token::new(TokenKind::MarkupKeyword, 3, "href"),
            Token::new(TokenKind::MarkupEqual, 7, "="),
            Token::new(TokenKind::MarkupAttribute, 8, "\"x\""),
            Token::new(TokenKind::MarkupWhitespace, 11, " "),
            Token::new(TokenKind::MarkupKeyword, 12, "disabled"),
            Token::new(TokenKind::MarkupClose, 20, ">"),
        ]
    );
}

#[test]
fn test_tag_whitespace() {
    assert_eq!(
        lex("< tag >"),
        vec![
            Token::new(TokenKind::MarkupOpen, 0, "<"),
            Token::new(TokenKind::MarkupWhitespace, 1, " "),
            Token::new(TokenKind::MarkupKeyword, 2, "tag"),
            Token::new(TokenKind::MarkupWhitespace, 5, " "),
            Token::new(TokenKind::MarkupClose, 6, ">"),
        ]
    );
}

#[test]
fn test_double_whitespace() {
    assert_eq!(
        lex("<  tag  >"),
        vec![
            Token::new(TokenKind::MarkupOpen, 0, "<"),
            Token::new(TokenKind::MarkupWhitespace, 1, "  "),
            Token::new(TokenKind::MarkupKeyword, 3, "tag"),
            Token::new(TokenKind::MarkupWhitespace, 6, "  "),
            Token::new(TokenKind::MarkupClose, 8, ">"),
        ]
    );
}

#[test]
fn test_tag_open_short() {
    assert_eq!(
        lex("</tag>"),
        vec![
            Token::new(TokenKind::MarkupOpenShort, 0, "</"),
            Token::new(TokenKind::MarkupKeyword, 2, "tag"),
            Token::new(TokenKind::MarkupClose, 5, ">"),
        ]
    );
}

#[test]
fn test_tag_with_body() {
    assert_tokens(&lex("<tag>body</tag>"))
        .round_trips("<tag>body</tag>")
        .count(7)
        .token(3, |t| t.kind(TokenKind::Raw).offset(5).content("body"));
}

#[test]
fn test_script_quoted_tag_stays_verbatim() {
    assert_eq!(
        lex("<script>alert(\"<a>\");</script>"),
        vec![
            Token::new(TokenKind::MarkupOpen, 0, "<"),
            Token::new(TokenKind::MarkupKeyword, 1, "script"),
            Token::new(TokenKind::MarkupClose, 7, ">"),
            Token::new(TokenKind::MarkupVerbatim, 8, "alert(\"<a>\");"),
            Token::new(TokenKind::MarkupOpenShort, 21, "</"),
            Token::new(TokenKind::MarkupKeyword, 23, "script"),
            Token::new(TokenKind::MarkupClose, 29, ">"),
        ]
    );
}

#[test]
fn test_script_quoted_closing_tag_stays_verbatim() {
    assert_eq!(
        lex("<script>alert(\"</script>\");</script>"),
        vec![
            Token::new(TokenKind::MarkupOpen, 0, "<"),
            Token::new(TokenKind::MarkupKeyword, 1, "script"),
            Token::new(TokenKind::MarkupClose, 7, ">"),
            Token::new(TokenKind::MarkupVerbatim, 8, "alert(\"</script>\");"),
            Token::new(TokenKind::MarkupOpenShort, 27, "</"),
            Token::new(TokenKind::MarkupKeyword, 29, "script"),
            Token::new(TokenKind::MarkupClose, 35, ">"),
        ]
    );
}

#[test]
fn test_script_line_comment_ends_at_closing_tag() {
    assert_eq!(
        lex("<script>alert(\"</script>\"); //hello </script>"),
        vec![
            Token::new(TokenKind::MarkupOpen, 0, "<"),
            Token::new(TokenKind::MarkupKeyword, 1, "script"),
            Token::new(TokenKind::MarkupClose, 7, ">"),
            Token::new(TokenKind::MarkupVerbatim, 8, "alert(\"</script>\"); //hello "),
            Token::new(TokenKind::MarkupOpenShort, 36, "</"),
            Token::new(TokenKind::MarkupKeyword, 38, "script"),
            Token::new(TokenKind::MarkupClose, 44, ">"),
        ]
    );
}

#[test]
fn test_script_quote_inside_line_comment_is_literal() {
    assert_eq!(
        lex("<script>alert(\"</script>\"); //hello\"</script>"),
        vec![
            Token::new(TokenKind::MarkupOpen, 0, "<"),
            Token::new(TokenKind::MarkupKeyword, 1, "script"),
            Token::new(TokenKind::MarkupClose, 7, ">"),
            Token::new(TokenKind::MarkupVerbatim, 8, "alert(\"</script>\"); //hello\""),
            Token::new(TokenKind::MarkupOpenShort, 36, "</"),
            Token::new(TokenKind::MarkupKeyword, 38, "script"),
            Token::new(TokenKind::MarkupClose, 44, ">"),
        ]
    );
}

#[test]
fn test_script_block_comment_spans_lines() {
    assert_eq!(
        lex("<script>alert(\"</script>\"); /*hello\n'\"*/</script>"),
        vec![
            Token::new(TokenKind::MarkupOpen, 0, "<"),
            Token::new(TokenKind::MarkupKeyword, 1, "script"),
            Token::new(TokenKind::MarkupClose, 7, ">"),
            Token::new(TokenKind::MarkupVerbatim, 8, "alert(\"</script>\"); /*hello\n'\"*/"),
            Token::new(TokenKind::MarkupOpenShort, 40, "</"),
            Token::new(TokenKind::MarkupKeyword, 42, "script"),
            Token::new(TokenKind::MarkupClose, 48, ">"),
        ]
    );
}

#[test]
fn test_foreign_tag_inside_verbatim_stays_literal() {
    assert_tokens(&lex("<script>a <b>c</b> d</script>"))
        .round_trips("<script>a <b>c</b> d</script>")
        .token(3, |t| {
            t.kind(TokenKind::MarkupVerbatim)
                .offset(8)
                .content("a <b>c</b> d")
        });
}

#[test]
fn test_foreign_tag_inside_verbatim_comment_stays_literal() {
    assert_tokens(&lex("<script>// <b></b>\n</script>"))
        .round_trips("<script>// <b></b>\n</script>")
        .token(3, |t| {
            t.kind(TokenKind::MarkupVerbatim)
                .offset(8)
                .content("// <b></b>\n")
        });
}

#[test]
fn test_unterminated_verbatim_body_flushes_at_end_of_input() {
    assert_eq!(
        lex("<script>alert(1);"),
        vec![
            Token::new(TokenKind::MarkupOpen, 0, "<"),
            Token::new(TokenKind::MarkupKeyword, 1, "script"),
            Token::new(TokenKind::MarkupClose, 7, ">"),
            Token::new(TokenKind::MarkupVerbatim, 8, "alert(1);"),
        ]
    );
}

#[test]
fn test_style_is_verbatim_by_default() {
    let tokens = lex("<style>a > b { color: red; }</style>");
    assert_eq!(tokens[3].kind, TokenKind::MarkupVerbatim);
    assert_eq!(tokens[3].content, "a > b { color: red; }");
}
