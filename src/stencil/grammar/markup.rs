//! Tag-like markup grammar.
//!
//!     Recognizes `<name attr="value" ...>`, `</name>` and `<name ... />`
//!     heads and classifies their parts (keywords, attributes, equals signs,
//!     whitespace). A head that turns out malformed is not an error: the
//!     attempt rejects, the buffer replays to the opening `<` and the byte
//!     degrades to raw text.
//!
//! Verbatim Elements
//!
//!     The body of a verbatim element (`script`, `canvas`, `style` by
//!     default) is opaque text: nothing inside it is markup except the
//!     element's own closing tag. Quoted strings and `//` and `/* */`
//!     comments are tracked only so a `<` inside them is never mistaken for
//!     that closing tag. The gathered body flushes as a single verbatim
//!     token; at end of input with no closing tag it still flushes, because
//!     losslessness outranks strictness.

use crate::stencil::buffer::Buffer;
use crate::stencil::error::LexError;
use crate::stencil::grammar::{is_keyword_char, Grammar};
use crate::stencil::token::{Lexeme, Token, TokenKind};

/// Elements whose content is never parsed as markup.
const DEFAULT_VERBATIM_TAGS: &[&str] = &["script", "canvas", "style"];

/// Recognizer for tag-like constructs.
#[derive(Debug, Clone)]
pub struct MarkupGrammar {
    verbatim_tags: Vec<String>,
}

impl Default for MarkupGrammar {
    fn default() -> Self {
        MarkupGrammar::new()
    }
}

impl MarkupGrammar {
    pub fn new() -> Self {
        MarkupGrammar {
            verbatim_tags: DEFAULT_VERBATIM_TAGS
                .iter()
                .map(|tag| tag.to_string())
                .collect(),
        }
    }

    /// Replace the verbatim element name set.
    pub fn with_verbatim_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MarkupGrammar {
            verbatim_tags: tags.into_iter().map(|tag| tag.into()).collect(),
        }
    }

    fn is_verbatim(&self, name: &str) -> bool {
        self.verbatim_tags.iter().any(|tag| tag == name)
    }

    /// Scan the body of a verbatim element up to its matching closing tag.
    fn parse_verbatim(
        &self,
        src: &mut Buffer,
        name: &str,
        out: &mut Vec<Lexeme>,
    ) -> Result<(), LexError> {
        let mut chunks: Vec<Lexeme> = Vec::new();

        while let Some(n) = src.next() {
            let Some(b) = n.as_byte().copied() else {
                chunks.push(n);
                continue;
            };

            match b.ch {
                '"' | '\'' | '`' => {
                    chunks.push(n);
                    // language inclusions allow nested strings
                    while let Some(nc) = src.next() {
                        let close = nc.as_byte().is_some_and(|c| c.ch == b.ch);
                        chunks.push(nc);
                        if close {
                            break;
                        }
                    }
                }

                '/' => {
                    chunks.push(n);
                    let la = src.lookahead_byte(0);
                    if la == Some('/') || la == Some('*') {
                        let multiline = la == Some('*');
                        if let Some(marker) = src.next() {
                            chunks.push(marker);
                        }
                        self.scan_comment(src, name, multiline, &mut chunks)?;
                    }
                }

                '<' => {
                    match TagAttempt::new(b.offset).parse(src)? {
                        Some(tag) if tag_name(&tag) == name => {
                            // found closing verbatim tag
                            if !chunks.is_empty() {
                                out.push(Lexeme::Token(Token::pack(
                                    TokenKind::MarkupVerbatim,
                                    chunks,
                                )));
                            }
                            out.extend(tag.into_iter().map(Lexeme::Token));
                            return Ok(());
                        }
                        _ => {
                            chunks.push(n);
                            src.replay(b.offset)?;
                        }
                    }
                }

                _ => chunks.push(n),
            }
        }

        // no closing tag before end of input; the body still flushes so the
        // bytes survive
        if !chunks.is_empty() {
            out.push(Lexeme::Token(Token::pack(TokenKind::MarkupVerbatim, chunks)));
        }
        Ok(())
    }

    /// Scan a `//` or `/* */` comment inside a verbatim body.
    ///
    /// The only construct that can end the verbatim element from inside a
    /// comment is its own closing tag; any other `<` stays literal content.
    /// On finding the closing tag the buffer replays to just before the `<`
    /// so the primary verbatim loop re-matches and flushes.
    fn scan_comment(
        &self,
        src: &mut Buffer,
        name: &str,
        multiline: bool,
        chunks: &mut Vec<Lexeme>,
    ) -> Result<(), LexError> {
        while let Some(nc) = src.next() {
            let Some(b) = nc.as_byte().copied() else {
                chunks.push(nc);
                continue;
            };

            if b.ch == '<' {
                match TagAttempt::new(b.offset).parse(src)? {
                    Some(tag) if tag_name(&tag) == name => {
                        // hand the closing tag back to the primary loop
                        src.replay(b.offset.saturating_sub(1))?;
                        return Ok(());
                    }
                    _ => {
                        chunks.push(nc);
                        src.replay(b.offset)?;
                        continue;
                    }
                }
            }

            chunks.push(nc);

            if multiline {
                if b.ch == '*' && src.lookahead_byte(0) == Some('/') {
                    if let Some(end) = src.next() {
                        chunks.push(end);
                    }
                    return Ok(());
                }
            } else if b.ch == '\n' {
                return Ok(());
            }
        }

        Ok(())
    }
}

impl Grammar for MarkupGrammar {
    fn parse(&self, src: &mut Buffer) -> Result<Vec<Lexeme>, LexError> {
        let mut out = Vec::new();

        while let Some(n) = src.next() {
            let Some(b) = n.as_byte().filter(|b| b.ch == '<').copied() else {
                out.push(n);
                continue;
            };

            // every attempt works with isolated state
            match TagAttempt::new(b.offset).parse(src)? {
                None => {
                    out.push(n);
                    src.replay(b.offset)?;
                }
                Some(tag) => {
                    let name = tag_name(&tag);
                    let verbatim = self.is_verbatim(&name);
                    out.extend(tag.into_iter().map(Lexeme::Token));
                    if verbatim {
                        self.parse_verbatim(src, &name, &mut out)?;
                    }
                }
            }
        }

        Ok(out)
    }
}

/// Lowercased name of a parsed tag: the content of its first keyword token.
fn tag_name(tag: &[Token]) -> String {
    tag.iter()
        .find(|token| token.kind == TokenKind::MarkupKeyword)
        .map(|token| token.content.to_lowercase())
        .unwrap_or_default()
}

/// State for one tag recognition attempt.
///
/// Created fresh per attempt so a failed attempt never contaminates the
/// scanning loop or a later attempt.
struct TagAttempt {
    open_offset: usize,
    tokens: Vec<Token>,
    whitespace: Vec<Lexeme>,
    keyword: Vec<Lexeme>,
    attribute: Vec<Lexeme>,
}

impl TagAttempt {
    fn new(open_offset: usize) -> Self {
        TagAttempt {
            open_offset,
            tokens: Vec::new(),
            whitespace: Vec::new(),
            keyword: Vec::new(),
            attribute: Vec::new(),
        }
    }

    /// Scan a tag head starting just after its `<`.
    ///
    /// Returns the tag's tokens on acceptance, `None` on rejection; the
    /// caller replays the buffer after a rejection.
    fn parse(mut self, src: &mut Buffer) -> Result<Option<Vec<Token>>, LexError> {
        let mut open = Token::new(TokenKind::MarkupOpen, self.open_offset, "<");
        if src.lookahead_byte(0) == Some('/') {
            open.kind = TokenKind::MarkupOpenShort;
            open.content.push('/');
            src.next();
        }
        self.tokens.push(open);

        let mut closed = false;
        while let Some(n) = src.next() {
            if !self.attribute.is_empty() {
                let closes = match (n.as_byte(), self.attribute[0].as_byte()) {
                    (Some(b), Some(quote)) => b.ch == quote.ch,
                    _ => false,
                };
                self.attribute.push(n);
                if closes {
                    self.flush_attribute();
                }
                continue;
            }

            let Some(b) = n.as_byte().copied() else {
                // upstream tokens (an echo tag in the head) fold into the
                // keyword accumulator
                self.keyword.push(n);
                continue;
            };

            match b.ch {
                '"' | '\'' | '`' => {
                    self.flush();
                    self.attribute.push(n);
                }

                '=' => {
                    self.flush();
                    self.tokens
                        .push(Token::new(TokenKind::MarkupEqual, b.offset, "="));
                }

                '/' => {
                    if src.lookahead_byte(0) == Some('>') {
                        self.flush();
                        src.next();
                        self.tokens
                            .push(Token::new(TokenKind::MarkupCloseShort, b.offset, "/>"));
                        closed = true;
                        break;
                    }
                    // stray "/" rejects the whole head
                    return Ok(None);
                }

                '>' => {
                    self.flush();
                    self.tokens
                        .push(Token::new(TokenKind::MarkupClose, b.offset, ">"));
                    closed = true;
                    break;
                }

                ch if ch.is_whitespace() => {
                    self.flush_keyword();
                    self.whitespace.push(n);
                }

                ch => {
                    self.flush_whitespace();
                    if !is_keyword_char(ch) {
                        return Ok(None);
                    }
                    self.keyword.push(n);
                }
            }
        }

        if closed && self.is_valid() {
            Ok(Some(self.tokens))
        } else {
            Ok(None)
        }
    }

    /// Validity rule, checked in documented order: enough tokens first, then
    /// a closing token last, then keyword/attribute sequencing.
    fn is_valid(&self) -> bool {
        if self.tokens.len() < 3 {
            return false;
        }

        let last = &self.tokens[self.tokens.len() - 1];
        if last.kind != TokenKind::MarkupClose && last.kind != TokenKind::MarkupCloseShort {
            return false;
        }

        for token in &self.tokens {
            match token.kind {
                TokenKind::MarkupWhitespace => continue,
                TokenKind::MarkupAttribute | TokenKind::MarkupEqual => return false,
                TokenKind::MarkupKeyword => return true,
                _ => continue,
            }
        }

        false
    }

    fn flush(&mut self) {
        self.flush_whitespace();
        self.flush_keyword();
    }

    fn flush_whitespace(&mut self) {
        if self.whitespace.is_empty() {
            return;
        }
        self.tokens.push(Token::pack(
            TokenKind::MarkupWhitespace,
            std::mem::take(&mut self.whitespace),
        ));
    }

    fn flush_keyword(&mut self) {
        if self.keyword.is_empty() {
            return;
        }
        self.tokens.push(Token::pack(
            TokenKind::MarkupKeyword,
            std::mem::take(&mut self.keyword),
        ));
    }

    fn flush_attribute(&mut self) {
        if self.attribute.is_empty() {
            return;
        }
        self.tokens.push(Token::pack(
            TokenKind::MarkupAttribute,
            std::mem::take(&mut self.attribute),
        ));
    }
}
