//! Grammar stages
//!
//!     Each micro-grammar of the template syntax is one [`Grammar`] stage.
//!     The lexer runs the stages in order: a stage consumes its buffer from
//!     start to end exactly once and produces the stream the next stage
//!     reads. Anything a stage does not recognize must be re-emitted
//!     unchanged (pass-through transparency) so the stages compose without
//!     losing bytes.
//!
//! Recognition Attempts
//!
//!     A stage that spots a trigger character starts a recognition attempt
//!     with a fresh attempt-state value. An attempt either accepts (its
//!     tokens are emitted and scanning resumes after the construct) or
//!     rejects (the buffer is replayed to the trigger and the byte passes
//!     through as plain text). Failed attempts never leak state into the
//!     stage's scanning loop or into later attempts.

pub mod declare;
pub mod dynamic;
pub mod host_code;
pub mod inline;
pub mod markup;
pub mod raw;

pub use declare::DeclareGrammar;
pub use dynamic::{DirectiveRegistry, DynamicGrammar};
pub use host_code::HostCodeGrammar;
pub use inline::InlineGrammar;
pub use markup::MarkupGrammar;
pub use raw::RawTextGrammar;

use crate::stencil::buffer::Buffer;
use crate::stencil::error::LexError;
use crate::stencil::token::Lexeme;

/// A pluggable recognizer over a lexeme stream.
pub trait Grammar {
    /// Consume the buffer end-to-end and produce the transformed stream.
    ///
    /// Implementations must pass through every item they do not claim and
    /// must keep the stream lossless: the content of the output, in order,
    /// reconstructs the same span of source text as the input.
    fn parse(&self, src: &mut Buffer) -> Result<Vec<Lexeme>, LexError>;
}

/// Characters permitted in keywords: tag names, attribute names, directive
/// and placeholder names.
pub(crate) fn is_keyword_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | ':' | '.')
}
