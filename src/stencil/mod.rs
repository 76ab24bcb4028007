//! Main module for the stencil lexer functionality

pub mod buffer;
pub mod error;
pub mod grammar;
pub mod host;
pub mod lexer;
pub mod testing;
pub mod token;

pub use buffer::Buffer;
pub use error::LexError;
pub use grammar::Grammar;
pub use lexer::Lexer;
pub use token::{detokenize, Byte, Lexeme, Token, TokenKind};
