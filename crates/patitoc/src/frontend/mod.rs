//! Patito front end
//!
//! Turns source text into the event stream the semantic analyzer consumes:
//! 1. Lexing source code into tokens
//! 2. Recursive-descent parsing, emitting one analyzer event per construct

pub mod lexer;
pub mod parser;

pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{MAIN, Parser};
