//! Pyrite syntax: lexer, parser and AST.
//!
//! This crate is the language frontend:
//! - Lexical analysis, including indentation layout tokens
//! - Parsing into the AST
//! - Source location tracking
//!
//! # Modules
//!
//! - [`span`] - Source location tracking
//! - [`token`] - Token types
//! - [`keywords`] - Reserved words and their fixed symbols
//! - [`lexer`] - Tokenization
//! - [`ast`] - Syntax tree nodes
//! - [`parser`] - Recursive descent parser
//! - [`error`] - Lexer and parser error types
//!
//! # Examples
//!
//! ```
//! use pyrite_syntax::ast::Stmt;
//!
//! let program = pyrite_syntax::parse_source("x = 1\nprint(x)\n").unwrap();
//! assert_eq!(program.body.len(), 2);
//! assert!(matches!(program.body[0], Stmt::Assign { .. }));
//! ```

#![warn(missing_docs)]

pub mod ast;
pub mod error;
pub mod keywords;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod token;

pub use ast::Program;
pub use error::{LexError, LexResult, ParseError, ParseResult, SyntaxError, SyntaxResult};
pub use lexer::Lexer;
pub use parser::{MAX_NESTING_DEPTH, Parser};
pub use span::{LineCol, Span, Spanned};
pub use token::{Token, TokenKind};

use pyrite_mem::StringInterner;

/// Tokenizes `source`, returning the tokens and the interner their symbols
/// belong to.
///
/// # Errors
///
/// Returns the first [`LexError`] in the source.
pub fn tokenize(source: &str) -> LexResult<(Vec<Token>, StringInterner)> {
    Lexer::new(source).lex_with_interner()
}

/// Parses a token stream produced by [`tokenize`].
///
/// # Errors
///
/// Returns the first [`ParseError`] in the stream.
pub fn parse(tokens: Vec<Token>, interner: StringInterner) -> ParseResult<Program> {
    Parser::new(tokens, interner).parse_program()
}

/// Lexes and parses `source` in one step.
///
/// # Errors
///
/// Returns the first lexer or parser error.
pub fn parse_source(source: &str) -> SyntaxResult<Program> {
    let (tokens, interner) = tokenize(source)?;
    Ok(parse(tokens, interner)?)
}
