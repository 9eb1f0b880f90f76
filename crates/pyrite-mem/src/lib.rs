//! Pyrite memory infrastructure.
//!
//! Identifiers, numeric literal text and string literal contents are interned
//! once by the lexer and referred to everywhere else by a 4-byte [`Symbol`].
//! Frames, scopes and the bytecode name table all key on symbols, so name
//! comparison is an integer comparison.
//!
//! [`stack`] keeps the recursive AST walks from overflowing the thread's
//! stack on deeply nested input.

pub mod interner;
pub mod stack;
pub mod symbol;

pub use interner::StringInterner;
pub use symbol::Symbol;
