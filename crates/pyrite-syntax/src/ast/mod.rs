//! Abstract syntax tree.
//!
//! Every node carries the [`Span`] of the source it was parsed from. Names
//! and string contents are [`Symbol`]s resolved through the interner stored
//! on [`Program`].
//!
//! - [`expr`] - literals, names, operators, calls
//! - [`stmt`] - assignments, control flow, function definitions

pub mod expr;
pub mod stmt;

pub use expr::{BinaryOp, Expr, Number, UnaryOp};
pub use stmt::{ElifClause, FunctionDef, Param, Stmt};

use crate::span::Span;
use pyrite_mem::{StringInterner, Symbol};

/// A parsed source file.
#[derive(Debug, Clone)]
pub struct Program {
    /// Top-level statements
    pub body: Vec<Stmt>,

    /// Interner holding every name and string literal in the tree
    pub interner: StringInterner,

    /// Source location of the whole program
    pub span: Span,
}

impl Program {
    /// Resolves a symbol from this program's interner.
    ///
    /// Symbols in the tree always come from this interner, so an unknown id
    /// only appears when mixing programs.
    #[must_use]
    pub fn resolve(&self, sym: Symbol) -> &str {
        self.interner.resolve(sym).unwrap_or("<unknown>")
    }
}
