//! Semantic analysis errors.

use pyrite_syntax::{Span, Spanned};
use std::fmt;

/// Errors found while resolving names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticError {
    /// Read of a name no enclosing scope declares.
    Undeclared {
        /// The name read
        name: String,
        /// Source location of the read
        span: Span,
    },

    /// The same parameter name listed twice.
    DuplicateParameter {
        /// The repeated name
        name: String,
        /// Function being defined
        function: String,
        /// Location of the second occurrence
        span: Span,
    },

    /// `return` at module level.
    ReturnOutsideFunction {
        /// Location of the statement
        span: Span,
    },
}

impl SemanticError {
    /// The name involved, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Undeclared { name, .. } | Self::DuplicateParameter { name, .. } => Some(name),
            Self::ReturnOutsideFunction { .. } => None,
        }
    }
}

impl fmt::Display for SemanticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undeclared { name, .. } => write!(f, "name '{name}' is not defined"),
            Self::DuplicateParameter { name, function, .. } => {
                write!(f, "duplicate parameter '{name}' in function '{function}'")
            }
            Self::ReturnOutsideFunction { .. } => write!(f, "'return' outside function"),
        }
    }
}

impl std::error::Error for SemanticError {}

impl Spanned for SemanticError {
    fn span(&self) -> Span {
        match self {
            Self::Undeclared { span, .. }
            | Self::DuplicateParameter { span, .. }
            | Self::ReturnOutsideFunction { span } => *span,
        }
    }
}

/// Result type for semantic analysis.
pub type SemaResult<T> = Result<T, SemanticError>;
