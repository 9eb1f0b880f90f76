//! Interpreter errors.

use pyrite_runtime::RuntimeErrorKind;
use pyrite_syntax::{Span, Spanned};
use std::fmt;

/// A runtime fault located in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeError {
    /// What went wrong
    pub kind: RuntimeErrorKind,

    /// The expression or statement that faulted
    pub span: Span,
}

impl RuntimeError {
    /// Creates an error.
    #[must_use]
    pub const fn new(kind: RuntimeErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Human-readable description.
    #[must_use]
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// Line of the fault (1-indexed).
    #[must_use]
    pub const fn line(&self) -> usize {
        self.span.start_line
    }

    /// Column of the fault (1-indexed).
    #[must_use]
    pub const fn column(&self) -> usize {
        self.span.start_col
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for RuntimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

impl Spanned for RuntimeError {
    fn span(&self) -> Span {
        self.span
    }
}

/// Result type for interpretation.
pub type InterpResult<T> = Result<T, RuntimeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let err = RuntimeError::new(
            RuntimeErrorKind::DivisionByZero,
            Span::new(12, 13, 3, 9, 3, 10),
        );
        assert_eq!(err.message(), "division by zero");
        assert_eq!((err.line(), err.column()), (3, 9));
        assert_eq!(err.to_string(), "division by zero");
    }
}
