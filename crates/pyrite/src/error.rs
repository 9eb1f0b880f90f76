//! Error types for the Pyrite pipeline.
//!
//! Each phase keeps its own error type; [`Error`] wraps whichever one
//! stopped the pipeline and exposes the message and source position the
//! same way for all of them.

use pyrite_interpreter::RuntimeError;
use pyrite_runtime::RuntimeErrorKind;
use pyrite_sema::SemanticError;
use pyrite_syntax::{LexError, ParseError, Spanned, SyntaxError};
use std::fmt;

/// A bytecode fault resolved to a source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionFault {
    /// What went wrong
    pub kind: RuntimeErrorKind,

    /// Line of the faulting instruction's node (1-indexed)
    pub line: usize,

    /// Column of the faulting instruction's node (1-indexed)
    pub column: usize,
}

impl fmt::Display for ExecutionFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for ExecutionFault {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// Any error the pipeline can stop with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed tokens or layout.
    Lex(LexError),

    /// Token stream that does not match the grammar.
    Parse(ParseError),

    /// Scoping violation found before running.
    Semantic(SemanticError),

    /// Fault raised by the tree-walking interpreter.
    Runtime(RuntimeError),

    /// Fault raised by the bytecode VM.
    Execution(ExecutionFault),
}

impl Error {
    /// The phase that failed, as used in diagnostics.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Lex(_) => "LexError",
            Self::Parse(_) => "ParseError",
            Self::Semantic(_) => "SemanticError",
            Self::Runtime(_) | Self::Execution(_) => "RuntimeError",
        }
    }

    /// Human-readable description, without the position.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Lex(err) => err.to_string(),
            Self::Parse(err) => err.to_string(),
            Self::Semantic(err) => err.to_string(),
            Self::Runtime(err) => err.message(),
            Self::Execution(fault) => fault.kind.to_string(),
        }
    }

    /// Line of the error (1-indexed).
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            Self::Lex(err) => err.span().start_line,
            Self::Parse(err) => err.span().start_line,
            Self::Semantic(err) => err.span().start_line,
            Self::Runtime(err) => err.line(),
            Self::Execution(fault) => fault.line,
        }
    }

    /// Column of the error (1-indexed).
    #[must_use]
    pub fn column(&self) -> usize {
        match self {
            Self::Lex(err) => err.span().start_col,
            Self::Parse(err) => err.span().start_col,
            Self::Semantic(err) => err.span().start_col,
            Self::Runtime(err) => err.column(),
            Self::Execution(fault) => fault.column,
        }
    }

    /// The runtime fault kind, for either backend.
    #[must_use]
    pub fn runtime_kind(&self) -> Option<&RuntimeErrorKind> {
        match self {
            Self::Runtime(err) => Some(&err.kind),
            Self::Execution(fault) => Some(&fault.kind),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}:{}: {}",
            self.category(),
            self.line(),
            self.column(),
            self.message()
        )
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Lex(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Semantic(err) => Some(err),
            Self::Runtime(err) => Some(err),
            Self::Execution(fault) => Some(fault),
        }
    }
}

impl From<LexError> for Error {
    fn from(err: LexError) -> Self {
        Self::Lex(err)
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}

impl From<SyntaxError> for Error {
    fn from(err: SyntaxError) -> Self {
        match err {
            SyntaxError::Lex(err) => Self::Lex(err),
            SyntaxError::Parse(err) => Self::Parse(err),
        }
    }
}

impl From<SemanticError> for Error {
    fn from(err: SemanticError) -> Self {
        Self::Semantic(err)
    }
}

impl From<RuntimeError> for Error {
    fn from(err: RuntimeError) -> Self {
        Self::Runtime(err)
    }
}

impl From<ExecutionFault> for Error {
    fn from(fault: ExecutionFault) -> Self {
        Self::Execution(fault)
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use pyrite_syntax::Span;

    #[test]
    fn test_lex_error_position() {
        let err = Error::from(LexError::UnknownChar {
            ch: '$',
            span: Span::new(6, 7, 1, 7, 1, 8),
        });
        assert_eq!(err.category(), "LexError");
        assert_eq!((err.line(), err.column()), (1, 7));
        assert_eq!(err.to_string(), "LexError at 1:7: unknown character '$'");
    }

    #[test]
    fn test_execution_fault() {
        let err = Error::from(ExecutionFault {
            kind: RuntimeErrorKind::DivisionByZero,
            line: 4,
            column: 9,
        });
        assert_eq!(err.category(), "RuntimeError");
        assert_eq!(err.message(), "division by zero");
        assert_eq!(err.runtime_kind(), Some(&RuntimeErrorKind::DivisionByZero));
        assert_eq!((err.line(), err.column()), (4, 9));
    }
}
