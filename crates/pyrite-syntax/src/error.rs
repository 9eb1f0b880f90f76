//! Error types for the lexer and parser.
//!
//! Both phases are fail-fast: the first problem found is returned and no
//! partial result is produced. Every error carries the span it was detected
//! at; [`Spanned`] exposes it uniformly.

use crate::span::{Span, Spanned};
use std::fmt;

/// Errors that can occur during tokenization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    /// Character that starts no token.
    ///
    /// ```text
    /// x = 3 $ 4
    ///       ^
    /// error: unknown character '$'
    /// ```
    UnknownChar {
        /// The offending character
        ch: char,

        /// Location in source
        span: Span,
    },

    /// String literal not closed before the end of its line or of the input.
    UnterminatedString {
        /// Location of the opening quote
        start: Span,
    },

    /// A dedent to a width that matches no enclosing block.
    ///
    /// ```text
    /// if x:
    ///         y = 1
    ///     z = 2
    ///     ^
    /// error: unindent does not match any outer indentation level
    /// ```
    InconsistentDedent {
        /// Width of the offending line
        width: usize,

        /// Location of the first token on the line
        span: Span,
    },

    /// Indentation that mixes tabs and spaces, within the line or against
    /// the style of the enclosing block.
    MixedIndentation {
        /// Location of the offending line's indentation
        span: Span,
    },

    /// Numeric literal that is malformed or does not fit the number model.
    InvalidNumeric {
        /// The literal text
        literal: String,

        /// Location in source
        span: Span,
    },

    /// Closing parenthesis with no matching opener.
    UnbalancedParen {
        /// Location of the `)`
        span: Span,
    },
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownChar { ch, .. } => write!(f, "unknown character '{ch}'"),
            Self::UnterminatedString { .. } => write!(f, "unterminated string literal"),
            Self::InconsistentDedent { .. } => {
                write!(f, "unindent does not match any outer indentation level")
            }
            Self::MixedIndentation { .. } => {
                write!(f, "inconsistent use of tabs and spaces in indentation")
            }
            Self::InvalidNumeric { literal, .. } => {
                write!(f, "invalid numeric literal '{literal}'")
            }
            Self::UnbalancedParen { .. } => write!(f, "unmatched ')'"),
        }
    }
}

impl std::error::Error for LexError {}

impl Spanned for LexError {
    fn span(&self) -> Span {
        match self {
            Self::UnknownChar { span, .. }
            | Self::InconsistentDedent { span, .. }
            | Self::MixedIndentation { span }
            | Self::InvalidNumeric { span, .. }
            | Self::UnbalancedParen { span } => *span,
            Self::UnterminatedString { start } => *start,
        }
    }
}

/// Errors that can occur during parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Token that does not fit the grammar at this point.
    ///
    /// ```text
    /// while x < 3
    ///            ^
    /// error: expected ':', found newline
    /// ```
    UnexpectedToken {
        /// What the grammar allowed here
        expected: Vec<String>,

        /// Description of the token found
        found: String,

        /// Location in source
        span: Span,
    },

    /// A name was required (function name, parameter).
    ExpectedIdentifier {
        /// Description of the token found
        found: String,

        /// Location in source
        span: Span,
    },

    /// An expression was required.
    ExpectedExpression {
        /// Description of the token found
        found: String,

        /// Location in source
        span: Span,
    },

    /// Numeric token whose text cannot be converted to a number.
    InvalidNumeric {
        /// The literal text
        literal: String,

        /// Location in source
        span: Span,
    },

    /// Nesting beyond [`MAX_NESTING_DEPTH`](crate::parser::MAX_NESTING_DEPTH).
    NestedTooDeeply {
        /// `"expression"` or `"block"`
        construct: &'static str,

        /// The nesting limit
        limit: usize,

        /// Token at which the limit was hit
        span: Span,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken {
                expected, found, ..
            } => {
                write!(f, "expected ")?;
                if let [only] = expected.as_slice() {
                    write!(f, "{only}")?;
                } else {
                    write!(f, "one of: {}", expected.join(", "))?;
                }
                write!(f, ", found {found}")
            }
            Self::ExpectedIdentifier { found, .. } => {
                write!(f, "expected identifier, found {found}")
            }
            Self::ExpectedExpression { found, .. } => {
                write!(f, "expected expression, found {found}")
            }
            Self::InvalidNumeric { literal, .. } => {
                write!(f, "invalid numeric literal '{literal}'")
            }
            Self::NestedTooDeeply {
                construct, limit, ..
            } => {
                write!(f, "{construct} nested too deeply (limit {limit})")
            }
        }
    }
}

impl std::error::Error for ParseError {}

impl Spanned for ParseError {
    fn span(&self) -> Span {
        match self {
            Self::UnexpectedToken { span, .. }
            | Self::ExpectedIdentifier { span, .. }
            | Self::ExpectedExpression { span, .. }
            | Self::InvalidNumeric { span, .. }
            | Self::NestedTooDeeply { span, .. } => *span,
        }
    }
}

/// Either phase's error, for callers that run both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    /// Lexer error
    Lex(LexError),

    /// Parser error
    Parse(ParseError),
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lex(err) => write!(f, "lexer error: {err}"),
            Self::Parse(err) => write!(f, "parser error: {err}"),
        }
    }
}

impl std::error::Error for SyntaxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Lex(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}

impl Spanned for SyntaxError {
    fn span(&self) -> Span {
        match self {
            Self::Lex(err) => err.span(),
            Self::Parse(err) => err.span(),
        }
    }
}

impl From<LexError> for SyntaxError {
    fn from(err: LexError) -> Self {
        Self::Lex(err)
    }
}

impl From<ParseError> for SyntaxError {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}

/// Result type for lexer operations.
pub type LexResult<T> = Result<T, LexError>;

/// Result type for parser operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Result type for lexing and parsing together.
pub type SyntaxResult<T> = Result<T, SyntaxError>;
