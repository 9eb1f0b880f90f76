//! Token types produced by the lexer.
//!
//! Names, numeric literal text and decoded string contents are carried as
//! interned [`Symbol`]s; the matching `StringInterner` is returned by the
//! lexer alongside the tokens.
//!
//! # Examples
//!
//! ```
//! use pyrite_syntax::span::Span;
//! use pyrite_syntax::token::{Token, TokenKind};
//!
//! let plus = Token::new(TokenKind::Plus, Span::new(2, 3, 1, 3, 1, 4));
//! assert!(plus.kind.is_operator());
//! assert_eq!(plus.kind.precedence(), Some(2));
//! ```

use crate::span::{Span, Spanned};
use pyrite_mem::Symbol;
use std::fmt;

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // ===== Atoms =====
    /// Identifier or keyword
    Name(Symbol),

    /// Numeric literal text: `42`, `2.5`
    Number(Symbol),

    /// String literal contents, escapes already decoded
    Str(Symbol),

    // ===== Operators =====
    /// `+`
    Plus,

    /// `-`
    Minus,

    /// `*`
    Star,

    /// `/`
    Slash,

    /// `==`
    EqEq,

    /// `!=`
    BangEq,

    /// `<`
    Lt,

    /// `<=`
    LtEq,

    /// `>`
    Gt,

    /// `>=`
    GtEq,

    /// `=`
    Eq,

    /// `(`
    LParen,

    /// `)`
    RParen,

    /// `:`
    Colon,

    /// `,`
    Comma,

    // ===== Layout =====
    /// End of a logical line
    Newline,

    /// Indentation increased by one level
    Indent,

    /// Indentation decreased by one level
    Dedent,

    /// End of input
    EOF,
}

impl TokenKind {
    /// Returns true for the operator and punctuation kinds.
    #[must_use]
    pub const fn is_operator(&self) -> bool {
        matches!(
            self,
            Self::Plus
                | Self::Minus
                | Self::Star
                | Self::Slash
                | Self::EqEq
                | Self::BangEq
                | Self::Lt
                | Self::LtEq
                | Self::Gt
                | Self::GtEq
                | Self::Eq
                | Self::LParen
                | Self::RParen
                | Self::Colon
                | Self::Comma
        )
    }

    /// Returns true for the synthesized layout kinds.
    #[must_use]
    pub const fn is_layout(&self) -> bool {
        matches!(self, Self::Newline | Self::Indent | Self::Dedent | Self::EOF)
    }

    /// Binding power of a binary operator; `None` for anything else.
    ///
    /// All levels are left-associative.
    #[must_use]
    pub const fn precedence(&self) -> Option<u8> {
        match self {
            Self::EqEq | Self::BangEq | Self::Lt | Self::LtEq | Self::Gt | Self::GtEq => Some(1),
            Self::Plus | Self::Minus => Some(2),
            Self::Star | Self::Slash => Some(3),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(_) => write!(f, "name"),
            Self::Number(_) => write!(f, "number"),
            Self::Str(_) => write!(f, "string literal"),
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::Star => write!(f, "*"),
            Self::Slash => write!(f, "/"),
            Self::EqEq => write!(f, "=="),
            Self::BangEq => write!(f, "!="),
            Self::Lt => write!(f, "<"),
            Self::LtEq => write!(f, "<="),
            Self::Gt => write!(f, ">"),
            Self::GtEq => write!(f, ">="),
            Self::Eq => write!(f, "="),
            Self::LParen => write!(f, "("),
            Self::RParen => write!(f, ")"),
            Self::Colon => write!(f, ":"),
            Self::Comma => write!(f, ","),
            Self::Newline => write!(f, "newline"),
            Self::Indent => write!(f, "indent"),
            Self::Dedent => write!(f, "dedent"),
            Self::EOF => write!(f, "end of input"),
        }
    }
}

/// A token with its source location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    /// What was lexed
    pub kind: TokenKind,

    /// Where it was lexed
    pub span: Span,
}

impl Token {
    /// Creates a token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Starting line (1-indexed).
    #[must_use]
    pub const fn line(&self) -> usize {
        self.span.start_line
    }

    /// Starting column (1-indexed).
    #[must_use]
    pub const fn column(&self) -> usize {
        self.span.start_col
    }
}

impl Spanned for Token {
    fn span(&self) -> Span {
        self.span
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_kind_precedence() {
        assert_eq!(TokenKind::Star.precedence(), Some(3));
        assert_eq!(TokenKind::Slash.precedence(), Some(3));
        assert_eq!(TokenKind::Plus.precedence(), Some(2));
        assert_eq!(TokenKind::LtEq.precedence(), Some(1));
        assert_eq!(TokenKind::Eq.precedence(), None);
        assert_eq!(TokenKind::Name(Symbol::new(9)).precedence(), None);
    }

    #[test]
    fn test_token_kind_classes() {
        assert!(TokenKind::Colon.is_operator());
        assert!(!TokenKind::Newline.is_operator());
        assert!(TokenKind::Dedent.is_layout());
        assert!(!TokenKind::Number(Symbol::new(0)).is_layout());
    }

    #[test]
    fn test_token_kind_display() {
        assert_eq!(format!("{}", TokenKind::BangEq), "!=");
        assert_eq!(format!("{}", TokenKind::EOF), "end of input");
        assert_eq!(format!("{}", TokenKind::Str(Symbol::new(3))), "string literal");
    }

    #[test]
    fn test_token_position() {
        let token = Token::new(TokenKind::Comma, Span::new(8, 9, 2, 4, 2, 5));
        assert_eq!(token.line(), 2);
        assert_eq!(token.column(), 4);
        assert_eq!(token.span(), token.span);
    }
}
