//! Expression nodes.
//!
//! Child expressions are boxed; the tree is small and short-lived, so nodes
//! own their children directly.

use crate::span::{Span, Spanned};
use crate::token::TokenKind;
use pyrite_mem::Symbol;
use std::fmt;

/// An expression.
///
/// # Examples
///
/// ```
/// use pyrite_syntax::ast::expr::{BinaryOp, Expr, Number};
/// use pyrite_syntax::span::{Span, Spanned};
///
/// let lhs = Expr::Number { value: Number::Int(2), span: Span::new(0, 1, 1, 1, 1, 2) };
/// let rhs = Expr::Number { value: Number::Int(3), span: Span::new(4, 5, 1, 5, 1, 6) };
/// let sum = Expr::binary(lhs, BinaryOp::Add, Span::new(2, 3, 1, 3, 1, 4), rhs);
///
/// assert_eq!(sum.span().start_col, 1);
/// assert_eq!(sum.span().end_col, 6);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal: `42`, `2.5`
    Number {
        /// The literal's value
        value: Number,
        /// Source location
        span: Span,
    },

    /// String literal: `"hi"`
    Str {
        /// Decoded contents
        value: Symbol,
        /// Source location
        span: Span,
    },

    /// Variable reference: `x`
    Identifier {
        /// The name read
        name: Symbol,
        /// Source location
        span: Span,
    },

    /// Prefix operator: `-x`
    Unary {
        /// The operator
        op: UnaryOp,
        /// The operand
        operand: Box<Expr>,
        /// Source location
        span: Span,
    },

    /// Infix operator: `a + b`, `x < y`
    Binary {
        /// Left operand
        left: Box<Expr>,
        /// The operator
        op: BinaryOp,
        /// Location of the operator token, where runtime faults point
        op_span: Span,
        /// Right operand
        right: Box<Expr>,
        /// Source location of the whole expression
        span: Span,
    },

    /// Call of a named function: `f(a, b)`
    Call {
        /// Name of the function called
        callee: Symbol,
        /// Location of the callee name
        callee_span: Span,
        /// Arguments in source order
        args: Vec<Expr>,
        /// Source location, through the closing parenthesis
        span: Span,
    },
}

impl Expr {
    /// Builds a binary node spanning both operands.
    #[must_use]
    pub fn binary(left: Expr, op: BinaryOp, op_span: Span, right: Expr) -> Self {
        let span = Span::merge(left.span(), right.span());
        Self::Binary {
            left: Box::new(left),
            op,
            op_span,
            right: Box::new(right),
            span,
        }
    }
}

impl Spanned for Expr {
    fn span(&self) -> Span {
        match self {
            Self::Number { span, .. }
            | Self::Str { span, .. }
            | Self::Identifier { span, .. }
            | Self::Unary { span, .. }
            | Self::Binary { span, .. }
            | Self::Call { span, .. } => *span,
        }
    }
}

/// Value of a numeric literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Literal without a fractional part
    Int(i64),
    /// Literal with a fractional part
    Float(f64),
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x:?}"),
        }
    }
}

/// Infix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// Addition or concatenation: `+`
    Add,
    /// Subtraction: `-`
    Sub,
    /// Multiplication: `*`
    Mul,
    /// Division: `/`
    Div,
    /// Equality: `==`
    Eq,
    /// Inequality: `!=`
    Neq,
    /// Less than: `<`
    Lt,
    /// Less than or equal: `<=`
    Lte,
    /// Greater than: `>`
    Gt,
    /// Greater than or equal: `>=`
    Gte,
}

impl BinaryOp {
    /// Maps an operator token to its binary operator.
    #[must_use]
    pub const fn from_token(kind: &TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::Plus => Self::Add,
            TokenKind::Minus => Self::Sub,
            TokenKind::Star => Self::Mul,
            TokenKind::Slash => Self::Div,
            TokenKind::EqEq => Self::Eq,
            TokenKind::BangEq => Self::Neq,
            TokenKind::Lt => Self::Lt,
            TokenKind::LtEq => Self::Lte,
            TokenKind::Gt => Self::Gt,
            TokenKind::GtEq => Self::Gte,
            _ => return None,
        })
    }

    /// Returns true for the six comparison operators.
    #[must_use]
    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Eq | Self::Neq | Self::Lt | Self::Lte | Self::Gt | Self::Gte
        )
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "+"),
            Self::Sub => write!(f, "-"),
            Self::Mul => write!(f, "*"),
            Self::Div => write!(f, "/"),
            Self::Eq => write!(f, "=="),
            Self::Neq => write!(f, "!="),
            Self::Lt => write!(f, "<"),
            Self::Lte => write!(f, "<="),
            Self::Gt => write!(f, ">"),
            Self::Gte => write!(f, ">="),
        }
    }
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// Negation: `-`
    Neg,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Neg => write!(f, "-"),
        }
    }
}
