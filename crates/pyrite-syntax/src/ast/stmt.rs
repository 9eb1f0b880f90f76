//! Statement nodes.

use crate::ast::expr::Expr;
use crate::span::{Span, Spanned};
use pyrite_mem::Symbol;
use std::rc::Rc;

/// A statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `name = value`
    Assign {
        /// Name bound
        target: Symbol,
        /// Location of the name
        target_span: Span,
        /// Value assigned
        value: Expr,
        /// Source location
        span: Span,
    },

    /// `if` with its `elif` and `else` arms, in source order.
    If {
        /// Condition of the `if` arm
        condition: Expr,
        /// Body run when `condition` holds
        then_body: Vec<Stmt>,
        /// `elif` arms, tried top to bottom
        elifs: Vec<ElifClause>,
        /// Body run when no condition held
        else_body: Option<Vec<Stmt>>,
        /// Source location
        span: Span,
    },

    /// `while condition: body`
    While {
        /// Loop condition
        condition: Expr,
        /// Loop body
        body: Vec<Stmt>,
        /// Source location
        span: Span,
    },

    /// `def name(params): body`
    FunctionDef(Rc<FunctionDef>),

    /// `return` with an optional value
    Return {
        /// Value returned; `None` returns nothing
        value: Option<Expr>,
        /// Source location
        span: Span,
    },

    /// Expression evaluated for its effect
    Expr {
        /// The expression
        expr: Expr,
        /// Source location
        span: Span,
    },
}

impl Spanned for Stmt {
    fn span(&self) -> Span {
        match self {
            Self::Assign { span, .. }
            | Self::If { span, .. }
            | Self::While { span, .. }
            | Self::Return { span, .. }
            | Self::Expr { span, .. } => *span,
            Self::FunctionDef(def) => def.span,
        }
    }
}

/// One `elif condition: body` arm.
#[derive(Debug, Clone, PartialEq)]
pub struct ElifClause {
    /// Arm condition
    pub condition: Expr,
    /// Arm body
    pub body: Vec<Stmt>,
    /// Source location, from `elif` to the end of the body
    pub span: Span,
}

/// A function definition.
///
/// Shared through `Rc` so runtime closures can refer to the definition
/// without copying its body.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    /// Function name
    pub name: Symbol,
    /// Location of the name
    pub name_span: Span,
    /// Parameter names in order
    pub params: Vec<Param>,
    /// Function body
    pub body: Vec<Stmt>,
    /// Source location, from `def` to the end of the body
    pub span: Span,
}

impl FunctionDef {
    /// Number of parameters.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// A parameter name with its location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Param {
    /// Parameter name
    pub name: Symbol,
    /// Location of the name
    pub span: Span,
}
