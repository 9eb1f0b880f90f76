//! Runtime fault kinds.
//!
//! A [`RuntimeErrorKind`] says what went wrong but not where; each backend
//! attaches its own position (a source span or a code location).

use pyrite_syntax::ast::BinaryOp;
use std::fmt;

/// Everything that can go wrong while running a checked program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    /// Call of a value that is not a function.
    NotCallable {
        /// Type of the value called
        type_name: &'static str,
    },

    /// Call with the wrong number of arguments.
    ArityMismatch {
        /// Function called
        name: String,
        /// Parameters declared
        expected: usize,
        /// Arguments supplied
        found: usize,
    },

    /// Binary operator applied to operand types it does not support.
    TypeMismatch {
        /// The operator
        op: BinaryOp,
        /// Type of the left operand
        left: &'static str,
        /// Type of the right operand
        right: &'static str,
    },

    /// Unary operator applied to an operand type it does not support.
    BadOperand {
        /// The operator
        op: &'static str,
        /// Type of the operand
        operand: &'static str,
    },

    /// `if`, `elif` or `while` condition that is not a boolean.
    NonBooleanCondition {
        /// Type of the condition's value
        type_name: &'static str,
    },

    /// Call nesting beyond the configured maximum.
    RecursionLimit {
        /// The configured maximum depth
        limit: usize,
    },

    /// Division with a zero divisor.
    DivisionByZero,

    /// Integer arithmetic result outside the `i64` range.
    IntegerOverflow,

    /// Read of a name that is declared but not bound yet, as when a function
    /// is called above its own `def`.
    UndefinedName {
        /// The name read
        name: String,
    },

    /// The output sink refused a write.
    Output {
        /// The I/O error's message
        message: String,
    },

    /// An instruction names a function or constant its unit does not have.
    MalformedUnit {
        /// What was missing
        detail: String,
    },
}

impl fmt::Display for RuntimeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotCallable { type_name } => {
                write!(f, "'{type_name}' object is not callable")
            }
            Self::ArityMismatch {
                name,
                expected,
                found,
            } => {
                let plural = if *expected == 1 { "" } else { "s" };
                write!(
                    f,
                    "{name}() takes {expected} argument{plural} but {found} {} given",
                    if *found == 1 { "was" } else { "were" }
                )
            }
            Self::TypeMismatch { op, left, right } if op.is_comparison() => {
                write!(
                    f,
                    "'{op}' not supported between instances of '{left}' and '{right}'"
                )
            }
            Self::TypeMismatch { op, left, right } => {
                write!(
                    f,
                    "unsupported operand type(s) for {op}: '{left}' and '{right}'"
                )
            }
            Self::BadOperand { op, operand } => {
                write!(f, "bad operand type for unary {op}: '{operand}'")
            }
            Self::NonBooleanCondition { type_name } => {
                write!(f, "condition must be boolean, not '{type_name}'")
            }
            Self::RecursionLimit { limit } => {
                write!(f, "recursion depth exceeded (limit {limit})")
            }
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::IntegerOverflow => write!(f, "integer overflow"),
            Self::UndefinedName { name } => write!(f, "name '{name}' is not defined"),
            Self::Output { message } => write!(f, "failed to write output: {message}"),
            Self::MalformedUnit { detail } => write!(f, "malformed executable unit: {detail}"),
        }
    }
}

impl std::error::Error for RuntimeErrorKind {}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeErrorKind>;
