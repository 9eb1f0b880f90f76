//! Operator semantics.
//!
//! - `+ - *` on two ints stay int and fail on overflow; with a float
//!   operand they produce a float.
//! - `/` always produces a float; a zero divisor is an error.
//! - `+` on two strings concatenates.
//! - `==` and `!=` accept any operands (see [`Value`]'s `PartialEq`).
//! - `< <= > >=` order numbers, or two strings lexicographically.
//!
//! Any other combination is a `TypeMismatch`. Booleans are not numbers, so
//! `1 < 2 < 3` compares `True < 3` and fails.

use crate::error::{RuntimeErrorKind, RuntimeResult};
use crate::value::{Callable, Value};
use pyrite_syntax::ast::BinaryOp;
use std::cmp::Ordering;
use std::rc::Rc;

/// Applies a binary operator.
///
/// # Errors
///
/// See the module documentation for which operand types each operator
/// accepts; arithmetic may also fail with `DivisionByZero` or
/// `IntegerOverflow`.
pub fn binary<F: Callable>(op: BinaryOp, lhs: &Value<F>, rhs: &Value<F>) -> RuntimeResult<Value<F>> {
    match op {
        BinaryOp::Add => add(lhs, rhs),
        BinaryOp::Sub => arithmetic(op, lhs, rhs, i64::checked_sub, |a, b| a - b),
        BinaryOp::Mul => arithmetic(op, lhs, rhs, i64::checked_mul, |a, b| a * b),
        BinaryOp::Div => divide(lhs, rhs),
        BinaryOp::Eq => Ok(Value::Bool(lhs == rhs)),
        BinaryOp::Neq => Ok(Value::Bool(lhs != rhs)),
        BinaryOp::Lt | BinaryOp::Lte | BinaryOp::Gt | BinaryOp::Gte => {
            let ordering = compare(op, lhs, rhs)?;
            Ok(Value::Bool(ordering.is_some_and(|ord| match op {
                BinaryOp::Lt => ord == Ordering::Less,
                BinaryOp::Lte => ord != Ordering::Greater,
                BinaryOp::Gt => ord == Ordering::Greater,
                _ => ord != Ordering::Less,
            })))
        }
    }
}

/// Applies unary minus.
///
/// # Errors
///
/// Fails with `BadOperand` for non-numbers and `IntegerOverflow` for
/// `-i64::MIN`.
pub fn negate<F: Callable>(operand: &Value<F>) -> RuntimeResult<Value<F>> {
    match operand {
        Value::Int(n) => n
            .checked_neg()
            .map(Value::Int)
            .ok_or(RuntimeErrorKind::IntegerOverflow),
        Value::Float(x) => Ok(Value::Float(-x)),
        other => Err(RuntimeErrorKind::BadOperand {
            op: "-",
            operand: other.type_name(),
        }),
    }
}

fn mismatch<F: Callable>(op: BinaryOp, lhs: &Value<F>, rhs: &Value<F>) -> RuntimeErrorKind {
    RuntimeErrorKind::TypeMismatch {
        op,
        left: lhs.type_name(),
        right: rhs.type_name(),
    }
}

fn add<F: Callable>(lhs: &Value<F>, rhs: &Value<F>) -> RuntimeResult<Value<F>> {
    if let (Value::Str(a), Value::Str(b)) = (lhs, rhs) {
        let mut joined = String::with_capacity(a.len() + b.len());
        joined.push_str(a);
        joined.push_str(b);
        return Ok(Value::Str(Rc::from(joined)));
    }
    arithmetic(BinaryOp::Add, lhs, rhs, i64::checked_add, |a, b| a + b)
}

fn arithmetic<F: Callable>(
    op: BinaryOp,
    lhs: &Value<F>,
    rhs: &Value<F>,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> RuntimeResult<Value<F>> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => int_op(*a, *b)
            .map(Value::Int)
            .ok_or(RuntimeErrorKind::IntegerOverflow),
        _ => match (lhs.as_f64(), rhs.as_f64()) {
            (Some(a), Some(b)) => Ok(Value::Float(float_op(a, b))),
            _ => Err(mismatch(op, lhs, rhs)),
        },
    }
}

fn divide<F: Callable>(lhs: &Value<F>, rhs: &Value<F>) -> RuntimeResult<Value<F>> {
    match (lhs.as_f64(), rhs.as_f64()) {
        (Some(_), Some(b)) if b == 0.0 => Err(RuntimeErrorKind::DivisionByZero),
        (Some(a), Some(b)) => Ok(Value::Float(a / b)),
        _ => Err(mismatch(BinaryOp::Div, lhs, rhs)),
    }
}

/// Orders two values; `None` when incomparable (a NaN operand).
fn compare<F: Callable>(
    op: BinaryOp,
    lhs: &Value<F>,
    rhs: &Value<F>,
) -> RuntimeResult<Option<Ordering>> {
    match (lhs, rhs) {
        (Value::Str(a), Value::Str(b)) => Ok(Some(a.cmp(b))),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            Ok(lhs.numeric_cmp(rhs))
        }
        _ => Err(mismatch(op, lhs, rhs)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::tests::V;

    fn s(text: &str) -> V {
        V::Str(Rc::from(text))
    }

    #[test]
    fn test_int_arithmetic_stays_int() {
        assert_eq!(binary(BinaryOp::Add, &V::Int(2), &V::Int(3)), Ok(V::Int(5)));
        assert!(matches!(binary(BinaryOp::Mul, &V::Int(4), &V::Int(5)), Ok(V::Int(20))));
        assert!(matches!(binary(BinaryOp::Sub, &V::Int(3), &V::Int(10)), Ok(V::Int(-7))));
    }

    #[test]
    fn test_float_contaminates() {
        assert!(matches!(
            binary(BinaryOp::Add, &V::Int(1), &V::Float(0.5)),
            Ok(V::Float(x)) if x == 1.5
        ));
    }

    #[test]
    fn test_division_always_float() {
        assert!(matches!(
            binary(BinaryOp::Div, &V::Int(7), &V::Int(2)),
            Ok(V::Float(x)) if x == 3.5
        ));
        assert!(matches!(
            binary(BinaryOp::Div, &V::Int(10), &V::Int(2)),
            Ok(V::Float(x)) if x == 5.0
        ));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(
            binary(BinaryOp::Div, &V::Int(1), &V::Int(0)),
            Err(RuntimeErrorKind::DivisionByZero)
        );
        assert_eq!(
            binary(BinaryOp::Div, &V::Float(1.0), &V::Float(0.0)),
            Err(RuntimeErrorKind::DivisionByZero)
        );
    }

    #[test]
    fn test_overflow() {
        assert_eq!(
            binary(BinaryOp::Add, &V::Int(i64::MAX), &V::Int(1)),
            Err(RuntimeErrorKind::IntegerOverflow)
        );
        assert_eq!(negate(&V::Int(i64::MIN)), Err(RuntimeErrorKind::IntegerOverflow));
    }

    #[test]
    fn test_string_concatenation() {
        assert_eq!(binary(BinaryOp::Add, &s("foo"), &s("bar")), Ok(s("foobar")));
        assert_eq!(
            binary(BinaryOp::Add, &s("n = "), &V::Int(1)),
            Err(RuntimeErrorKind::TypeMismatch {
                op: BinaryOp::Add,
                left: "str",
                right: "int",
            })
        );
        assert!(binary(BinaryOp::Mul, &s("ab"), &V::Int(2)).is_err());
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(binary(BinaryOp::Lt, &V::Int(1), &V::Int(2)), Ok(V::Bool(true)));
        assert_eq!(binary(BinaryOp::Gte, &V::Float(2.0), &V::Int(2)), Ok(V::Bool(true)));
        assert_eq!(binary(BinaryOp::Gt, &s("apple"), &s("banana")), Ok(V::Bool(false)));
        assert_eq!(binary(BinaryOp::Lte, &V::Float(f64::NAN), &V::Int(0)), Ok(V::Bool(false)));
    }

    #[test]
    fn test_mixed_comparisons_beyond_f64_precision() {
        let big = V::Int(9_007_199_254_740_993);
        let float = V::Float(9_007_199_254_740_992.0);
        assert_eq!(binary(BinaryOp::Eq, &big, &float), Ok(V::Bool(false)));
        assert_eq!(binary(BinaryOp::Gt, &big, &float), Ok(V::Bool(true)));
        assert_eq!(binary(BinaryOp::Lte, &float, &big), Ok(V::Bool(true)));
    }

    #[test]
    fn test_equality_never_fails() {
        assert_eq!(binary(BinaryOp::Eq, &s("1"), &V::Int(1)), Ok(V::Bool(false)));
        assert_eq!(binary(BinaryOp::Neq, &V::None, &V::Int(0)), Ok(V::Bool(true)));
    }

    #[test]
    fn test_ordering_booleans_fails() {
        let chained_left = binary(BinaryOp::Lt, &V::Int(1), &V::Int(2)).unwrap();
        assert_eq!(
            binary(BinaryOp::Lt, &chained_left, &V::Int(3)),
            Err(RuntimeErrorKind::TypeMismatch {
                op: BinaryOp::Lt,
                left: "bool",
                right: "int",
            })
        );
    }

    #[test]
    fn test_negate() {
        assert_eq!(negate(&V::Int(4)), Ok(V::Int(-4)));
        assert!(matches!(negate(&V::Float(0.5)), Ok(V::Float(x)) if x == -0.5));
        assert_eq!(
            negate(&s("x")),
            Err(RuntimeErrorKind::BadOperand { op: "-", operand: "str" })
        );
    }
}
