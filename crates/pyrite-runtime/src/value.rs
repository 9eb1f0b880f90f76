//! Runtime values.
//!
//! [`Value`] is generic over the backend's function representation: the
//! tree-walking interpreter stores closures over AST definitions, the VM
//! stores closures over compiled prototypes. Everything else about values,
//! including how they print, is shared.

use crate::builtins::Builtin;
use crate::error::{RuntimeErrorKind, RuntimeResult};
use crate::heap::FrameId;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

/// What a backend's function values must provide.
pub trait Callable: Clone {
    /// Name from the `def`.
    fn name(&self) -> &str;

    /// Number of parameters.
    fn arity(&self) -> usize;

    /// Identity comparison; two function values are equal only if they are
    /// the same closure.
    fn same(&self, other: &Self) -> bool;

    /// The frame the function was defined in.
    fn env(&self) -> FrameId;
}

/// A dynamically typed value.
#[derive(Debug, Clone)]
pub enum Value<F> {
    /// Result of calls that return nothing
    None,
    /// Result of comparisons
    Bool(bool),
    /// Whole number
    Int(i64),
    /// Fractional number
    Float(f64),
    /// Immutable text
    Str(Rc<str>),
    /// User-defined function
    Function(F),
    /// Runtime-provided function
    Builtin(Builtin),
}

impl<F: Callable> Value<F> {
    /// Type name used in error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "NoneType",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::Function(_) => "function",
            Self::Builtin(_) => "builtin_function_or_method",
        }
    }

    /// Reads a condition's value.
    ///
    /// # Errors
    ///
    /// Fails with `NonBooleanCondition` for anything but a boolean.
    pub fn truth(&self) -> RuntimeResult<bool> {
        match self {
            Self::Bool(b) => Ok(*b),
            other => Err(RuntimeErrorKind::NonBooleanCondition {
                type_name: other.type_name(),
            }),
        }
    }

    /// Numeric view, for mixed int/float arithmetic.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Exact ordering of two numbers. Ints are never rounded to floats, so
    /// `9007199254740993` stays greater than `9007199254740992.0`. `None`
    /// for a NaN operand or a non-number.
    #[must_use]
    pub fn numeric_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Int(a), Self::Float(b)) => int_float_cmp(*a, *b),
            (Self::Float(a), Self::Int(b)) => int_float_cmp(*b, *a).map(Ordering::reverse),
            _ => None,
        }
    }

    /// The frame a function value keeps reachable.
    #[must_use]
    pub fn captured(&self) -> Option<FrameId> {
        match self {
            Self::Function(function) => Some(function.env()),
            _ => None,
        }
    }
}

/// Orders an int against a float without converting the int.
fn int_float_cmp(int: i64, float: f64) -> Option<Ordering> {
    // 2^63, the first float above every i64
    const BOUND: f64 = 9_223_372_036_854_775_808.0;

    if float.is_nan() {
        return None;
    }
    if float >= BOUND {
        return Some(Ordering::Less);
    }
    if float < -BOUND {
        return Some(Ordering::Greater);
    }

    let whole = float.trunc();
    Some(int.cmp(&(whole as i64)).then_with(|| {
        let fraction = float - whole;
        if fraction > 0.0 {
            Ordering::Less
        } else if fraction < 0.0 {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }))
}

impl<F: Callable> PartialEq for Value<F> {
    /// Numbers compare by value across int and float; otherwise values of
    /// different kinds are unequal and functions compare by identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::None, Self::None) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Int(_) | Self::Float(_), Self::Int(_) | Self::Float(_)) => {
                self.numeric_cmp(other) == Some(Ordering::Equal)
            }
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => a.same(b),
            (Self::Builtin(a), Self::Builtin(b)) => a == b,
            _ => false,
        }
    }
}

impl<F: Callable> fmt::Display for Value<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Bool(true) => write!(f, "True"),
            Self::Bool(false) => write!(f, "False"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => fmt_float(*x, f),
            Self::Str(s) => write!(f, "{s}"),
            Self::Function(func) => write!(f, "<function {}>", func.name()),
            Self::Builtin(builtin) => write!(f, "<built-in function {}>", builtin.name()),
        }
    }
}

/// Whole floats keep one fractional digit (`5.0`); others print in their
/// shortest round-trip form.
fn fmt_float(x: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if x.is_nan() {
        write!(f, "nan")
    } else if x.is_infinite() {
        write!(f, "{}", if x > 0.0 { "inf" } else { "-inf" })
    } else if x.fract() == 0.0 && x.abs() < 1e16 {
        write!(f, "{x:.1}")
    } else {
        write!(f, "{x}")
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Function representation for exercising the value model alone.
    #[derive(Debug, Clone)]
    pub(crate) struct TestFn(pub Rc<str>, pub FrameId);

    pub(crate) fn test_fn(name: &str) -> TestFn {
        let mut heap = crate::heap::Heap::<TestFn>::new();
        TestFn(Rc::from(name), heap.alloc(None))
    }

    impl Callable for TestFn {
        fn name(&self) -> &str {
            &self.0
        }

        fn arity(&self) -> usize {
            0
        }

        fn same(&self, other: &Self) -> bool {
            Rc::ptr_eq(&self.0, &other.0)
        }

        fn env(&self) -> FrameId {
            self.1
        }
    }

    pub(crate) type V = Value<TestFn>;

    #[test]
    fn test_display() {
        assert_eq!(V::Int(-12).to_string(), "-12");
        assert_eq!(V::Float(5.0).to_string(), "5.0");
        assert_eq!(V::Float(3.5).to_string(), "3.5");
        assert_eq!(V::Float(0.1 + 0.2).to_string(), "0.30000000000000004");
        assert_eq!(V::Float(f64::INFINITY).to_string(), "inf");
        assert_eq!(V::Float(f64::NAN).to_string(), "nan");
        assert_eq!(V::Bool(true).to_string(), "True");
        assert_eq!(V::None.to_string(), "None");
        assert_eq!(V::Str(Rc::from("hi there")).to_string(), "hi there");
        assert_eq!(V::Function(test_fn("add")).to_string(), "<function add>");
        assert_eq!(
            V::Builtin(Builtin::Print).to_string(),
            "<built-in function print>"
        );
    }

    #[test]
    fn test_truth() {
        assert_eq!(V::Bool(false).truth(), Ok(false));
        assert_eq!(
            V::Int(1).truth(),
            Err(RuntimeErrorKind::NonBooleanCondition { type_name: "int" })
        );
    }

    #[test]
    fn test_equality() {
        assert_eq!(V::Int(2), V::Float(2.0));
        assert_ne!(V::Int(1), V::Bool(true));
        assert_ne!(V::Str(Rc::from("1")), V::Int(1));
        assert_eq!(V::None, V::None);

        let f = test_fn("f");
        assert_eq!(V::Function(f.clone()), V::Function(f));
        assert_ne!(V::Function(test_fn("g")), V::Function(test_fn("g")));
    }

    #[test]
    fn test_large_ints_compare_exactly() {
        let above = V::Int(9_007_199_254_740_993);
        let float = V::Float(9_007_199_254_740_992.0);
        assert_ne!(above, float);
        assert_eq!(above.numeric_cmp(&float), Some(Ordering::Greater));
        assert_eq!(float.numeric_cmp(&above), Some(Ordering::Less));
        assert_eq!(V::Int(9_007_199_254_740_992), float);

        assert_eq!(V::Int(i64::MAX).numeric_cmp(&V::Float(9.3e18)), Some(Ordering::Less));
        assert_eq!(V::Int(i64::MIN), V::Float(-9_223_372_036_854_775_808.0));
        assert_eq!(V::Int(-2).numeric_cmp(&V::Float(-2.5)), Some(Ordering::Greater));
        assert_eq!(V::Int(2).numeric_cmp(&V::Float(2.5)), Some(Ordering::Less));
        assert_eq!(V::Int(0).numeric_cmp(&V::Float(f64::NAN)), None);
        assert_eq!(V::Int(1).numeric_cmp(&V::Float(f64::NEG_INFINITY)), Some(Ordering::Greater));
    }

    #[test]
    fn test_captured_frame() {
        let f = test_fn("f");
        assert_eq!(V::Function(f.clone()).captured(), Some(f.1));
        assert_eq!(V::Int(1).captured(), None);
    }
}
