//! Builtin functions.

use crate::error::{RuntimeErrorKind, RuntimeResult};
use crate::heap::{FrameId, Heap};
use crate::value::{Callable, Value};
use pyrite_mem::Symbol;
use pyrite_syntax::keywords;
use std::io::Write;

/// A function provided by the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// `print(values...)`
    Print,
}

impl Builtin {
    /// Every builtin.
    pub const ALL: [Self; 1] = [Self::Print];

    /// The builtin's name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Print => "print",
        }
    }

    /// The pre-interned symbol the builtin is bound under.
    #[must_use]
    pub const fn symbol(self) -> Symbol {
        match self {
            Self::Print => keywords::PRINT,
        }
    }

    /// Calls the builtin.
    ///
    /// `print` writes its arguments separated by single spaces and ends the
    /// line; it returns `None`.
    ///
    /// # Errors
    ///
    /// Fails with `Output` if the sink rejects the write.
    pub fn call<F: Callable>(
        self,
        args: &[Value<F>],
        out: &mut dyn Write,
    ) -> RuntimeResult<Value<F>> {
        match self {
            Self::Print => {
                let mut line = String::new();
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        line.push(' ');
                    }
                    line.push_str(&arg.to_string());
                }
                line.push('\n');
                out.write_all(line.as_bytes()).map_err(|err| RuntimeErrorKind::Output {
                    message: err.to_string(),
                })?;
                Ok(Value::None)
            }
        }
    }
}

/// Binds every builtin in `frame`.
pub fn install<F: Callable>(heap: &mut Heap<F>, frame: FrameId) {
    for builtin in Builtin::ALL {
        heap.define(frame, builtin.symbol(), Value::Builtin(builtin));
    }
}
