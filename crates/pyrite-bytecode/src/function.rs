//! Function values of the bytecode backend.

use pyrite_runtime::{Callable, FrameId, Value};
use std::fmt;
use std::rc::Rc;

/// Value type of the VM.
pub type VmValue = Value<Function>;

/// A prototype paired with the frame `MAKE_FUNCTION` ran in.
///
/// Cloning shares the function; identity is the shared allocation.
#[derive(Clone)]
pub struct Function(Rc<FunctionData>);

struct FunctionData {
    proto: usize,
    name: Rc<str>,
    arity: usize,
    env: FrameId,
}

impl Function {
    /// Captures `env` for prototype `proto`.
    #[must_use]
    pub fn new(proto: usize, name: Rc<str>, arity: usize, env: FrameId) -> Self {
        Self(Rc::new(FunctionData {
            proto,
            name,
            arity,
            env,
        }))
    }

    /// Index of the prototype in its unit.
    #[must_use]
    pub fn proto(&self) -> usize {
        self.0.proto
    }
}

impl Callable for Function {
    fn name(&self) -> &str {
        &self.0.name
    }

    fn arity(&self) -> usize {
        self.0.arity
    }

    fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn env(&self) -> FrameId {
        self.0.env
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("proto", &self.0.proto)
            .field("name", &self.0.name)
            .field("arity", &self.0.arity)
            .field("env", &self.0.env)
            .finish_non_exhaustive()
    }
}
