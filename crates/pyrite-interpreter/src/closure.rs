//! Function values of the tree-walking backend.

use pyrite_runtime::{Callable, FrameId, Value};
use pyrite_syntax::ast::FunctionDef;
use std::fmt;
use std::rc::Rc;

/// Value type of the interpreter.
pub type InterpValue = Value<Closure>;

/// A `def` paired with the frame it was evaluated in.
///
/// Cloning shares the closure; identity is the shared allocation.
#[derive(Clone)]
pub struct Closure(Rc<ClosureData>);

struct ClosureData {
    name: Rc<str>,
    def: Rc<FunctionDef>,
    env: FrameId,
}

impl Closure {
    /// Captures `env` for `def`.
    #[must_use]
    pub fn new(name: Rc<str>, def: Rc<FunctionDef>, env: FrameId) -> Self {
        Self(Rc::new(ClosureData { name, def, env }))
    }

    /// The definition the closure runs.
    #[must_use]
    pub fn def(&self) -> &Rc<FunctionDef> {
        &self.0.def
    }
}

impl Callable for Closure {
    fn name(&self) -> &str {
        &self.0.name
    }

    fn arity(&self) -> usize {
        self.0.def.arity()
    }

    fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn env(&self) -> FrameId {
        self.0.env
    }
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("name", &self.0.name)
            .field("arity", &self.arity())
            .field("env", &self.0.env)
            .finish_non_exhaustive()
    }
}
