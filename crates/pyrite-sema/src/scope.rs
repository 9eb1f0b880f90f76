//! Lexical scope stack.
//!
//! One scope exists for the module and one per function body being
//! analyzed. Control-flow blocks never open a scope, so a name assigned in an
//! `if` or `while` body belongs to the enclosing function or module.
//!
//! # Examples
//!
//! ```
//! use pyrite_mem::Symbol;
//! use pyrite_sema::scope::{DeclKind, ScopeKind, Scopes};
//! use pyrite_syntax::Span;
//!
//! let x = Symbol::new(10);
//! let mut scopes = Scopes::new();
//! scopes.declare(x, DeclKind::Variable, Span::default());
//!
//! scopes.push(ScopeKind::Function);
//! assert!(scopes.lookup(x).is_some());
//! scopes.pop();
//! assert_eq!(scopes.depth(), 1);
//! ```

use fxhash::FxHashMap;
use pyrite_mem::Symbol;
use pyrite_syntax::Span;

/// What introduced a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    /// Provided by the runtime
    Builtin,
    /// Bound by assignment
    Variable,
    /// Bound by `def`
    Function,
    /// Function parameter
    Parameter,
}

/// A declared name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decl {
    /// What introduced the name
    pub kind: DeclKind,
    /// Where it was first declared in its scope
    pub span: Span,
}

/// The construct a scope belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Top level
    Module,
    /// A function body
    Function,
}

#[derive(Debug)]
struct Scope {
    kind: ScopeKind,
    names: FxHashMap<Symbol, Decl>,
}

/// Stack of scopes, innermost last. The module scope is never popped.
#[derive(Debug)]
pub struct Scopes {
    stack: Vec<Scope>,
}

impl Scopes {
    /// Creates a stack holding only an empty module scope.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stack: vec![Scope {
                kind: ScopeKind::Module,
                names: FxHashMap::default(),
            }],
        }
    }

    /// Opens a scope.
    pub fn push(&mut self, kind: ScopeKind) {
        self.stack.push(Scope {
            kind,
            names: FxHashMap::default(),
        });
    }

    /// Closes the innermost scope.
    pub fn pop(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    /// Number of open scopes.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// True while analyzing a function body at any depth.
    #[must_use]
    pub fn in_function(&self) -> bool {
        self.stack.iter().any(|s| s.kind == ScopeKind::Function)
    }

    /// Declares `name` in the innermost scope. Redeclaring keeps the first
    /// declaration's record.
    pub fn declare(&mut self, name: Symbol, kind: DeclKind, span: Span) {
        if let Some(scope) = self.stack.last_mut() {
            scope.names.entry(name).or_insert(Decl { kind, span });
        }
    }

    /// True if the innermost scope declares `name`.
    #[must_use]
    pub fn declared_locally(&self, name: Symbol) -> bool {
        self.stack
            .last()
            .is_some_and(|scope| scope.names.contains_key(&name))
    }

    /// Finds `name`, searching innermost to outermost.
    #[must_use]
    pub fn lookup(&self, name: Symbol) -> Option<&Decl> {
        self.stack.iter().rev().find_map(|scope| scope.names.get(&name))
    }
}

impl Default for Scopes {
    fn default() -> Self {
        Self::new()
    }
}
