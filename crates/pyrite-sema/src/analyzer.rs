//! Name resolution over the AST.
//!
//! The analyzer walks the tree once with a [`Scopes`] stack seeded with the
//! builtins. Before the statements of the module body or of a function body
//! are checked, the functions defined directly in that body are declared, so
//! sibling functions may call each other regardless of definition order.

use crate::error::{SemaResult, SemanticError};
use crate::scope::{DeclKind, ScopeKind, Scopes};
use pyrite_syntax::ast::{Expr, FunctionDef, Program, Stmt};
use pyrite_syntax::keywords::PRINT;
use pyrite_syntax::{Span, Spanned};

/// A program whose every name read resolves to a declaration.
///
/// Only [`analyze`] creates one, so holding a `CheckedProgram` is proof the
/// program passed analysis. Both execution backends require it.
#[derive(Debug, Clone)]
pub struct CheckedProgram {
    program: Program,
    functions: usize,
}

impl CheckedProgram {
    /// The analyzed tree.
    #[must_use]
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Number of function definitions in the program, at any depth.
    #[must_use]
    pub fn function_count(&self) -> usize {
        self.functions
    }

    /// Gives back the tree, dropping the certificate.
    #[must_use]
    pub fn into_program(self) -> Program {
        self.program
    }
}

/// Checks `program`, certifying it on success.
///
/// # Errors
///
/// Returns the first undeclared read, duplicate parameter, or module-level
/// `return`, in source order.
///
/// # Examples
///
/// ```
/// let program = pyrite_syntax::parse_source("x = 1\nprint(y)\n").unwrap();
/// let err = pyrite_sema::analyze(program).unwrap_err();
/// assert_eq!(err.to_string(), "name 'y' is not defined");
/// ```
pub fn analyze(program: Program) -> SemaResult<CheckedProgram> {
    let mut analyzer = Analyzer::new(&program);
    analyzer.check_body(&program.body)?;
    let functions = analyzer.functions;

    pyrite_log::debug!("analysis passed ({functions} function definitions)");
    Ok(CheckedProgram { program, functions })
}

struct Analyzer<'p> {
    program: &'p Program,
    scopes: Scopes,
    functions: usize,
}

impl<'p> Analyzer<'p> {
    fn new(program: &'p Program) -> Self {
        let mut scopes = Scopes::new();
        scopes.declare(PRINT, DeclKind::Builtin, Span::default());
        Self {
            program,
            scopes,
            functions: 0,
        }
    }

    /// Checks a module or function body, hoisting its direct `def`s.
    fn check_body(&mut self, body: &[Stmt]) -> SemaResult<()> {
        for stmt in body {
            if let Stmt::FunctionDef(def) = stmt {
                self.scopes.declare(def.name, DeclKind::Function, def.name_span);
            }
        }
        self.check_stmts(body)
    }

    fn check_stmts(&mut self, stmts: &[Stmt]) -> SemaResult<()> {
        stmts.iter().try_for_each(|stmt| self.check_stmt(stmt))
    }

    fn check_stmt(&mut self, stmt: &Stmt) -> SemaResult<()> {
        pyrite_mem::stack::guarded(|| self.check_stmt_inner(stmt))
    }

    fn check_stmt_inner(&mut self, stmt: &Stmt) -> SemaResult<()> {
        match stmt {
            Stmt::Assign {
                target,
                target_span,
                value,
                ..
            } => {
                self.check_expr(value)?;
                self.scopes.declare(*target, DeclKind::Variable, *target_span);
                Ok(())
            }
            Stmt::If {
                condition,
                then_body,
                elifs,
                else_body,
                ..
            } => {
                self.check_expr(condition)?;
                self.check_stmts(then_body)?;
                for elif in elifs {
                    self.check_expr(&elif.condition)?;
                    self.check_stmts(&elif.body)?;
                }
                if let Some(body) = else_body {
                    self.check_stmts(body)?;
                }
                Ok(())
            }
            Stmt::While {
                condition, body, ..
            } => {
                self.check_expr(condition)?;
                self.check_stmts(body)
            }
            Stmt::FunctionDef(def) => self.check_function(def),
            Stmt::Return { value, span } => {
                if !self.scopes.in_function() {
                    return Err(SemanticError::ReturnOutsideFunction { span: *span });
                }
                value.as_ref().map_or(Ok(()), |v| self.check_expr(v))
            }
            Stmt::Expr { expr, .. } => self.check_expr(expr),
        }
    }

    fn check_function(&mut self, def: &FunctionDef) -> SemaResult<()> {
        self.functions += 1;
        self.scopes.declare(def.name, DeclKind::Function, def.name_span);
        pyrite_log::trace!("checking function '{}'", self.program.resolve(def.name));

        self.scopes.push(ScopeKind::Function);
        for param in &def.params {
            if self.scopes.declared_locally(param.name) {
                return Err(SemanticError::DuplicateParameter {
                    name: self.program.resolve(param.name).to_string(),
                    function: self.program.resolve(def.name).to_string(),
                    span: param.span,
                });
            }
            self.scopes.declare(param.name, DeclKind::Parameter, param.span);
        }
        self.check_body(&def.body)?;
        self.scopes.pop();

        Ok(())
    }

    fn check_expr(&mut self, expr: &Expr) -> SemaResult<()> {
        pyrite_mem::stack::guarded(|| self.check_expr_inner(expr))
    }

    fn check_expr_inner(&mut self, expr: &Expr) -> SemaResult<()> {
        match expr {
            Expr::Number { .. } | Expr::Str { .. } => Ok(()),
            Expr::Identifier { name, span } => self.resolve(*name, *span),
            Expr::Unary { operand, .. } => self.check_expr(operand),
            Expr::Binary { left, right, .. } => {
                self.check_expr(left)?;
                self.check_expr(right)
            }
            Expr::Call {
                callee,
                callee_span,
                args,
                ..
            } => {
                self.resolve(*callee, *callee_span)?;
                args.iter().try_for_each(|arg| self.check_expr(arg))
            }
        }
    }

    fn resolve(&self, name: pyrite_mem::Symbol, span: Span) -> SemaResult<()> {
        if self.scopes.lookup(name).is_some() {
            Ok(())
        } else {
            Err(SemanticError::Undeclared {
                name: self.program.resolve(name).to_string(),
                span,
            })
        }
    }
}

impl Spanned for CheckedProgram {
    fn span(&self) -> Span {
        self.program.span
    }
}
