//! AST evaluation.
//!
//! Statements return a [`Flow`] so that `return` unwinds exactly one call:
//! every block stops at the first `Flow::Return` and hands it up, and the
//! call that ran the body turns it back into a value.
//!
//! Frames live in a per-run [`Heap`]. When a call returns, unreachable
//! frames may be collected; the roots are the frames of the calls still
//! active, the callees and arguments of calls whose arguments are still
//! being evaluated, and the value being returned. Each statement and
//! expression step runs under [`pyrite_mem::stack::guarded`], so nesting
//! is bounded by the configured call depth rather than the thread's stack.

use crate::closure::{Closure, InterpValue};
use crate::error::{InterpResult, RuntimeError};
use pyrite_mem::Symbol;
use pyrite_runtime::{
    Callable, FrameId, Heap, HeapStats, RuntimeConfig, RuntimeErrorKind, Value, builtins, ops,
};
use pyrite_sema::CheckedProgram;
use pyrite_syntax::ast::{Expr, Number, Program, Stmt, UnaryOp};
use pyrite_syntax::{Span, Spanned};
use std::io::Write;
use std::rc::Rc;

/// Outcome of executing a statement.
#[derive(Debug)]
pub enum Flow {
    /// Continue with the next statement
    Normal,
    /// Leave the current call with this value
    Return(InterpValue),
}

/// Tree-walking interpreter writing program output to `W`.
///
/// # Examples
///
/// ```
/// use pyrite_interpreter::Interpreter;
/// use pyrite_runtime::RuntimeConfig;
///
/// let program = pyrite_syntax::parse_source("print(2 + 3 * 4)\n").unwrap();
/// let checked = pyrite_sema::analyze(program).unwrap();
///
/// let mut interpreter = Interpreter::new(RuntimeConfig::default(), Vec::new());
/// interpreter.interpret(&checked).unwrap();
/// assert_eq!(interpreter.into_output(), b"14\n");
/// ```
pub struct Interpreter<W: Write> {
    config: RuntimeConfig,
    out: W,
    heap_stats: HeapStats,
}

impl<W: Write> Interpreter<W> {
    /// Creates an interpreter.
    #[must_use]
    pub fn new(config: RuntimeConfig, out: W) -> Self {
        Self {
            config,
            out,
            heap_stats: HeapStats::default(),
        }
    }

    /// Runs `checked` from its first statement.
    ///
    /// Every run starts from a fresh module frame holding only the builtins.
    ///
    /// # Errors
    ///
    /// Returns the first runtime fault; output written before it stays
    /// written.
    pub fn interpret(&mut self, checked: &CheckedProgram) -> InterpResult<()> {
        let program = checked.program();
        let mut heap: Heap<Closure> = Heap::new();
        let globals = heap.alloc(None);
        builtins::install(&mut heap, globals);

        pyrite_log::debug!("interpreting {} top-level statements", program.body.len());
        let (result, stats) = {
            let mut eval = Eval {
                program,
                config: self.config,
                out: &mut self.out,
                heap,
                frames: vec![globals],
                pending: Vec::new(),
            };
            let result = eval.exec_block(&program.body, globals);
            (result, eval.heap.stats())
        };
        self.heap_stats = stats;
        pyrite_log::debug!(
            "{} frames allocated, {} reclaimed in {} collections",
            stats.allocated,
            stats.reclaimed,
            stats.collections
        );

        match result {
            Ok(_) => {
                self.out.flush().map_err(|err| {
                    RuntimeError::new(
                        RuntimeErrorKind::Output {
                            message: err.to_string(),
                        },
                        program.span,
                    )
                })?;
                Ok(())
            }
            Err(err) => {
                pyrite_log::debug!("runtime fault at {}: {}", err.span, err.kind);
                Err(err)
            }
        }
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Frame counters of the most recent run.
    #[must_use]
    pub fn heap_stats(&self) -> HeapStats {
        self.heap_stats
    }

    /// Consumes the interpreter, returning the output sink.
    #[must_use]
    pub fn into_output(self) -> W {
        self.out
    }
}

/// State of one run.
struct Eval<'a> {
    program: &'a Program,
    config: RuntimeConfig,
    out: &'a mut dyn Write,
    heap: Heap<Closure>,
    /// Module frame, then one frame per active call
    frames: Vec<FrameId>,
    /// Callees and arguments of calls still evaluating their arguments
    pending: Vec<InterpValue>,
}

impl Eval<'_> {
    fn exec_block(&mut self, stmts: &[Stmt], env: FrameId) -> InterpResult<Flow> {
        for stmt in stmts {
            if let Flow::Return(value) = self.exec_stmt(stmt, env)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_stmt(&mut self, stmt: &Stmt, env: FrameId) -> InterpResult<Flow> {
        pyrite_mem::stack::guarded(|| self.exec_stmt_inner(stmt, env))
    }

    fn exec_stmt_inner(&mut self, stmt: &Stmt, env: FrameId) -> InterpResult<Flow> {
        match stmt {
            Stmt::Assign { target, value, .. } => {
                let value = self.eval(value, env)?;
                self.heap.define(env, *target, value);
                Ok(Flow::Normal)
            }
            Stmt::If {
                condition,
                then_body,
                elifs,
                else_body,
                ..
            } => {
                if self.condition(condition, env)? {
                    return self.exec_block(then_body, env);
                }
                for elif in elifs {
                    if self.condition(&elif.condition, env)? {
                        return self.exec_block(&elif.body, env);
                    }
                }
                match else_body {
                    Some(body) => self.exec_block(body, env),
                    None => Ok(Flow::Normal),
                }
            }
            Stmt::While {
                condition, body, ..
            } => {
                while self.condition(condition, env)? {
                    if let Flow::Return(value) = self.exec_block(body, env)? {
                        return Ok(Flow::Return(value));
                    }
                }
                Ok(Flow::Normal)
            }
            Stmt::FunctionDef(def) => {
                let name = self
                    .program
                    .interner
                    .resolve_shared(def.name)
                    .unwrap_or_else(|| Rc::from("<unknown>"));
                let closure = Closure::new(name, Rc::clone(def), env);
                self.heap.define(env, def.name, Value::Function(closure));
                Ok(Flow::Normal)
            }
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.eval(expr, env)?,
                    None => Value::None,
                };
                Ok(Flow::Return(value))
            }
            Stmt::Expr { expr, .. } => {
                self.eval(expr, env)?;
                Ok(Flow::Normal)
            }
        }
    }

    fn condition(&mut self, expr: &Expr, env: FrameId) -> InterpResult<bool> {
        self.eval(expr, env)?
            .truth()
            .map_err(|kind| RuntimeError::new(kind, expr.span()))
    }

    fn eval(&mut self, expr: &Expr, env: FrameId) -> InterpResult<InterpValue> {
        pyrite_mem::stack::guarded(|| self.eval_inner(expr, env))
    }

    fn eval_inner(&mut self, expr: &Expr, env: FrameId) -> InterpResult<InterpValue> {
        match expr {
            Expr::Number { value, .. } => Ok(match *value {
                Number::Int(n) => Value::Int(n),
                Number::Float(x) => Value::Float(x),
            }),
            Expr::Str { value, .. } => Ok(Value::Str(
                self.program
                    .interner
                    .resolve_shared(*value)
                    .unwrap_or_else(|| Rc::from("")),
            )),
            Expr::Identifier { name, span } => self.load(*name, *span, env),
            Expr::Unary {
                op: UnaryOp::Neg,
                operand,
                span,
            } => {
                let value = self.eval(operand, env)?;
                ops::negate(&value).map_err(|kind| RuntimeError::new(kind, *span))
            }
            Expr::Binary {
                left,
                op,
                op_span,
                right,
                ..
            } => {
                // A function operand is only ever compared by identity, so
                // `lhs` needs no rooting while `right` runs.
                let lhs = self.eval(left, env)?;
                let rhs = self.eval(right, env)?;
                ops::binary(*op, &lhs, &rhs).map_err(|kind| RuntimeError::new(kind, *op_span))
            }
            Expr::Call {
                callee,
                callee_span,
                args,
                span,
            } => {
                let base = self.pending.len();
                let function = self.load(*callee, *callee_span, env)?;
                self.pending.push(function);
                for arg in args {
                    let value = self.eval(arg, env)?;
                    self.pending.push(value);
                }
                let mut values = self.pending.split_off(base);
                let function = values.remove(0);
                self.call(function, values, *span)
            }
        }
    }

    fn load(&self, name: Symbol, span: Span, env: FrameId) -> InterpResult<InterpValue> {
        self.heap.lookup(env, name).ok_or_else(|| {
            RuntimeError::new(
                RuntimeErrorKind::UndefinedName {
                    name: self.program.resolve(name).to_string(),
                },
                span,
            )
        })
    }

    /// Calls `function`: arity, then depth, then a fresh frame under the
    /// closure's captured frame. Collects unreachable frames on the way out
    /// once enough have piled up.
    fn call(
        &mut self,
        function: InterpValue,
        args: Vec<InterpValue>,
        span: Span,
    ) -> InterpResult<InterpValue> {
        let closure = match function {
            Value::Function(closure) => closure,
            Value::Builtin(builtin) => {
                return builtin
                    .call(&args, self.out)
                    .map_err(|kind| RuntimeError::new(kind, span));
            }
            other => {
                return Err(RuntimeError::new(
                    RuntimeErrorKind::NotCallable {
                        type_name: other.type_name(),
                    },
                    span,
                ));
            }
        };

        if args.len() != closure.arity() {
            return Err(RuntimeError::new(
                RuntimeErrorKind::ArityMismatch {
                    name: closure.name().to_string(),
                    expected: closure.arity(),
                    found: args.len(),
                },
                span,
            ));
        }
        let depth = self.frames.len() - 1;
        if depth >= self.config.max_call_depth {
            return Err(RuntimeError::new(
                RuntimeErrorKind::RecursionLimit {
                    limit: self.config.max_call_depth,
                },
                span,
            ));
        }

        pyrite_log::trace!("call {} at depth {}", closure.name(), depth + 1);
        let frame = self.heap.alloc(Some(closure.env()));
        for (param, value) in closure.def().params.iter().zip(args) {
            self.heap.define(frame, param.name, value);
        }

        self.frames.push(frame);
        let flow = self.exec_block(&closure.def().body, frame);
        self.frames.pop();

        let value = match flow? {
            Flow::Return(value) => value,
            Flow::Normal => Value::None,
        };
        if self.heap.wants_collection() {
            let freed = self.heap.collect(
                self.frames.iter().copied(),
                self.pending.iter().chain(std::iter::once(&value)),
            );
            pyrite_log::trace!("collected {freed} frames, {} live", self.heap.live());
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_with(source: &str, config: RuntimeConfig) -> (String, InterpResult<()>) {
        let program = pyrite_syntax::parse_source(source).unwrap();
        let checked = pyrite_sema::analyze(program).unwrap();
        let mut interpreter = Interpreter::new(config, Vec::new());
        let result = interpreter.interpret(&checked);
        (String::from_utf8(interpreter.into_output()).unwrap(), result)
    }

    fn run(source: &str) -> String {
        let (out, result) = run_with(source, RuntimeConfig::default());
        result.unwrap();
        out
    }

    fn fault(source: &str) -> RuntimeError {
        run_with(source, RuntimeConfig::default()).1.unwrap_err()
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(run("print(2 + 3 * 4)\n"), "14\n");
        assert_eq!(run("print(10 - 3 - 2)\n"), "5\n");
        assert_eq!(run("print(-(2 + 3) * 2)\n"), "-10\n");
        assert_eq!(run("print(7 / 2, 10 / 2)\n"), "3.5 5.0\n");
    }

    #[test]
    fn test_strings() {
        assert_eq!(run("name = 'world'\nprint('hello, ' + name)\n"), "hello, world\n");
    }

    #[test]
    fn test_no_block_scope() {
        assert_eq!(run("if 1 == 1:\n    x = 1\nprint(x)\n"), "1\n");
    }

    #[test]
    fn test_if_chain_first_match_wins() {
        let source = "\
x = 5
if x < 3:
    print('small')
elif x < 10:
    print('medium')
elif x < 100:
    print('large')
else:
    print('huge')
";
        assert_eq!(run(source), "medium\n");
    }

    #[test]
    fn test_while_loop() {
        let source = "i = 0\ntotal = 0\nwhile i < 5:\n    total = total + i\n    i = i + 1\nprint(total)\n";
        assert_eq!(run(source), "10\n");
    }

    #[test]
    fn test_closures() {
        let source = "def make_adder(x):\n    def add(y):\n        return x + y\n    return add\nadder = make_adder(5)\nprint(adder(3))\n";
        assert_eq!(run(source), "8\n");
    }

    #[test]
    fn test_closure_sees_later_assignment() {
        let source = "\
def make():
    n = 1
    def get():
        return n
    n = 2
    return get
g = make()
print(g())
";
        assert_eq!(run(source), "2\n");
    }

    #[test]
    fn test_recursion() {
        let source = "def fact(n):\n    if n == 0:\n        return 1\n    else:\n        return n * fact(n - 1)\nprint(fact(5))\n";
        assert_eq!(run(source), "120\n");
    }

    #[test]
    fn test_return_unwinds_only_one_call() {
        let source = "\
def inner():
    return 1
def outer():
    inner()
    print('after inner')
    return 2
print(outer())
";
        assert_eq!(run(source), "after inner\n2\n");
    }

    #[test]
    fn test_return_from_loop() {
        let source = "def first_over(limit):\n    i = 0\n    while 1 == 1:\n        if i > limit:\n            return i\n        i = i + 1\nprint(first_over(3))\n";
        assert_eq!(run(source), "4\n");
    }

    #[test]
    fn test_implicit_none() {
        assert_eq!(run("def f():\n    x = 1\nprint(f())\n"), "None\n");
        assert_eq!(run("print(print)\n"), "<built-in function print>\n");
    }

    #[test]
    fn test_division_by_zero_position() {
        let err = fault("x = 1\ny = x / 0\n");
        assert_eq!(err.kind, RuntimeErrorKind::DivisionByZero);
        assert_eq!((err.line(), err.column()), (2, 7));
    }

    #[test]
    fn test_not_callable() {
        let err = fault("x = 3\nx(1)\n");
        assert_eq!(err.kind, RuntimeErrorKind::NotCallable { type_name: "int" });
        assert_eq!((err.line(), err.column()), (2, 1));
    }

    #[test]
    fn test_arity_mismatch() {
        let err = fault("def f(a, b):\n    return a\nf(1)\n");
        assert_eq!(
            err.kind,
            RuntimeErrorKind::ArityMismatch {
                name: "f".to_string(),
                expected: 2,
                found: 1,
            }
        );
    }

    #[test]
    fn test_non_boolean_condition() {
        let err = fault("x = 1\nwhile x:\n    x = 0\n");
        assert_eq!(err.kind, RuntimeErrorKind::NonBooleanCondition { type_name: "int" });
        assert_eq!((err.line(), err.column()), (2, 7));
    }

    #[test]
    fn test_chained_comparison_faults() {
        let err = fault("print(1 < 2 < 3)\n");
        assert!(matches!(err.kind, RuntimeErrorKind::TypeMismatch { .. }));
        assert_eq!(err.column(), 13);
    }

    #[test]
    fn test_recursion_limit() {
        let source = "def down(n):\n    return down(n + 1)\ndown(0)\n";
        let (_, result) = run_with(source, RuntimeConfig::default().with_max_call_depth(50));
        let err = result.unwrap_err();
        assert_eq!(err.kind, RuntimeErrorKind::RecursionLimit { limit: 50 });
        assert_eq!((err.line(), err.column()), (2, 12));
    }

    #[test]
    fn test_call_before_definition() {
        let err = fault("f()\ndef f():\n    return 1\n");
        assert_eq!(
            err.kind,
            RuntimeErrorKind::UndefinedName {
                name: "f".to_string()
            }
        );
    }

    #[test]
    fn test_output_before_fault_is_kept() {
        let (out, result) = run_with("print('a')\nprint(1 / 0)\nprint('b')\n", RuntimeConfig::default());
        assert_eq!(out, "a\n");
        assert!(result.is_err());
    }

    const COUNT: &str = "\
def count(n):
    if n == 0:
        return 0
    else:
        return 1 + count(n - 1)
";

    #[test]
    fn test_default_depth_limit_is_reachable() {
        assert_eq!(run(&format!("{COUNT}print(count(999))\n")), "999\n");

        let err = fault(&format!("{COUNT}print(count(1000))\n"));
        assert_eq!(err.kind, RuntimeErrorKind::RecursionLimit { limit: 1000 });
    }

    #[test]
    fn test_large_configured_depth() {
        let config = RuntimeConfig::default().with_max_call_depth(10_000);
        let (out, result) = run_with(&format!("{COUNT}print(count(5000))\n"), config);
        result.unwrap();
        assert_eq!(out, "5000\n");
    }

    const MAKE_ADDER: &str = "\
def make_adder(x):
    def add(y):
        return x + y
    return add
";

    fn heap_stats(source: &str) -> (String, HeapStats) {
        let program = pyrite_syntax::parse_source(source).unwrap();
        let checked = pyrite_sema::analyze(program).unwrap();
        let mut interpreter = Interpreter::new(RuntimeConfig::default(), Vec::new());
        interpreter.interpret(&checked).unwrap();
        let stats = interpreter.heap_stats();
        (String::from_utf8(interpreter.into_output()).unwrap(), stats)
    }

    #[test]
    fn test_closure_factory_frames_are_reclaimed() {
        let source = format!(
            "{MAKE_ADDER}i = 0\nwhile i < 5000:\n    make_adder(i)\n    i = i + 1\nprint(i)\n"
        );
        let (out, stats) = heap_stats(&source);
        assert_eq!(out, "5000\n");
        assert_eq!(stats.allocated, 5001);
        assert!(stats.reclaimed >= 4500, "{stats:?}");
        assert!(stats.peak <= 2 * pyrite_runtime::heap::MIN_COLLECT_THRESHOLD, "{stats:?}");
    }

    #[test]
    fn test_live_closures_survive_collection() {
        let source = format!(
            "{MAKE_ADDER}keep = make_adder(100)\ni = 0\nwhile i < 2000:\n    last = make_adder(i)\n    i = i + 1\nprint(keep(1), last(1))\n"
        );
        let (out, stats) = heap_stats(&source);
        assert_eq!(out, "101 2000\n");
        assert!(stats.collections > 0);
    }

    #[test]
    fn test_pending_arguments_survive_collection() {
        let source = format!(
            "\
{MAKE_ADDER}def churn(n):
    i = 0
    while i < 600:
        make_adder(i)
        i = i + 1
    return make_adder(n)
def apply_both(f, g):
    return f(1) + g(2)
print(apply_both(churn(10), churn(20)))
"
        );
        let (out, stats) = heap_stats(&source);
        assert_eq!(out, "33\n");
        assert!(stats.collections > 0);
    }

    #[test]
    fn test_runs_are_independent() {
        let program = pyrite_syntax::parse_source("print(1)\n").unwrap();
        let checked = pyrite_sema::analyze(program).unwrap();
        let mut interpreter = Interpreter::new(RuntimeConfig::default(), Vec::new());
        interpreter.interpret(&checked).unwrap();
        interpreter.interpret(&checked).unwrap();
        assert_eq!(interpreter.into_output(), b"1\n1\n");
    }
}
