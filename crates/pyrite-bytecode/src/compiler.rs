//! Code generation.
//!
//! Walks a checked program once, emitting instructions into the prototype
//! currently being compiled. Each `def` opens a new prototype; its body is
//! compiled there and the enclosing code gets a `MAKE_FUNCTION` + `STORE`
//! at the point the definition runs.
//!
//! Every instruction records the start of the node it came from, chosen to
//! match where the interpreter reports the same fault:
//!
//! | instruction      | position                  |
//! |------------------|---------------------------|
//! | `BINARY`         | the operator token        |
//! | `NEGATE`         | the unary expression      |
//! | `CALL`           | the call (its callee)     |
//! | `LOAD`           | the identifier            |
//! | `JUMP_IF_FALSE`  | the condition             |

use crate::instr::Instr;
use crate::unit::{Constant, ENTRY, ExecutableUnit, FunctionProto};
use fxhash::FxHashMap;
use pyrite_mem::Symbol;
use pyrite_sema::CheckedProgram;
use pyrite_syntax::ast::{Expr, FunctionDef, Number, Program, Stmt, UnaryOp};
use pyrite_syntax::{LineCol, Span, Spanned};
use std::rc::Rc;

/// Compiles a checked program into an executable unit.
///
/// # Examples
///
/// ```
/// use pyrite_bytecode::{Instr, generate};
///
/// let program = pyrite_syntax::parse_source("x = 1\n").unwrap();
/// let checked = pyrite_sema::analyze(program).unwrap();
/// let unit = generate(&checked);
///
/// let code = &unit.entry().code;
/// assert_eq!(code.first(), Some(&Instr::Const(0)));
/// assert_eq!(code.last(), Some(&Instr::Return));
/// ```
#[must_use]
pub fn generate(checked: &CheckedProgram) -> ExecutableUnit {
    let program = checked.program();
    let mut compiler = Compiler {
        program,
        unit: ExecutableUnit::new(),
        current: ENTRY,
        constants: FxHashMap::default(),
    };
    compiler.unit.functions.reserve(checked.function_count());

    compiler.block(&program.body);
    let end = program.span.end_pos();
    compiler.emit(Instr::None, end);
    compiler.emit(Instr::Return, end);

    pyrite_log::debug!(
        "generated {} functions, {} instructions, {} constants",
        compiler.unit.functions.len(),
        compiler.unit.instruction_count(),
        compiler.unit.constants.len()
    );
    compiler.unit
}

/// Constant pool key; floats compare by bit pattern.
#[derive(PartialEq, Eq, Hash)]
enum ConstKey {
    Int(i64),
    Float(u64),
    Str(Rc<str>),
}

struct Compiler<'p> {
    program: &'p Program,
    unit: ExecutableUnit,
    /// Index of the prototype receiving instructions
    current: usize,
    constants: FxHashMap<ConstKey, u32>,
}

impl Compiler<'_> {
    fn proto(&mut self) -> &mut FunctionProto {
        &mut self.unit.functions[self.current]
    }

    fn here(&self) -> u32 {
        self.unit.functions[self.current].code.len() as u32
    }

    fn emit(&mut self, instr: Instr, pos: LineCol) -> usize {
        let proto = self.proto();
        proto.code.push(instr);
        proto.locations.push(pos);
        proto.code.len() - 1
    }

    fn emit_at(&mut self, instr: Instr, span: Span) -> usize {
        self.emit(instr, span.start_pos())
    }

    /// Points the jump at `at` to the next instruction emitted.
    fn patch_jump(&mut self, at: usize) {
        let target = self.here();
        if let Some(Instr::Jump(t) | Instr::JumpIfFalse(t)) = self.proto().code.get_mut(at) {
            *t = target;
        }
    }

    fn name(&mut self, sym: Symbol) -> Symbol {
        let text = self.program.resolve(sym);
        self.unit.names.intern(text)
    }

    fn constant(&mut self, value: Constant) -> u32 {
        let key = match &value {
            Constant::Int(n) => ConstKey::Int(*n),
            Constant::Float(x) => ConstKey::Float(x.to_bits()),
            Constant::Str(s) => ConstKey::Str(Rc::clone(s)),
        };
        if let Some(&index) = self.constants.get(&key) {
            return index;
        }
        let index = self.unit.constants.len() as u32;
        self.unit.constants.push(value);
        self.constants.insert(key, index);
        index
    }

    fn block(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.stmt(stmt);
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        pyrite_mem::stack::guarded(|| self.stmt_inner(stmt));
    }

    fn stmt_inner(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Assign {
                target,
                target_span,
                value,
                ..
            } => {
                self.expr(value);
                let name = self.name(*target);
                self.emit_at(Instr::Store(name), *target_span);
            }
            Stmt::If {
                condition,
                then_body,
                elifs,
                else_body,
                span,
            } => {
                let arms = std::iter::once((condition, then_body))
                    .chain(elifs.iter().map(|elif| (&elif.condition, &elif.body)));
                let last_arm = elifs.len();
                let mut end_jumps = Vec::new();

                for (index, (condition, body)) in arms.enumerate() {
                    self.expr(condition);
                    let skip = self.emit_at(Instr::JumpIfFalse(0), condition.span());
                    self.block(body);
                    if index < last_arm || else_body.is_some() {
                        end_jumps.push(self.emit_at(Instr::Jump(0), *span));
                    }
                    self.patch_jump(skip);
                }
                if let Some(body) = else_body {
                    self.block(body);
                }
                for jump in end_jumps {
                    self.patch_jump(jump);
                }
            }
            Stmt::While {
                condition,
                body,
                span,
            } => {
                let start = self.here();
                self.expr(condition);
                let exit = self.emit_at(Instr::JumpIfFalse(0), condition.span());
                self.block(body);
                self.emit_at(Instr::Jump(start), *span);
                self.patch_jump(exit);
            }
            Stmt::FunctionDef(def) => self.function(def),
            Stmt::Return { value, span } => {
                match value {
                    Some(expr) => self.expr(expr),
                    None => {
                        self.emit_at(Instr::None, *span);
                    }
                }
                self.emit_at(Instr::Return, *span);
            }
            Stmt::Expr { expr, span } => {
                self.expr(expr);
                self.emit_at(Instr::Pop, *span);
            }
        }
    }

    fn function(&mut self, def: &FunctionDef) {
        let name = self.name(def.name);
        let params = def.params.iter().map(|param| self.name(param.name)).collect();
        let index = self.unit.functions.len();
        self.unit.functions.push(FunctionProto::new(name, params));

        let enclosing = std::mem::replace(&mut self.current, index);
        self.block(&def.body);
        let end = def.span.end_pos();
        self.emit(Instr::None, end);
        self.emit(Instr::Return, end);
        self.current = enclosing;

        pyrite_log::trace!(
            "compiled function {} ({} instructions)",
            self.program.resolve(def.name),
            self.unit.functions[index].len()
        );
        self.emit_at(Instr::MakeFunction(index as u32), def.span);
        self.emit_at(Instr::Store(name), def.name_span);
    }

    fn expr(&mut self, expr: &Expr) {
        pyrite_mem::stack::guarded(|| self.expr_inner(expr));
    }

    fn expr_inner(&mut self, expr: &Expr) {
        match expr {
            Expr::Number { value, span } => {
                let constant = match *value {
                    Number::Int(n) => Constant::Int(n),
                    Number::Float(x) => Constant::Float(x),
                };
                let index = self.constant(constant);
                self.emit_at(Instr::Const(index), *span);
            }
            Expr::Str { value, span } => {
                let text = self
                    .program
                    .interner
                    .resolve_shared(*value)
                    .unwrap_or_else(|| Rc::from(""));
                let index = self.constant(Constant::Str(text));
                self.emit_at(Instr::Const(index), *span);
            }
            Expr::Identifier { name, span } => {
                let name = self.name(*name);
                self.emit_at(Instr::Load(name), *span);
            }
            Expr::Unary {
                op: UnaryOp::Neg,
                operand,
                span,
            } => {
                self.expr(operand);
                self.emit_at(Instr::Negate, *span);
            }
            Expr::Binary {
                left,
                op,
                op_span,
                right,
                ..
            } => {
                self.expr(left);
                self.expr(right);
                self.emit_at(Instr::Binary(*op), *op_span);
            }
            Expr::Call {
                callee,
                callee_span,
                args,
                span,
            } => {
                let name = self.name(*callee);
                self.emit_at(Instr::Load(name), *callee_span);
                for arg in args {
                    self.expr(arg);
                }
                self.emit_at(Instr::Call(args.len() as u32), *span);
            }
        }
    }
}
