//! Bytecode virtual machine.
//!
//! Calls push a [`CallFrame`] instead of recursing on the host stack, so
//! program recursion depth is bounded only by
//! [`RuntimeConfig::max_call_depth`].
//!
//! Environment frames live in a per-run [`Heap`]. After a `RETURN`, once
//! enough frames have piled up, everything not reachable from the active
//! call frames or the operand stack is collected.

use crate::engine::{ExecutionEngine, Fault};
use crate::function::{Function, VmValue};
use crate::instr::Instr;
use crate::unit::{CodeLocation, Constant, ENTRY, ExecutableUnit, FunctionProto};
use pyrite_runtime::{
    Callable, FrameId, Heap, HeapStats, RuntimeConfig, RuntimeErrorKind, RuntimeResult, Value,
    builtins, ops,
};
use std::io::Write;
use std::rc::Rc;

/// Stack machine writing program output to `W`.
///
/// # Examples
///
/// ```
/// use pyrite_bytecode::{ExecutionEngine, Vm, generate};
/// use pyrite_runtime::RuntimeConfig;
///
/// let program = pyrite_syntax::parse_source("print(10 / 4)\n").unwrap();
/// let checked = pyrite_sema::analyze(program).unwrap();
/// let unit = generate(&checked);
///
/// let mut vm = Vm::new(RuntimeConfig::default(), Vec::new());
/// vm.execute(&unit).unwrap();
/// assert_eq!(vm.into_output(), b"2.5\n");
/// ```
pub struct Vm<W: Write> {
    config: RuntimeConfig,
    out: W,
    heap_stats: HeapStats,
}

impl<W: Write> Vm<W> {
    /// Creates a VM.
    #[must_use]
    pub fn new(config: RuntimeConfig, out: W) -> Self {
        Self {
            config,
            out,
            heap_stats: HeapStats::default(),
        }
    }

    /// Runs `unit`, stopping at the first fault.
    ///
    /// Every run starts from a fresh module frame holding only the builtins.
    ///
    /// # Errors
    ///
    /// Returns the fault and the instruction it occurred at.
    pub fn run(&mut self, unit: &ExecutableUnit) -> Result<(), Fault> {
        let mut heap: Heap<Function> = Heap::new();
        let globals = heap.alloc(None);
        builtins::install(&mut heap, globals);

        pyrite_log::debug!(
            "executing {} functions, {} instructions",
            unit.functions.len(),
            unit.instruction_count()
        );
        let (result, stats) = {
            let mut machine = Machine {
                unit,
                config: self.config,
                out: &mut self.out,
                heap,
                stack: Vec::with_capacity(64),
                frames: vec![CallFrame {
                    function: ENTRY,
                    ip: 0,
                    base: 0,
                    env: globals,
                }],
            };
            let result = machine.run();
            (result, machine.heap.stats())
        };
        self.heap_stats = stats;
        pyrite_log::debug!(
            "{} frames allocated, {} reclaimed in {} collections",
            stats.allocated,
            stats.reclaimed,
            stats.collections
        );

        match result {
            Ok(()) => self.out.flush().map_err(|err| {
                let end = unit.entry().len().saturating_sub(1);
                Fault::new(
                    RuntimeErrorKind::Output {
                        message: err.to_string(),
                    },
                    CodeLocation::new(ENTRY, end),
                )
            }),
            Err(fault) => {
                pyrite_log::debug!("runtime fault at {}: {}", fault.location, fault.kind);
                Err(fault)
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

    /// Consumes the VM, returning the output sink.
    #[must_use]
    pub fn into_output(self) -> W {
        self.out
    }
}

impl<W: Write> ExecutionEngine for Vm<W> {
    fn execute(&mut self, unit: &ExecutableUnit) -> Result<(), Vec<Fault>> {
        self.run(unit).map_err(|fault| vec![fault])
    }
}

/// One active function.
struct CallFrame {
    /// Prototype being run
    function: usize,
    /// Next instruction
    ip: usize,
    /// Stack height when the frame was entered
    base: usize,
    env: FrameId,
}

/// State of one run.
struct Machine<'a> {
    unit: &'a ExecutableUnit,
    config: RuntimeConfig,
    out: &'a mut dyn Write,
    heap: Heap<Function>,
    stack: Vec<VmValue>,
    frames: Vec<CallFrame>,
}

impl<'a> Machine<'a> {
    fn run(&mut self) -> Result<(), Fault> {
        while let Some(frame) = self.frames.last_mut() {
            let location = CodeLocation::new(frame.function, frame.ip);
            let instr = self
                .unit
                .functions
                .get(frame.function)
                .and_then(|proto| proto.code.get(frame.ip))
                .copied()
                .unwrap_or(Instr::Return);
            frame.ip += 1;

            pyrite_log::trace!("{location}  {instr}");
            self.step(instr)
                .map_err(|kind| Fault::new(kind, location))?;
        }
        Ok(())
    }

    fn push(&mut self, value: VmValue) {
        self.stack.push(value);
    }

    fn pop(&mut self) -> VmValue {
        debug_assert!(!self.stack.is_empty(), "operand stack underflow");
        self.stack.pop().unwrap_or(Value::None)
    }

    fn top(&mut self) -> &mut CallFrame {
        let index = self.frames.len() - 1;
        &mut self.frames[index]
    }

    fn env(&self) -> FrameId {
        self.frames[self.frames.len() - 1].env
    }

    fn proto(&self, index: usize) -> RuntimeResult<&'a FunctionProto> {
        let unit = self.unit;
        unit.functions
            .get(index)
            .ok_or_else(|| RuntimeErrorKind::MalformedUnit {
                detail: format!("no function {index}"),
            })
    }

    fn step(&mut self, instr: Instr) -> RuntimeResult<()> {
        match instr {
            Instr::Const(index) => {
                let value = match self.unit.constants.get(index as usize) {
                    Some(Constant::Int(n)) => Value::Int(*n),
                    Some(Constant::Float(x)) => Value::Float(*x),
                    Some(Constant::Str(s)) => Value::Str(Rc::clone(s)),
                    None => {
                        return Err(RuntimeErrorKind::MalformedUnit {
                            detail: format!("no constant {index}"),
                        });
                    }
                };
                self.push(value);
            }
            Instr::None => self.push(Value::None),
            Instr::Load(name) => {
                let value = self.heap.lookup(self.env(), name).ok_or_else(|| {
                    RuntimeErrorKind::UndefinedName {
                        name: self.unit.name(name).to_string(),
                    }
                })?;
                self.push(value);
            }
            Instr::Store(name) => {
                let value = self.pop();
                let env = self.env();
                self.heap.define(env, name, value);
            }
            Instr::MakeFunction(index) => {
                let index = index as usize;
                let proto = self.proto(index)?;
                let name = self
                    .unit
                    .names
                    .resolve_shared(proto.name)
                    .unwrap_or_else(|| Rc::from("<unknown>"));
                let function = Function::new(index, name, proto.arity(), self.env());
                self.push(Value::Function(function));
            }
            Instr::Call(argc) => self.call(argc as usize)?,
            Instr::Return => {
                let value = self.pop();
                if let Some(frame) = self.frames.pop() {
                    self.stack.truncate(frame.base);
                }
                if !self.frames.is_empty() {
                    self.push(value);
                    if self.heap.wants_collection() {
                        let freed = self.heap.collect(
                            self.frames.iter().map(|frame| frame.env),
                            &self.stack,
                        );
                        pyrite_log::trace!("collected {freed} frames, {} live", self.heap.live());
                    }
                }
            }
            Instr::Pop => {
                self.pop();
            }
            Instr::Jump(target) => self.top().ip = target as usize,
            Instr::JumpIfFalse(target) => {
                if !self.pop().truth()? {
                    self.top().ip = target as usize;
                }
            }
            Instr::Binary(op) => {
                let rhs = self.pop();
                let lhs = self.pop();
                self.push(ops::binary(op, &lhs, &rhs)?);
            }
            Instr::Negate => {
                let operand = self.pop();
                self.push(ops::negate(&operand)?);
            }
        }
        Ok(())
    }

    /// Pops `argc` arguments and the callee beneath them, then either runs a
    /// builtin in place or enters a new frame.
    fn call(&mut self, argc: usize) -> RuntimeResult<()> {
        let args = self.stack.split_off(self.stack.len().saturating_sub(argc));
        let function = match self.pop() {
            Value::Function(function) => function,
            Value::Builtin(builtin) => {
                let result = builtin.call(&args, self.out)?;
                self.push(result);
                return Ok(());
            }
            other => {
                return Err(RuntimeErrorKind::NotCallable {
                    type_name: other.type_name(),
                });
            }
        };

        if args.len() != function.arity() {
            return Err(RuntimeErrorKind::ArityMismatch {
                name: function.name().to_string(),
                expected: function.arity(),
                found: args.len(),
            });
        }
        let depth = self.frames.len() - 1;
        if depth >= self.config.max_call_depth {
            return Err(RuntimeErrorKind::RecursionLimit {
                limit: self.config.max_call_depth,
            });
        }

        pyrite_log::trace!("call {} at depth {}", function.name(), depth + 1);
        let proto = self.proto(function.proto())?;
        let env = self.heap.alloc(Some(function.env()));
        for (param, value) in proto.params.iter().zip(args) {
            self.heap.define(env, *param, value);
        }
        self.frames.push(CallFrame {
            function: function.proto(),
            ip: 0,
            base: self.stack.len(),
            env,
        });
        Ok(())
    }
}
