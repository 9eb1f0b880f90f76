//! Pyrite bytecode backend.
//!
//! Lowers a [`CheckedProgram`](pyrite_sema::CheckedProgram) to an
//! [`ExecutableUnit`] and runs it on a stack machine. The unit keeps a
//! position table, so faults raised at an instruction report the same source
//! line and column the tree-walking interpreter would.
//!
//! # Modules
//!
//! - [`instr`] - Instruction set
//! - [`unit`] - Executable units, position table, disassembly
//! - [`compiler`] - AST to bytecode
//! - [`engine`] - The execution engine interface and faults
//! - [`function`] - Function values
//! - [`vm`] - The virtual machine

#![warn(missing_docs)]

pub mod compiler;
pub mod engine;
pub mod function;
pub mod instr;
pub mod unit;
pub mod vm;

pub use compiler::generate;
pub use engine::{ExecutionEngine, Fault};
pub use function::{Function, VmValue};
pub use instr::Instr;
pub use unit::{CodeLocation, Constant, ENTRY, ExecutableUnit, FunctionProto};
pub use vm::Vm;
