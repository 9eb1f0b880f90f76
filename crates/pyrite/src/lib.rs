//! # Pyrite
//!
//! A small indentation-structured scripting language: integers, floats,
//! strings and booleans, `if`/`elif`/`else`, `while`, first-class functions
//! with closures, and a `print` builtin.
//!
//! Source goes through the same front half of the pipeline whichever way it
//! is run:
//!
//! ```text
//! source ─ lexer ─ parser ─ semantic analysis ─┬─ interpreter
//!                                              └─ codegen ─ VM
//! ```
//!
//! Both backends produce the same output and report runtime faults at the
//! same source positions. Every phase is fail-fast and a program that fails
//! semantic analysis never runs.
//!
//! # Examples
//!
//! ```
//! use pyrite::{Backend, RuntimeConfig};
//!
//! let source = "\
//! def make_adder(x):
//!     def add(y):
//!         return x + y
//!     return add
//! adder = make_adder(5)
//! print(adder(3))
//! ";
//! for backend in Backend::ALL {
//!     let mut out = Vec::new();
//!     pyrite::run(source, backend, RuntimeConfig::default(), &mut out).unwrap();
//!     assert_eq!(out, b"8\n");
//! }
//! ```
//!
//! # Crates
//!
//! - [`syntax`] - Lexer, parser and AST
//! - [`sema`] - Semantic analysis
//! - [`runtime`] - Values, frames and operators shared by both backends
//! - [`interpreter`] - Tree-walking backend
//! - [`bytecode`] - Code generation and the VM

#![warn(missing_docs)]

pub mod error;

pub use error::{Error, ExecutionFault, Result};

pub use pyrite_bytecode as bytecode;
pub use pyrite_interpreter as interpreter;
pub use pyrite_log as log;
pub use pyrite_runtime as runtime;
pub use pyrite_sema as sema;
pub use pyrite_syntax as syntax;

pub use pyrite_bytecode::{ExecutableUnit, ExecutionEngine};
pub use pyrite_runtime::RuntimeConfig;
pub use pyrite_sema::CheckedProgram;

use pyrite_bytecode::Vm;
use pyrite_interpreter::Interpreter;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

/// How to run a checked program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Backend {
    /// Walk the AST directly
    #[default]
    Interpret,
    /// Compile to bytecode and run it on the VM
    Bytecode,
}

impl Backend {
    /// Every backend.
    pub const ALL: [Self; 2] = [Self::Interpret, Self::Bytecode];

    /// Name used on command lines and in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Interpret => "interpret",
            Self::Bytecode => "bytecode",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "interpret" | "interpreter" | "ast" => Ok(Self::Interpret),
            "bytecode" | "vm" => Ok(Self::Bytecode),
            _ => Err(format!("unknown backend: {s}")),
        }
    }
}

/// Lexes, parses and analyzes `source`.
///
/// # Errors
///
/// Returns the first lexer, parser or semantic error.
pub fn check(source: &str) -> Result<CheckedProgram> {
    let program = pyrite_syntax::parse_source(source)?;
    let checked = pyrite_sema::analyze(program)?;
    Ok(checked)
}

/// Checks `source` and runs it on the tree-walking interpreter.
///
/// # Errors
///
/// Returns the first error of any phase. Nothing is written to `out`
/// unless the program passes analysis.
pub fn interpret<W: Write>(source: &str, config: RuntimeConfig, out: W) -> Result<()> {
    let checked = check(source)?;
    Interpreter::new(config, out).interpret(&checked)?;
    Ok(())
}

/// Checks `source` and compiles it without running it.
///
/// The unit's `Display` output is a disassembly listing.
///
/// # Errors
///
/// Returns the first lexer, parser or semantic error.
pub fn compile(source: &str) -> Result<ExecutableUnit> {
    let checked = check(source)?;
    Ok(pyrite_bytecode::generate(&checked))
}

/// Runs a compiled unit on the VM.
///
/// # Errors
///
/// Returns the first fault, resolved to its source position.
pub fn execute<W: Write>(unit: &ExecutableUnit, config: RuntimeConfig, out: W) -> Result<()> {
    let mut vm = Vm::new(config, out);
    vm.run(unit).map_err(|fault| {
        let pos = unit.resolve(fault.location).unwrap_or_default();
        Error::Execution(ExecutionFault {
            kind: fault.kind,
            line: pos.line,
            column: pos.col,
        })
    })
}

/// Checks, compiles and runs `source` on the VM.
///
/// # Errors
///
/// Returns the first error of any phase.
pub fn compile_and_run<W: Write>(source: &str, config: RuntimeConfig, out: W) -> Result<()> {
    let unit = compile(source)?;
    execute(&unit, config, out)
}

/// Runs `source` on the chosen backend.
///
/// # Errors
///
/// Returns the first error of any phase.
pub fn run<W: Write>(source: &str, backend: Backend, config: RuntimeConfig, out: W) -> Result<()> {
    pyrite_log::debug!("running on the {backend} backend");
    match backend {
        Backend::Interpret => interpret(source, config, out),
        Backend::Bytecode => compile_and_run(source, config, out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_str() {
        assert_eq!("vm".parse::<Backend>(), Ok(Backend::Bytecode));
        assert_eq!("Interpret".parse::<Backend>(), Ok(Backend::Interpret));
        assert!("jit".parse::<Backend>().is_err());
        assert_eq!(Backend::default(), Backend::Interpret);
    }

    #[test]
    fn test_check_reports_phase() {
        assert!(matches!(check("x = $\n"), Err(Error::Lex(_))));
        assert!(matches!(check("x = \n"), Err(Error::Parse(_))));
        assert!(matches!(check("print(y)\n"), Err(Error::Semantic(_))));
        assert!(check("print(1)\n").is_ok());
    }

    #[test]
    fn test_compile_lists_code() {
        let unit = compile("x = 1\nprint(x)\n").unwrap();
        let listing = unit.to_string();
        assert!(listing.contains("STORE"));
        assert!(listing.contains("CALL 1"));
    }

    #[test]
    fn test_execute_resolves_positions() {
        let unit = compile("x = 0\nprint(1 / x)\n").unwrap();
        let err = execute(&unit, RuntimeConfig::default(), Vec::new()).unwrap_err();
        assert_eq!((err.line(), err.column()), (2, 9));
    }
}
