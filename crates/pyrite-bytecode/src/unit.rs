//! Executable units.
//!
//! An [`ExecutableUnit`] is everything the VM needs to run a program: one
//! [`FunctionProto`] per `def` plus the module body, a constant pool and a
//! name table. Each prototype keeps a position table parallel to its code,
//! so any [`CodeLocation`] resolves back to the source line and column of
//! the node that emitted it.
//!
//! The unit prints as a disassembly listing:
//!
//! ```text
//! function 0 <module> ()
//!      0  1:5    CONST 0             ; 1
//!      1  1:1    STORE #7            ; x
//! ```

use crate::instr::Instr;
use pyrite_mem::{StringInterner, Symbol};
use pyrite_syntax::LineCol;
use pyrite_syntax::keywords;
use std::fmt;
use std::rc::Rc;

/// Index of the module body among a unit's functions.
pub const ENTRY: usize = 0;

/// Name given to the module body's prototype.
pub const MODULE_NAME: &str = "<module>";

/// A literal in the constant pool.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    /// Integer literal
    Int(i64),
    /// Float literal
    Float(f64),
    /// String literal
    Str(Rc<str>),
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Str(s) => write!(f, "{s:?}"),
        }
    }
}

/// Address of one instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodeLocation {
    /// Index of the function in the unit
    pub function: usize,
    /// Offset of the instruction in that function's code
    pub offset: usize,
}

impl CodeLocation {
    /// Creates a location.
    #[must_use]
    pub const fn new(function: usize, offset: usize) -> Self {
        Self { function, offset }
    }
}

impl fmt::Display for CodeLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.function, self.offset)
    }
}

/// A compiled function body.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionProto {
    /// Function name, in the unit's name table
    pub name: Symbol,
    /// Parameter names in order
    pub params: Vec<Symbol>,
    /// Instructions
    pub code: Vec<Instr>,
    /// Source position of each instruction, parallel to `code`
    pub locations: Vec<LineCol>,
}

impl FunctionProto {
    /// Creates an empty prototype.
    #[must_use]
    pub fn new(name: Symbol, params: Vec<Symbol>) -> Self {
        Self {
            name,
            params,
            code: Vec::new(),
            locations: Vec::new(),
        }
    }

    /// Number of parameters.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Number of instructions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.code.len()
    }

    /// Returns true if the prototype has no code.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }
}

/// A compiled program.
#[derive(Debug, Clone)]
pub struct ExecutableUnit {
    /// Function prototypes; [`ENTRY`] is the module body
    pub functions: Vec<FunctionProto>,
    /// Constant pool
    pub constants: Vec<Constant>,
    /// Names used by `LOAD`, `STORE` and prototypes
    pub names: StringInterner,
}

impl ExecutableUnit {
    /// Creates a unit holding only an empty module prototype.
    ///
    /// The name table starts with the reserved words, so builtin names keep
    /// the symbols the runtime installs them under.
    #[must_use]
    pub fn new() -> Self {
        let mut names = StringInterner::with_pre_interned(keywords::PRE_INTERNED);
        let module = names.intern(MODULE_NAME);
        Self {
            functions: vec![FunctionProto::new(module, Vec::new())],
            constants: Vec::new(),
            names,
        }
    }

    /// The module body.
    #[must_use]
    pub fn entry(&self) -> &FunctionProto {
        &self.functions[ENTRY]
    }

    /// Resolves a name symbol.
    #[must_use]
    pub fn name(&self, sym: Symbol) -> &str {
        self.names.resolve(sym).unwrap_or("<unknown>")
    }

    /// Source position of the instruction at `location`.
    ///
    /// `None` when the location does not address an instruction of this
    /// unit.
    #[must_use]
    pub fn resolve(&self, location: CodeLocation) -> Option<LineCol> {
        self.functions
            .get(location.function)?
            .locations
            .get(location.offset)
            .copied()
    }

    /// Total number of instructions across all functions.
    #[must_use]
    pub fn instruction_count(&self) -> usize {
        self.functions.iter().map(FunctionProto::len).sum()
    }

    fn annotate(&self, instr: Instr) -> Option<String> {
        match instr {
            Instr::Const(idx) => self.constants.get(idx as usize).map(ToString::to_string),
            Instr::Load(sym) | Instr::Store(sym) => Some(self.name(sym).to_string()),
            Instr::MakeFunction(idx) => self
                .functions
                .get(idx as usize)
                .map(|proto| self.name(proto.name).to_string()),
            _ => None,
        }
    }
}

impl Default for ExecutableUnit {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExecutableUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, proto) in self.functions.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            let params: Vec<&str> = proto.params.iter().map(|p| self.name(*p)).collect();
            writeln!(
                f,
                "function {index} {} ({})",
                self.name(proto.name),
                params.join(", ")
            )?;
            for (offset, (instr, pos)) in proto.code.iter().zip(&proto.locations).enumerate() {
                let text = instr.to_string();
                match self.annotate(*instr) {
                    Some(note) => writeln!(f, "{offset:>6}  {:<6} {text:<19} ; {note}", pos.to_string())?,
                    None => writeln!(f, "{offset:>6}  {:<6} {text}", pos.to_string())?,
                }
            }
        }
        if !self.constants.is_empty() {
            writeln!(f)?;
            writeln!(f, "constants")?;
            for (index, constant) in self.constants.iter().enumerate() {
                writeln!(f, "{index:>6}  {constant}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_unit() {
        let unit = ExecutableUnit::new();
        assert_eq!(unit.functions.len(), 1);
        assert_eq!(unit.name(unit.entry().name), MODULE_NAME);
        assert_eq!(unit.names.get("print"), Some(keywords::PRINT));
        assert_eq!(unit.instruction_count(), 0);
    }

    #[test]
    fn test_resolve() {
        let mut unit = ExecutableUnit::new();
        let entry = &mut unit.functions[ENTRY];
        entry.code.push(Instr::None);
        entry.locations.push(LineCol::new(3, 4));

        assert_eq!(unit.resolve(CodeLocation::new(ENTRY, 0)), Some(LineCol::new(3, 4)));
        assert_eq!(unit.resolve(CodeLocation::new(ENTRY, 1)), None);
        assert_eq!(unit.resolve(CodeLocation::new(5, 0)), None);
    }

    #[test]
    fn test_constant_display() {
        assert_eq!(Constant::Int(4).to_string(), "4");
        assert_eq!(Constant::Float(2.0).to_string(), "2.0");
        assert_eq!(Constant::Str(Rc::from("hi")).to_string(), "\"hi\"");
    }
}
